use std::error::Error;
use termlink::domain::error::Endpoint;
use termlink::{TermLinkError, TermLinkResult};

/// Error handling and exit status tests
#[cfg(test)]
mod error_handling_tests {
    use super::*;

    fn io_error() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::BrokenPipe, "Broken pipe")
    }

    #[test]
    fn test_error_types() {
        let errors = vec![
            TermLinkError::config("Config error"),
            TermLinkError::UnsupportedBaud("1234".to_string()),
            TermLinkError::InvalidAddress("host".to_string()),
            TermLinkError::InvalidPort("port".to_string()),
            TermLinkError::Closed { endpoint: Endpoint::Serial },
            TermLinkError::Read { endpoint: Endpoint::Terminal, source: io_error() },
            TermLinkError::Internal("bug".to_string()),
        ];

        for error in errors {
            let display = error.to_string();
            assert!(!display.is_empty(), "Error display should not be empty");

            fn assert_send_sync<T: Send + Sync>() {}
            assert_send_sync::<TermLinkError>();
        }
    }

    #[test]
    fn test_exit_codes() {
        let setup = [
            TermLinkError::config("bad"),
            TermLinkError::UnsupportedBaud("1234".to_string()),
            TermLinkError::InvalidAddress("999.1.2.3".to_string()),
            TermLinkError::InvalidPort("0".to_string()),
            TermLinkError::Connect {
                host: "10.0.0.1".to_string(),
                port: 8089,
                source: io_error(),
            },
        ];
        for error in setup {
            assert!(!error.is_fatal(), "{} should be a setup error", error);
            assert_eq!(error.exit_code(), 1);
        }

        let runtime = [
            TermLinkError::Closed { endpoint: Endpoint::Tcp },
            TermLinkError::Write { endpoint: Endpoint::Terminal, source: io_error() },
            TermLinkError::Internal("bug".to_string()),
        ];
        for error in runtime {
            assert!(error.is_fatal(), "{} should be fatal", error);
            assert_eq!(error.exit_code(), 2);
        }
    }

    #[test]
    fn test_result_type() {
        fn success_function() -> TermLinkResult<String> {
            Ok("success".to_string())
        }

        fn error_function() -> TermLinkResult<String> {
            Err(TermLinkError::config("Test error"))
        }

        assert_eq!(success_function().unwrap(), "success");
        assert!(error_function().unwrap_err().to_string().contains("Configuration error"));
    }

    #[test]
    fn test_error_chain() {
        let error = TermLinkError::Read {
            endpoint: Endpoint::Serial,
            source: io_error(),
        };

        let source = error.source().expect("read errors keep their cause");
        assert_eq!(source.to_string(), "Broken pipe");
    }

    #[test]
    fn test_error_messages_name_the_endpoint() {
        let closed = TermLinkError::Closed { endpoint: Endpoint::Tcp };
        assert_eq!(
            closed.to_string(),
            "TCP port poll said there was data but read returned no data"
        );

        let read = TermLinkError::Read { endpoint: Endpoint::Terminal, source: io_error() };
        assert!(read.to_string().starts_with("tty poll said there was data"));

        let connect = TermLinkError::Connect {
            host: "192.168.1.9".to_string(),
            port: 2323,
            source: io_error(),
        };
        assert!(connect.to_string().contains("192.168.1.9:2323"));
    }
}
