// TermLink - Serial and TCP bridge terminal
use clap::error::ErrorKind;
use clap::Parser;
use std::panic;
use std::process;
use termlink::cli::{execute_command, Args};
use termlink::domain::error::{EXIT_CONFIG, EXIT_FATAL, EXIT_OK};
use termlink::infrastructure::logging::install_panic_hook;

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => EXIT_OK,
                _ => EXIT_CONFIG,
            };
            let _ = e.print();
            process::exit(code);
        }
    };

    install_panic_hook();
    let code = match panic::catch_unwind(|| execute_command(args)) {
        Ok(Ok(_)) => EXIT_OK,
        Ok(Err(e)) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
        Err(_) => EXIT_FATAL,
    };

    process::exit(code);
}
