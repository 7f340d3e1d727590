use crate::domain::error::{TermLinkError, TermLinkResult};
use std::fmt;

/// Baud rate tokens accepted on the command line
pub const SUPPORTED_BAUD_RATES: [u32; 8] = [1200, 2400, 4800, 9600, 19200, 38400, 57600, 115200];

/// A line speed known to be supported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BaudRate(u32);

impl BaudRate {
    /// Map a baud token to a speed. Anything outside the supported set is a
    /// configuration error, including numerically valid but unlisted rates.
    pub fn resolve(token: &str) -> TermLinkResult<Self> {
        let rate = token
            .parse::<u32>()
            .ok()
            .filter(|rate| SUPPORTED_BAUD_RATES.contains(rate))
            .ok_or_else(|| TermLinkError::UnsupportedBaud(token.to_string()))?;

        Ok(Self(rate))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for BaudRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
