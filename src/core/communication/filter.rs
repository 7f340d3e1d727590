//! Byte policies applied by the relay.
//!
//! Operator input is screened for the escape character as a whole chunk.
//! Backend output is filtered byte by byte so that only printable ASCII and a
//! few layout controls reach the terminal.

const BACKSPACE: u8 = 8;
const LINE_FEED: u8 = 10;
const CARRIAGE_RETURN: u8 = 13;
const ESC: u8 = 27;

/// How a backend byte is treated on its way to the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteClass {
    /// Printable ASCII, backspace, line feed or carriage return: shown
    Display,
    /// ESC: recognised but never shown
    Escape,
    /// Anything else: dropped
    Control,
}

pub fn classify(byte: u8) -> ByteClass {
    match byte {
        BACKSPACE | LINE_FEED | CARRIAGE_RETURN | 32..=126 => ByteClass::Display,
        ESC => ByteClass::Escape,
        _ => ByteClass::Control,
    }
}

/// Counts from filtering one chunk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    pub shown: usize,
    pub escapes: usize,
    pub dropped: usize,
}

/// Append the displayable bytes of `chunk` to `out`, in order
pub fn filter_output(chunk: &[u8], out: &mut Vec<u8>) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();

    for &byte in chunk {
        match classify(byte) {
            ByteClass::Display => {
                out.push(byte);
                outcome.shown += 1;
            }
            ByteClass::Escape => outcome.escapes += 1,
            ByteClass::Control => outcome.dropped += 1,
        }
    }

    outcome
}

/// What to do with one chunk of operator input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Send the chunk to the backend unchanged
    Forward,
    /// The escape character is at `position`; the whole chunk is discarded
    Escape { position: usize },
}

pub fn screen_input(chunk: &[u8], escape: u8) -> InputAction {
    match chunk.iter().position(|&byte| byte == escape) {
        Some(position) => InputAction::Escape { position },
        None => InputAction::Forward,
    }
}
