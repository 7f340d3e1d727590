use crate::domain::error::{Endpoint, TermLinkError, TermLinkResult};
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use std::io::{Read, Write};
use std::os::fd::BorrowedFd;

/// Wait up to `timeout_ms` for `fd` to become readable.
///
/// Hang-up and error conditions count as readable so that the following read
/// reports them.
pub fn wait_readable(fd: BorrowedFd<'_>, timeout_ms: u32, endpoint: Endpoint) -> TermLinkResult<bool> {
    let timeout = PollTimeout::try_from(timeout_ms).map_err(|e| {
        TermLinkError::Internal(format!("{} poll timeout of {} ms: {}", endpoint, timeout_ms, e))
    })?;
    let mut fds = [PollFd::new(fd, PollFlags::POLLIN)];
    let ready = poll(&mut fds, timeout)
        .map_err(|source| TermLinkError::Poll { endpoint, source })?;

    Ok(ready > 0)
}

/// Read one chunk after a successful poll. Zero bytes is an error here: the
/// descriptor said data was waiting.
pub fn read_chunk<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8], endpoint: Endpoint) -> TermLinkResult<usize> {
    match reader.read(buf) {
        Ok(0) => Err(TermLinkError::Closed { endpoint }),
        Ok(n) => Ok(n),
        Err(source) => Err(TermLinkError::Read { endpoint, source }),
    }
}

/// Write a whole chunk and flush it
pub fn write_chunk<W: Write + ?Sized>(writer: &mut W, data: &[u8], endpoint: Endpoint) -> TermLinkResult<()> {
    writer
        .write_all(data)
        .and_then(|_| writer.flush())
        .map_err(|source| TermLinkError::Write { endpoint, source })
}
