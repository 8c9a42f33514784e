//! Output plumbing and environment switches
//!
//! Everything here is read once per invocation by `main`.

use is_terminal::IsTerminal;
use minus::Pager;
use std::fmt::Display;
use std::io::{self, Write};

/// Disables paging of `log` and `global-log` when set
pub const NO_PAGER_ENV: &str = "NO_PAGER";

/// Filter for diagnostic logging, in `tracing-subscriber` directive syntax
pub const LOG_FILTER_ENV: &str = "BOUGH_LOG";

pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Page long output only for a human at a terminal who has not opted out
pub fn should_page() -> bool {
    std::env::var_os(NO_PAGER_ENV).is_none() && io::stdout().is_terminal()
}

/// Print the line a failed command ends with
///
/// A reader that already went away, as in `bough log | head`, is not an error.
pub fn report_failure(mut out: impl Write, message: impl Display) {
    if let Err(error) = writeln!(out, "{message}").and_then(|_| out.flush())
        && error.kind() != io::ErrorKind::BrokenPipe
    {
        tracing::warn!(%error, "failed to report error");
    }
}

/// `Write` adapter feeding a `minus` pager
///
/// A write may end in the middle of a multi-byte character; those trailing
/// bytes are held back until the rest of the character arrives.
pub struct PagerWriter {
    pager: Pager,
    pending: Vec<u8>,
}

impl PagerWriter {
    pub fn new(pager: Pager) -> Self {
        PagerWriter {
            pager,
            pending: Vec::new(),
        }
    }

    fn push(&mut self, text: &str) -> io::Result<()> {
        self.pager.push_str(text).map_err(io::Error::other)
    }
}

impl Write for PagerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);

        let valid_up_to = match std::str::from_utf8(&self.pending) {
            Ok(_) => self.pending.len(),
            Err(error) if error.error_len().is_none() => error.valid_up_to(),
            Err(error) => return Err(io::Error::new(io::ErrorKind::InvalidData, error)),
        };

        let complete = self.pending.drain(..valid_up_to).collect::<Vec<_>>();
        let text = String::from_utf8(complete)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.push(&text)?;

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let rest = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        self.push(&rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_characters_are_reassembled() {
        let mut writer = PagerWriter::new(Pager::new());
        let text = "é";

        writer.write_all(&text.as_bytes()[..1]).unwrap();
        assert_eq!(writer.pending, text.as_bytes()[..1].to_vec());

        writer.write_all(&text.as_bytes()[1..]).unwrap();
        assert!(writer.pending.is_empty());
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::ErrorKind::BrokenPipe.into())
        }
    }

    #[test]
    fn failures_are_reported_on_one_line() {
        let mut out = Vec::new();

        report_failure(&mut out, "No commit with that id exists.");

        assert_eq!(out, b"No commit with that id exists.\n");
    }

    #[test]
    fn closed_pipe_is_ignored() {
        report_failure(ClosedPipe, "Found no commit with that message.");
    }

    #[test]
    fn invalid_bytes_are_rejected() {
        let mut writer = PagerWriter::new(Pager::new());

        assert!(writer.write(&[0xff, b'a']).is_err());
    }
}
