//! Progress stream of settled states.
//!
//! Every settled state is written as one line, `"<elapsed>: <state>"`, with
//! elapsed time rounded to two decimals. The stream is program output, so it
//! goes to stdout rather than through `tracing`.

use std::io::{self, Write};
use std::ops::ControlFlow;

use rush_core::math::format_hundredths;
use rush_core::prelude::{EconomyState, Fixed, SearchObserver};

/// Observer writing one line per settled state.
///
/// A failed write (for example a closed pipe) cancels the search; the error is
/// kept and returned by [`StreamProgress::finish`].
#[derive(Debug)]
pub struct StreamProgress<W: Write> {
    out: W,
    lines: usize,
    error: Option<io::Error>,
}

impl<W: Write> StreamProgress<W> {
    /// Wrap a writer.
    pub fn new(out: W) -> Self {
        Self {
            out,
            lines: 0,
            error: None,
        }
    }

    /// Lines written so far.
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Flush and hand back the writer, or the first write error.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> SearchObserver for StreamProgress<W> {
    fn on_settled(&mut self, elapsed: Fixed, _carry: u64, state: &EconomyState) -> ControlFlow<()> {
        match writeln!(self.out, "{}: {state}", format_hundredths(elapsed)) {
            Ok(()) => {
                self.lines += 1;
                ControlFlow::Continue(())
            }
            Err(error) => {
                self.error = Some(error);
                ControlFlow::Break(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_line_format() {
        let mut progress = StreamProgress::new(Vec::new());
        let flow = progress.on_settled(Fixed::from_num(3), 30, &EconomyState::default());
        assert_eq!(flow, ControlFlow::Continue(()));
        assert_eq!(progress.lines(), 1);

        let out = String::from_utf8(progress.finish().unwrap()).unwrap();
        assert_eq!(
            out,
            "3.00: State(facilities=1, workers=5, military=0, supply_providers=1, has_tech_facility=false)\n"
        );
    }

    #[test]
    fn test_fractional_elapsed_is_rounded() {
        let mut progress = StreamProgress::new(Vec::new());
        let _ = progress.on_settled(Fixed::from_num(2.25), 0, &EconomyState::default());
        let out = String::from_utf8(progress.finish().unwrap()).unwrap();
        assert!(out.starts_with("2.25: "));
    }

    #[test]
    fn test_write_failure_cancels() {
        let mut progress = StreamProgress::new(ClosedPipe);
        let flow = progress.on_settled(Fixed::ZERO, 0, &EconomyState::default());
        assert_eq!(flow, ControlFlow::Break(()));
        assert_eq!(progress.lines(), 0);
        assert!(progress.finish().is_err());
    }
}
