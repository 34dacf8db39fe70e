//! Console text output
//!
//! Minimal output seam: a string and a single character. Rendering and
//! line discipline belong to the implementation.

use std::io::{self, Write};

/// Console text output
pub trait Console {
    /// Write a string to the console
    fn output_string(&mut self, s: &str);

    /// Write a single character to the console
    ///
    /// Default implementation forwards to `output_string`.
    fn output_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.output_string(c.encode_utf8(&mut buf));
    }
}

impl<C: Console + ?Sized> Console for &mut C {
    fn output_string(&mut self, s: &str) {
        (**self).output_string(s)
    }

    fn output_char(&mut self, c: char) {
        (**self).output_char(c)
    }
}

/// Console backed by any `io::Write` sink
///
/// Write errors are logged and otherwise ignored; console output has no
/// failure path for its callers.
pub struct WriterConsole<W: Write> {
    writer: W,
}

impl<W: Write> WriterConsole<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Unwrap the underlying sink
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Console for WriterConsole<W> {
    fn output_string(&mut self, s: &str) {
        let result = self
            .writer
            .write_all(s.as_bytes())
            .and_then(|()| self.writer.flush());
        if let Err(err) = result {
            log::warn!("console write failed: {}", err);
        }
    }
}

/// Console on the process standard output
pub type StdoutConsole = WriterConsole<io::Stdout>;

impl StdoutConsole {
    pub fn stdout() -> Self {
        WriterConsole::new(io::stdout())
    }
}

/// Console that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullConsole;

impl Console for NullConsole {
    #[inline(always)]
    fn output_string(&mut self, _s: &str) {}

    #[inline(always)]
    fn output_char(&mut self, _c: char) {}
}

/// Console that keeps every string it is given
///
/// Each `output_string`/`output_char` call becomes one entry, so callers can
/// check how many times something was written as well as what.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordingConsole {
    pub strings: Vec<String>,
}

impl RecordingConsole {
    /// Everything written so far, concatenated
    pub fn output(&self) -> String {
        self.strings.concat()
    }
}

impl Console for RecordingConsole {
    fn output_string(&mut self, s: &str) {
        self.strings.push(s.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_console() {
        let mut console = WriterConsole::new(Vec::new());
        console.output_string("Last=");
        console.output_char('é');
        console.output_char('\n');

        let bytes = console.into_inner();
        assert_eq!(String::from_utf8(bytes).unwrap(), "Last=é\n");
    }

    #[test]
    fn test_recording_console_keeps_calls() {
        let mut console = RecordingConsole::default();
        console.output_string("ab");
        console.output_char('c');
        assert_eq!(console.strings, vec!["ab", "c"]);
        assert_eq!(console.output(), "abc");
    }

    #[test]
    fn test_null_console_accepts_output() {
        let mut console = NullConsole;
        console.output_string("ignored");
        console.output_char('x');
    }
}
