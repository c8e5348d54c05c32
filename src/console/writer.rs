use std::io::{self, Write};
use std::sync::Arc;

use super::session::Submission;
use super::span::Style;

/// Anything redirected output can be submitted to.
pub trait ConsoleSink: Send + Sync {
    fn submit(&self, text: &str, style: Style) -> Submission;
}

/// Decodes a byte stream as UTF-8 without splitting multi-byte characters
/// that straddle two reads.
#[derive(Debug, Default)]
pub struct Utf8Carry {
    pending: Vec<u8>,
}

impl Utf8Carry {
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        let keep = incomplete_suffix_len(&self.pending);
        let tail = self.pending.split_off(self.pending.len() - keep);
        let text = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending = tail;
        text
    }

    /// Whatever is still pending, with broken sequences replaced.
    pub fn finish(&mut self) -> String {
        let text = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        text
    }
}

// length of a multi-byte sequence cut off at the end of `bytes`
fn incomplete_suffix_len(bytes: &[u8]) -> usize {
    let start = bytes.len().saturating_sub(3);
    for at in (start..bytes.len()).rev() {
        let byte = bytes[at];
        if byte & 0xC0 == 0x80 {
            continue;
        }
        let width = match byte {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        };
        let available = bytes.len() - at;
        return if width > available { available } else { 0 };
    }
    0
}

/// [Write] adapter that turns bytes into console submissions.
pub struct ConsoleWriter {
    sink: Arc<dyn ConsoleSink>,
    style: Style,
    carry: Utf8Carry,
}

impl ConsoleWriter {
    pub fn new(sink: Arc<dyn ConsoleSink>, style: Style) -> Self {
        Self {
            sink,
            style,
            carry: Utf8Carry::default(),
        }
    }
}

impl Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = self.carry.decode(buf);
        if !text.is_empty() {
            self.sink.submit(&text, self.style);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let rest = self.carry.finish();
        if !rest.is_empty() {
            self.sink.submit(&rest, self.style);
        }
    }
}

/// Write to this process's own stdout or stderr, ignoring failures.
pub fn echo(text: &str, style: Style) {
    let _ = match style {
        Style::Stdout => io::stdout().write_all(text.as_bytes()),
        Style::Stderr => io::stderr().write_all(text.as_bytes()),
    };
}
