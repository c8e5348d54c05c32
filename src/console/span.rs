use std::fmt::Display;

/// Which output stream a piece of text was written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    Stdout,
    Stderr,
}

impl Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Style::Stdout => "stdout",
            Style::Stderr => "stderr",
        })
    }
}

/// A styled fragment of console output.
///
/// `text` never contains a newline. When `ends_line` is set the fragment
/// closes the line it belongs to; the newline itself is not stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: Style,
    pub ends_line: bool,
}

impl Span {
    pub fn new(text: impl Into<String>, style: Style, ends_line: bool) -> Self {
        Self {
            text: text.into(),
            style,
            ends_line,
        }
    }

    /// An empty fragment that only closes the current line.
    pub fn line_break(style: Style) -> Self {
        Self::new(String::new(), style, true)
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}
