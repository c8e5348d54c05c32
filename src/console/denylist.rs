use super::span::Style;

/// A substring that marks a fragment as known platform noise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenyRule {
    pub pattern: String,
    /// `None` applies the rule to both streams.
    pub stream: Option<Style>,
}

impl DenyRule {
    pub fn new(pattern: impl Into<String>, stream: Option<Style>) -> Self {
        Self {
            pattern: pattern.into(),
            stream,
        }
    }

    pub fn stdout(pattern: impl Into<String>) -> Self {
        Self::new(pattern, Some(Style::Stdout))
    }

    pub fn stderr(pattern: impl Into<String>) -> Self {
        Self::new(pattern, Some(Style::Stderr))
    }

    fn matches(&self, text: &str, style: Style) -> bool {
        self.stream.map_or(true, |s| s == style) && text.contains(self.pattern.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Denylist {
    rules: Vec<DenyRule>,
}

impl Denylist {
    pub fn new(rules: Vec<DenyRule>) -> Self {
        Self { rules }
    }

    /// Warnings printed by graphics drivers and the JVM debugger agent that
    /// users keep mistaking for problems in their own program.
    pub fn platform_noise() -> Self {
        Self::new(vec![
            DenyRule::stderr("invalid context 0x0"),
            DenyRule::stderr("invalid drawable"),
            DenyRule::stderr("Make pbuffer:"),
            DenyRule::stderr("XInitThreads() called for concurrent"),
            DenyRule::stdout("Listening for transport dt_socket at address"),
        ])
    }

    pub fn rules(&self) -> &[DenyRule] {
        &self.rules
    }

    pub fn is_denied(&self, text: &str, style: Style) -> bool {
        self.rules.iter().any(|r| r.matches(text, style))
    }
}
