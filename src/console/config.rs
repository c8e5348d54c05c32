use std::time::Duration;

use super::denylist::Denylist;
use super::retention::RetentionPolicy;

pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_millis(250);
pub const DEFAULT_MAX_LINES: usize = 500;
pub const DEFAULT_MAX_CHARS: usize = 1_000_000;
pub const DEFAULT_MAX_LINE_LENGTH: usize = 10_000;

const MIN_FLUSH_INTERVAL: Duration = Duration::from_millis(10);

/// Console settings supplied by whoever owns the preferences.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub flush_interval: Duration,
    pub max_lines: usize,
    pub max_chars: usize,
    pub max_line_length: usize,
    /// Mirror every submitted fragment to this process's own stdout/stderr.
    pub echo: bool,
    pub denylist: Denylist,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            max_lines: DEFAULT_MAX_LINES,
            max_chars: DEFAULT_MAX_CHARS,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            echo: false,
            denylist: Denylist::platform_noise(),
        }
    }
}

impl ConsoleConfig {
    /// Raise values the console cannot work with to usable minimums.
    pub fn sanitized(mut self) -> Self {
        if self.flush_interval < MIN_FLUSH_INTERVAL {
            log::warn!(
                "flush interval of {:?} is too short, using {:?}",
                self.flush_interval,
                MIN_FLUSH_INTERVAL
            );
            self.flush_interval = MIN_FLUSH_INTERVAL;
        }
        for (name, value) in [
            ("max_lines", &mut self.max_lines),
            ("max_chars", &mut self.max_chars),
            ("max_line_length", &mut self.max_line_length),
        ] {
            if *value == 0 {
                log::warn!("{} must be at least 1, clamping", name);
                *value = 1;
            }
        }
        self
    }

    pub fn retention(&self) -> RetentionPolicy {
        RetentionPolicy::new(self.max_lines, self.max_chars)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_sanitized_clamps_unusable_values() {
        let config = ConsoleConfig {
            flush_interval: Duration::ZERO,
            max_lines: 0,
            max_chars: 0,
            max_line_length: 0,
            ..ConsoleConfig::default()
        }
        .sanitized();

        assert_eq!(MIN_FLUSH_INTERVAL, config.flush_interval);
        assert_eq!(1, config.max_lines);
        assert_eq!(1, config.max_chars);
        assert_eq!(1, config.max_line_length);
    }

    #[test]
    fn test_sanitized_keeps_valid_values() {
        let config = ConsoleConfig::default().sanitized();

        assert_eq!(DEFAULT_FLUSH_INTERVAL, config.flush_interval);
        assert_eq!(DEFAULT_MAX_LINES, config.retention().max_lines());
        assert_eq!(DEFAULT_MAX_CHARS, config.retention().max_chars());
    }
}
