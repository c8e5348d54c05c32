use super::document::Document;
use super::error::ConsoleError;

/// Limits on how much committed output a document keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    max_lines: usize,
    max_chars: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Eviction {
    pub lines: usize,
    pub chars: usize,
}

impl RetentionPolicy {
    /// Limits below one are raised to one.
    pub fn new(max_lines: usize, max_chars: usize) -> Self {
        Self {
            max_lines: max_lines.max(1),
            max_chars: max_chars.max(1),
        }
    }

    pub fn max_lines(&self) -> usize {
        self.max_lines
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// How many lines to drop from the oldest end so both limits hold.
    ///
    /// The newest line is always kept, even when it alone is longer than
    /// `max_chars`.
    pub fn lines_to_evict<I>(&self, lengths: I, total_chars: usize) -> usize
    where
        I: ExactSizeIterator<Item = usize>,
    {
        let mut remaining = lengths.len();
        let mut chars = total_chars;
        let mut evict = 0;

        for len in lengths {
            if remaining <= 1 {
                break;
            }
            if remaining <= self.max_lines && chars <= self.max_chars {
                break;
            }
            evict += 1;
            remaining -= 1;
            chars = chars.saturating_sub(len);
        }

        evict
    }

    pub fn apply(&self, document: &mut Document) -> Result<Eviction, ConsoleError> {
        let lines = self.lines_to_evict(document.line_lengths(), document.total_chars());
        let chars = document.evict_front(lines)?;
        Ok(Eviction { lines, chars })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::console::span::{Span, Style};
    use pretty_assertions::assert_eq;

    fn document(lines: &[&str], open_tail: Option<&str>) -> Document {
        let mut document = Document::new();
        let mut spans: Vec<Span> = lines
            .iter()
            .map(|l| Span::new(*l, Style::Stdout, true))
            .collect();
        if let Some(tail) = open_tail {
            spans.push(Span::new(tail, Style::Stdout, false));
        }
        document.fold(spans);
        document
    }

    #[test]
    fn test_line_limit_drops_oldest() -> Result<(), anyhow::Error> {
        let mut doc = document(&["a", "b", "c", "d"], None);
        let eviction = RetentionPolicy::new(3, 1000).apply(&mut doc)?;

        assert_eq!(Eviction { lines: 1, chars: 1 }, eviction);
        assert_eq!(vec!["b", "c", "d"], doc.snapshot().texts());
        Ok(())
    }

    #[test]
    fn test_char_limit_drops_oldest() -> Result<(), anyhow::Error> {
        let mut doc = document(&["aaaa", "bbbb", "cccc"], None);
        RetentionPolicy::new(100, 9).apply(&mut doc)?;

        assert_eq!(vec!["bbbb", "cccc"], doc.snapshot().texts());
        assert_eq!(8, doc.total_chars());
        Ok(())
    }

    #[test]
    fn test_open_line_longer_than_char_limit_is_kept() -> Result<(), anyhow::Error> {
        let mut doc = document(&["aa", "bb"], Some("cccccccccc"));
        RetentionPolicy::new(100, 5).apply(&mut doc)?;

        assert_eq!(vec!["cccccccccc"], doc.snapshot().texts());
        assert_eq!(10, doc.total_chars());
        Ok(())
    }

    #[test]
    fn test_nothing_evicted_within_limits() -> Result<(), anyhow::Error> {
        let mut doc = document(&["a", "b"], Some("c"));
        let before = doc.snapshot().revision();
        let eviction = RetentionPolicy::new(3, 3).apply(&mut doc)?;

        assert_eq!(Eviction::default(), eviction);
        assert_eq!(before, doc.snapshot().revision());
        Ok(())
    }

    #[test]
    fn test_both_limits_hold_after_apply() -> Result<(), anyhow::Error> {
        let policy = RetentionPolicy::new(4, 12);
        let mut doc = Document::new();
        for n in 0..50 {
            doc.fold(vec![Span::new("x".repeat(n % 7), Style::Stdout, true)]);
            policy.apply(&mut doc)?;
            assert!(doc.len() <= 4);
            assert!(doc.total_chars() <= 12 || doc.len() == 1);
        }
        Ok(())
    }

    #[test]
    fn test_limits_are_clamped() {
        let policy = RetentionPolicy::new(0, 0);
        assert_eq!((1, 1), (policy.max_lines(), policy.max_chars()));
    }

    #[test]
    fn test_lines_to_evict_on_empty_input() {
        let policy = RetentionPolicy::new(1, 1);
        assert_eq!(0, policy.lines_to_evict(Vec::<usize>::new().into_iter(), 0));
    }
}
