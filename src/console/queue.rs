use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::span::Span;

/// Everything taken out of a [SpanQueue] by one drain.
#[derive(Debug, Default)]
pub struct Drain {
    pub spans: Vec<Span>,
    /// The document should be emptied before `spans` are folded in.
    pub clear: bool,
}

impl Drain {
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty() && !self.clear
    }
}

#[derive(Default)]
struct Pending {
    spans: Vec<Span>,
    clear: bool,
}

/// Multi-producer, single-consumer hand-off between writers and the flush
/// scheduler.
#[derive(Default)]
pub struct SpanQueue {
    pending: Mutex<Pending>,
    has_appendage: AtomicBool,
}

impl SpanQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, span: Span) {
        self.push_all([span]);
    }

    /// Queue several spans so that they are contiguous in the drain order.
    pub fn push_all(&self, spans: impl IntoIterator<Item = Span>) {
        let mut pending = self.lock();
        let before = pending.spans.len();
        pending.spans.extend(spans);
        if pending.spans.len() > before {
            self.has_appendage.store(true, Ordering::Release);
        }
    }

    /// Ask for the document to be emptied. Spans still queued are dropped
    /// along with it.
    pub fn request_clear(&self) {
        let mut pending = self.lock();
        pending.spans.clear();
        pending.clear = true;
        self.has_appendage.store(true, Ordering::Release);
    }

    /// Remove and return everything queued so far, in arrival order.
    pub fn drain_all(&self) -> Drain {
        let mut pending = self.lock();
        self.has_appendage.store(false, Ordering::Release);
        Drain {
            spans: std::mem::take(&mut pending.spans),
            clear: std::mem::replace(&mut pending.clear, false),
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.has_appendage.load(Ordering::Acquire)
    }

    // a producer that panicked mid-push leaves whole spans behind, never torn ones
    fn lock(&self) -> MutexGuard<'_, Pending> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::console::span::Style;
    use std::thread;

    #[test]
    fn test_drain_returns_spans_in_order() {
        let queue = SpanQueue::new();
        assert!(queue.is_empty());

        queue.push(Span::new("one", Style::Stdout, false));
        queue.push_all(vec![
            Span::new("two", Style::Stderr, true),
            Span::new("three", Style::Stdout, false),
        ]);
        assert!(!queue.is_empty());

        let drain = queue.drain_all();
        let texts: Vec<&str> = drain.spans.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(vec!["one", "two", "three"], texts);
        assert!(!drain.clear);
        assert!(queue.is_empty());
        assert!(queue.drain_all().is_empty());
    }

    #[test]
    fn test_pushing_nothing_keeps_queue_empty() {
        let queue = SpanQueue::new();
        queue.push_all(Vec::new());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_clear_request_is_drained_once() {
        let queue = SpanQueue::new();
        queue.request_clear();
        assert!(!queue.is_empty());

        let drain = queue.drain_all();
        assert!(drain.clear);
        assert!(drain.spans.is_empty());
        assert!(!queue.drain_all().clear);
    }

    #[test]
    fn test_clear_request_drops_spans_queued_before_it() {
        let queue = SpanQueue::new();
        queue.push(Span::new("stale", Style::Stdout, true));
        queue.request_clear();
        queue.push(Span::new("fresh", Style::Stdout, true));

        let drain = queue.drain_all();
        assert!(drain.clear);
        let texts: Vec<&str> = drain.spans.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(vec!["fresh"], texts);
    }

    #[test]
    fn test_concurrent_pushes_are_never_lost() {
        let queue = SpanQueue::new();
        let mut drained = Vec::new();

        thread::scope(|scope| {
            for producer in 0..4 {
                let queue = &queue;
                scope.spawn(move || {
                    for n in 0..500 {
                        queue.push(Span::new(format!("{producer}-{n}"), Style::Stdout, true));
                    }
                });
            }
            for _ in 0..50 {
                drained.extend(queue.drain_all().spans);
            }
        });
        drained.extend(queue.drain_all().spans);

        assert_eq!(2000, drained.len());
        for producer in 0..4 {
            let own: Vec<&Span> = drained
                .iter()
                .filter(|s| s.text.starts_with(&format!("{producer}-")))
                .collect();
            assert_eq!(500, own.len());
            // one producer's spans keep their relative order
            for (n, span) in own.iter().enumerate() {
                assert_eq!(format!("{producer}-{n}"), span.text);
            }
        }
    }
}
