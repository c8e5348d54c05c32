use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tokio::time::MissedTickBehavior;

use super::document::{Document, DocumentSnapshot};
use super::queue::SpanQueue;
use super::retention::RetentionPolicy;

/// Sole owner and mutator of a session's [Document].
///
/// Each tick drains the span queue, folds the spans into the document,
/// trims it and publishes a fresh snapshot. Ticks that find nothing to do
/// publish nothing.
pub struct FlushScheduler {
    queue: Arc<SpanQueue>,
    document: Document,
    policy: RetentionPolicy,
    publisher: watch::Sender<DocumentSnapshot>,
}

impl FlushScheduler {
    pub fn new(
        queue: Arc<SpanQueue>,
        policy: RetentionPolicy,
    ) -> (Self, watch::Receiver<DocumentSnapshot>) {
        let document = Document::new();
        let (publisher, receiver) = watch::channel(document.snapshot());
        (
            Self {
                queue,
                document,
                policy,
                publisher,
            },
            receiver,
        )
    }

    /// Run one flush. Returns whether the document changed.
    pub fn tick(&mut self) -> bool {
        if self.queue.is_empty() {
            return false;
        }
        let drain = self.queue.drain_all();
        if drain.is_empty() {
            return false;
        }

        if drain.clear {
            self.document.clear();
        }
        self.document.fold(drain.spans);

        match self.policy.apply(&mut self.document) {
            Ok(eviction) if eviction.lines > 0 => {
                log::trace!(
                    "evicted {} lines ({} chars)",
                    eviction.lines,
                    eviction.chars
                );
            }
            Ok(_) => (),
            Err(err) => {
                log::error!("retention pass failed, continuing: {}", err);
                self.document.recount();
            }
        }

        self.publisher.send_replace(self.document.snapshot());
        true
    }

    /// Tick every `interval` until `stop` fires (or its sender is dropped),
    /// then flush one last time and hand the scheduler back.
    pub async fn run(mut self, interval: Duration, mut stop: oneshot::Receiver<()>) -> Self {
        let mut ticker = tokio::time::interval(interval);
        // ticks never overlap: `tick` runs to completion inside this one task,
        // and ticks missed while it ran are skipped rather than replayed
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = &mut stop => break,
                _ = ticker.tick() => {
                    self.tick();
                }
            }
        }

        self.tick();
        self
    }
}
