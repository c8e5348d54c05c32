use std::fmt::Display;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;

use super::assembler::LineAssembler;
use super::config::ConsoleConfig;
use super::denylist::Denylist;
use super::document::DocumentSnapshot;
use super::queue::SpanQueue;
use super::scheduler::FlushScheduler;
use super::span::Style;
use super::writer::{echo, ConsoleSink, ConsoleWriter};

static NEXT_SESSION_ID: AtomicUsize = AtomicUsize::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Created,
    Active,
    Inactive,
    Destroyed,
}

impl Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// What became of a submitted fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Queued,
    /// Matched the denylist.
    Filtered,
    /// The session is not active.
    Rejected,
    /// No session was active; the text went to the real stream instead.
    Unrouted,
}

struct Producer {
    state: SessionState,
    assembler: LineAssembler,
}

enum Timer {
    Idle(FlushScheduler),
    Running {
        stop: oneshot::Sender<()>,
        handle: JoinHandle<FlushScheduler>,
    },
    Stopped,
}

/// One console panel: its document plus the machinery feeding it.
pub struct ConsoleSession {
    id: usize,
    name: String,
    // the assembler lock is what orders concurrent writers
    producer: Mutex<Producer>,
    queue: Arc<SpanQueue>,
    timer: tokio::sync::Mutex<Timer>,
    snapshot: watch::Receiver<DocumentSnapshot>,
    denylist: Denylist,
    echo: bool,
    flush_interval: Duration,
}

impl ConsoleSession {
    pub fn new(name: impl Into<String>, config: ConsoleConfig) -> Arc<Self> {
        let config = config.sanitized();
        let queue = Arc::new(SpanQueue::new());
        let (scheduler, snapshot) = FlushScheduler::new(queue.clone(), config.retention());

        Arc::new(Self {
            id: NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
            producer: Mutex::new(Producer {
                state: SessionState::Created,
                assembler: LineAssembler::new(config.max_line_length),
            }),
            queue,
            timer: tokio::sync::Mutex::new(Timer::Idle(scheduler)),
            snapshot,
            denylist: config.denylist,
            echo: config.echo,
            flush_interval: config.flush_interval,
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> SessionState {
        self.lock_producer().state
    }

    /// Queue text for the next flush. Never blocks on the flush itself.
    pub fn submit(&self, text: &str, style: Style) -> Submission {
        if self.echo {
            echo(text, style);
        }
        if self.denylist.is_denied(text, style) {
            log::trace!("session {} filtered {:?}", self.id, text);
            return Submission::Filtered;
        }

        let mut producer = self.lock_producer();
        if producer.state != SessionState::Active {
            log::debug!(
                "session {} is {}, ignoring {} bytes of {}",
                self.id,
                producer.state,
                text.len(),
                style
            );
            return Submission::Rejected;
        }
        let spans = producer.assembler.assemble(text, style);
        self.queue.push_all(spans);
        Submission::Queued
    }

    /// The document as of the last flush.
    pub fn snapshot(&self) -> DocumentSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Changes whenever a flush alters the document.
    pub fn subscribe(&self) -> watch::Receiver<DocumentSnapshot> {
        self.snapshot.clone()
    }

    pub fn writer(self: &Arc<Self>, style: Style) -> ConsoleWriter {
        ConsoleWriter::new(self.clone(), style)
    }

    /// Empty the document. Applied by the next flush, or right away when
    /// the session is not flushing on a timer.
    pub async fn clear(&self) {
        {
            // under the producer lock so no write lands between the two
            let mut producer = self.lock_producer();
            producer.assembler.reset();
            self.queue.request_clear();
        }
        if let Timer::Idle(scheduler) = &mut *self.timer.lock().await {
            scheduler.tick();
        }
    }

    pub(crate) async fn start(&self) -> bool {
        let mut timer = self.timer.lock().await;
        {
            let mut producer = self.lock_producer();
            if producer.state == SessionState::Destroyed {
                return false;
            }
            // nothing would ever drain the queue
            if let Timer::Stopped = *timer {
                log::error!("session {} has lost its document, not starting it", self.id);
                return false;
            }
            producer.state = SessionState::Active;
        }

        *timer = match std::mem::replace(&mut *timer, Timer::Stopped) {
            Timer::Idle(scheduler) => {
                let (stop, stopped) = oneshot::channel();
                let handle = tokio::spawn(scheduler.run(self.flush_interval, stopped));
                log::debug!(
                    "session {} flushing every {:?}",
                    self.id,
                    self.flush_interval
                );
                Timer::Running { stop, handle }
            }
            other => other,
        };
        true
    }

    /// Stop accepting writes, stop the timer and flush what was queued.
    pub(crate) async fn stop(&self, next: SessionState) {
        let mut timer = self.timer.lock().await;
        {
            let mut producer = self.lock_producer();
            if producer.state == SessionState::Destroyed {
                return;
            }
            producer.state = next;
        }

        *timer = match std::mem::replace(&mut *timer, Timer::Stopped) {
            Timer::Running { stop, handle } => {
                let _ = stop.send(());
                match handle.await {
                    Ok(scheduler) => Timer::Idle(scheduler),
                    Err(err) => {
                        log::error!("flush task of session {} failed: {}", self.id, err);
                        Timer::Stopped
                    }
                }
            }
            Timer::Idle(mut scheduler) => {
                scheduler.tick();
                Timer::Idle(scheduler)
            }
            Timer::Stopped => Timer::Stopped,
        };

        if next == SessionState::Destroyed {
            *timer = Timer::Stopped;
        }
        log::debug!("session {} is now {}", self.id, next);
    }

    fn lock_producer(&self) -> MutexGuard<'_, Producer> {
        self.producer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ConsoleSink for ConsoleSession {
    fn submit(&self, text: &str, style: Style) -> Submission {
        ConsoleSession::submit(self, text, style)
    }
}
