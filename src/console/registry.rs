use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use super::session::{ConsoleSession, SessionState, Submission};
use super::span::Style;
use super::writer::{echo, ConsoleSink, ConsoleWriter};

/// Tracks which session receives globally redirected output.
///
/// Producers route through [ConsoleRegistry::submit] while holding a read
/// lock on the current pointer, so a switch waits for in-flight writes and
/// everything submitted before it lands in the old session's final flush.
#[derive(Default)]
pub struct ConsoleRegistry {
    current: RwLock<Option<Arc<ConsoleSession>>>,
    switching: tokio::sync::Mutex<()>,
}

impl ConsoleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Arc<ConsoleSession>> {
        self.read_current().clone()
    }

    pub fn is_current(&self, session: &Arc<ConsoleSession>) -> bool {
        self.read_current()
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, session))
    }

    /// Make `session` the receiver of redirected output. The previously
    /// active session is flushed and frozen.
    pub async fn activate(&self, session: &Arc<ConsoleSession>) -> bool {
        let _switching = self.switching.lock().await;

        if !session.start().await {
            log::warn!("session {} cannot be started, not activating it", session.id());
            return false;
        }
        match self.replace_current(Some(session.clone())) {
            Some(previous) if !Arc::ptr_eq(&previous, session) => {
                previous.stop(SessionState::Inactive).await;
            }
            _ => (),
        }
        log::info!("console session {} ({}) is active", session.id(), session.name());
        true
    }

    /// Detach `session` if it is the active one.
    pub async fn deactivate(&self, session: &Arc<ConsoleSession>) -> bool {
        let _switching = self.switching.lock().await;

        if !self.is_current(session) {
            log::debug!("session {} is not active, nothing to deactivate", session.id());
            return false;
        }
        self.replace_current(None);
        session.stop(SessionState::Inactive).await;
        true
    }

    /// Tear `session` down for good after one last flush.
    pub async fn destroy(&self, session: &Arc<ConsoleSession>) {
        let _switching = self.switching.lock().await;

        if self.is_current(session) {
            self.replace_current(None);
        }
        session.stop(SessionState::Destroyed).await;
    }

    /// Route text to the active session, or to the real stream when there
    /// is none.
    pub fn submit(&self, text: &str, style: Style) -> Submission {
        match self.read_current().as_ref() {
            Some(session) => session.submit(text, style),
            None => {
                echo(text, style);
                Submission::Unrouted
            }
        }
    }

    pub fn writer(self: &Arc<Self>, style: Style) -> ConsoleWriter {
        ConsoleWriter::new(self.clone(), style)
    }

    fn read_current(&self) -> RwLockReadGuard<'_, Option<Arc<ConsoleSession>>> {
        self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn replace_current(&self, next: Option<Arc<ConsoleSession>>) -> Option<Arc<ConsoleSession>> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *current, next)
    }
}

impl ConsoleSink for ConsoleRegistry {
    fn submit(&self, text: &str, style: Style) -> Submission {
        ConsoleRegistry::submit(self, text, style)
    }
}
