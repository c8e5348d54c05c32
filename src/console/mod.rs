//! Bounded, multi-writer console log.
//!
//! Writers submit text to a [ConsoleSession]; the session's
//! [FlushScheduler] periodically commits it to a size-limited [Document]
//! and publishes a [DocumentSnapshot] for whoever renders it. The
//! [ConsoleRegistry] decides which session receives redirected output.

pub mod assembler;
pub mod config;
pub mod denylist;
pub mod document;
pub mod error;
pub mod queue;
pub mod registry;
pub mod retention;
pub mod scheduler;
pub mod session;
pub mod span;
pub mod writer;

pub use config::ConsoleConfig;
pub use document::{Document, DocumentSnapshot, Line};
pub use error::ConsoleError;
pub use registry::ConsoleRegistry;
pub use scheduler::FlushScheduler;
pub use session::{ConsoleSession, SessionState, Submission};
pub use span::{Span, Style};
