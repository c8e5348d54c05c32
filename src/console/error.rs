use thiserror::Error;

use super::span::Style;

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("cannot evict {requested} lines from a document holding {available}")]
    EvictBeyondEnd { requested: usize, available: usize },
    #[error("character count drifted: {tracked} tracked but {evicted} evicted")]
    CharCountDrift { tracked: usize, evicted: usize },
    #[error("no command given")]
    EmptyCommand,
    #[error("could not start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} of the child process was not captured")]
    MissingPipe(Style),
}
