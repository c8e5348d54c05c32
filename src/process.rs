use std::process::{ExitStatus, Stdio};
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::{self, JoinHandle};

use crate::console::writer::{ConsoleSink, Utf8Carry};
use crate::console::{ConsoleError, Style};

const READ_CHUNK: usize = 4096;

/// A launched program whose stdout and stderr are pumped into a console.
pub struct RunningProcess {
    pub session_id: usize,
    child: Child,
    pumps: Vec<JoinHandle<()>>,
}

pub fn start(
    command: &[String],
    session_id: usize,
    sink: Arc<dyn ConsoleSink>,
) -> Result<RunningProcess, ConsoleError> {
    let (program, args) = command.split_first().ok_or(ConsoleError::EmptyCommand)?;

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| ConsoleError::Spawn {
            program: program.clone(),
            source,
        })?;

    let stdout = child
        .stdout
        .take()
        .ok_or(ConsoleError::MissingPipe(Style::Stdout))?;
    let stderr = child
        .stderr
        .take()
        .ok_or(ConsoleError::MissingPipe(Style::Stderr))?;

    log::info!("started `{}` (pid {:?})", command.join(" "), child.id());

    Ok(RunningProcess {
        session_id,
        child,
        pumps: vec![
            task::spawn(pump(stdout, Style::Stdout, sink.clone())),
            task::spawn(pump(stderr, Style::Stderr, sink)),
        ],
    })
}

async fn pump<R>(mut reader: R, style: Style, sink: Arc<dyn ConsoleSink>)
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0; READ_CHUNK];
    let mut carry = Utf8Carry::default();

    loop {
        match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(read) => {
                let text = carry.decode(&buf[..read]);
                if !text.is_empty() {
                    sink.submit(&text, style);
                }
            }
            Err(err) => {
                log::warn!("reading {} failed: {}", style, err);
                break;
            }
        }
    }

    let rest = carry.finish();
    if !rest.is_empty() {
        sink.submit(&rest, style);
    }
}

impl RunningProcess {
    /// Exit status if the program has finished, without waiting.
    pub fn try_wait(&mut self) -> Option<ExitStatus> {
        match self.child.try_wait() {
            Ok(status) => status,
            Err(err) => {
                log::warn!("could not poll process: {}", err);
                None
            }
        }
    }

    /// Wait for the program to exit and for both streams to be drained.
    pub async fn wait(mut self) -> std::io::Result<ExitStatus> {
        let status = self.child.wait().await?;
        for pump in self.pumps {
            if let Err(err) = pump.await {
                log::error!("output pump failed: {}", err);
            }
        }
        Ok(status)
    }

    /// Kill the program and stop forwarding whatever it left in its pipes.
    pub async fn kill(&mut self) {
        if let Err(err) = self.child.kill().await {
            log::debug!("could not kill process: {}", err);
        }
        for pump in &self.pumps {
            pump.abort();
        }
    }
}
