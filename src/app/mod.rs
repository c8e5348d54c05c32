pub mod notification;

use std::{io, sync::Arc};

use crossterm::event::KeyCode;
use notification::Notification;
use ratatui::{prelude::CrosstermBackend, Terminal};
use tokio::{
    sync::mpsc::{Receiver, Sender},
    task,
};

use crate::{
    config::Config,
    console::{ConsoleRegistry, ConsoleSession, Style},
    event::input::AppEvent,
    process::{self, RunningProcess},
    theme::Scheme,
    ui::render,
};

const PAGE: usize = 10;
const KEPT_SESSIONS: usize = 8;

pub struct App {
    pub config: Config,
    pub scheme: Scheme,
    pub notification: Notification,
    receiver: Receiver<AppEvent>,
    sender: Sender<AppEvent>,
    quit: bool,
    registry: Arc<ConsoleRegistry>,
    pub sessions: Vec<Arc<ConsoleSession>>,
    pub displayed: usize,
    pub scroll: usize,
    pub follow: bool,
    processes: Vec<RunningProcess>,
    runs: usize,
}

impl App {
    pub fn new(config: Config, receiver: Receiver<AppEvent>, sender: Sender<AppEvent>) -> App {
        App {
            scheme: config.theme.scheme(),
            config,
            notification: Notification::none(),
            receiver,
            sender,
            quit: false,
            registry: Arc::new(ConsoleRegistry::new()),
            sessions: Vec::new(),
            displayed: 0,
            scroll: 0,
            follow: true,
            processes: Vec::new(),
            runs: 0,
        }
    }

    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<(), anyhow::Error> {
        self.launch().await;
        terminal.draw(|frame| render(self, frame))?;

        while let Some(event) = self.receiver.recv().await {
            self.handle_event(event).await?;

            if self.quit {
                break;
            }

            terminal.autoresize()?;
            terminal.draw(|frame| render(self, frame))?;
        }

        self.shutdown().await;
        Ok(())
    }

    pub fn displayed_session(&self) -> Option<&Arc<ConsoleSession>> {
        self.sessions.get(self.displayed)
    }

    async fn handle_event(&mut self, event: AppEvent) -> Result<(), anyhow::Error> {
        match event {
            AppEvent::Quit => self.quit = true,
            AppEvent::Tick => self.reap(),
            // redrawn by the caller
            AppEvent::ConsoleUpdated(_) => (),
            AppEvent::Input(e) => match e.code {
                KeyCode::Char('q') => self.sender.send(AppEvent::Quit).await?,
                KeyCode::Char('r') => {
                    self.stop_processes().await;
                    self.launch().await;
                }
                KeyCode::Tab => {
                    if !self.sessions.is_empty() {
                        self.displayed = (self.displayed + 1) % self.sessions.len();
                        self.follow = true;
                    }
                }
                KeyCode::Char('c') => {
                    if let Some(session) = self.displayed_session() {
                        session.clear().await;
                    }
                }
                KeyCode::Char('j') | KeyCode::Down => self.scroll_by(1),
                KeyCode::Char('k') | KeyCode::Up => self.scroll_by(-1),
                KeyCode::PageDown => self.scroll_by(PAGE as isize),
                KeyCode::PageUp => self.scroll_by(-(PAGE as isize)),
                KeyCode::Char('g') | KeyCode::Home => {
                    self.follow = false;
                    self.scroll = 0;
                }
                KeyCode::Char('G') | KeyCode::End => self.follow = true,
                _ => (),
            },
        };
        Ok(())
    }

    // start the configured program, in the last session emptied when
    // auto-clearing, otherwise in a fresh one
    async fn launch(&mut self) {
        let reused = match self.config.auto_clear {
            true => self.sessions.last().cloned(),
            false => None,
        };
        let session = match reused {
            Some(session) => {
                session.clear().await;
                session
            }
            None => {
                self.runs += 1;
                let session =
                    ConsoleSession::new(format!("run {}", self.runs), self.config.console.clone());
                self.forward_updates(&session);
                self.sessions.push(session.clone());
                session
            }
        };
        self.registry.activate(&session).await;

        match process::start(&self.config.command, session.id(), session.clone()) {
            Ok(process) => self.processes.push(process),
            Err(err) => {
                log::error!("{}", err);
                session.submit(&format!("{}\n", err), Style::Stderr);
                self.notification = Notification::error(err.to_string());
            }
        }

        self.retire_sessions().await;
        self.displayed = self.sessions.len() - 1;
        self.follow = true;
    }

    // frozen runs beyond KEPT_SESSIONS are destroyed, oldest first
    async fn retire_sessions(&mut self) {
        while self.sessions.len() > KEPT_SESSIONS {
            let session = self.sessions.remove(0);
            self.registry.destroy(&session).await;
            log::debug!("retired console session {} ({})", session.id(), session.name());
        }
    }

    fn forward_updates(&self, session: &Arc<ConsoleSession>) {
        let mut updates = session.subscribe();
        let sender = self.sender.clone();
        let id = session.id();

        task::spawn(async move {
            while updates.changed().await.is_ok() {
                if sender.send(AppEvent::ConsoleUpdated(id)).await.is_err() {
                    break;
                }
            }
        });
    }

    fn scroll_by(&mut self, amount: isize) {
        self.follow = false;
        self.scroll = self.scroll.saturating_add_signed(amount);
    }

    fn reap(&mut self) {
        let sessions = &self.sessions;
        let mut exited = Vec::new();
        self.processes.retain_mut(|process| match process.try_wait() {
            Some(status) => {
                let name = sessions
                    .iter()
                    .find(|s| s.id() == process.session_id)
                    .map_or("program", |s| s.name());
                exited.push(format!("{} exited ({})", name, status));
                false
            }
            None => true,
        });
        if let Some(message) = exited.pop() {
            log::info!("{}", message);
            self.notification = Notification::info(message);
        }
    }

    async fn stop_processes(&mut self) {
        for mut process in self.processes.drain(..) {
            process.kill().await;
        }
    }

    async fn shutdown(&mut self) {
        self.stop_processes().await;
        for session in &self.sessions {
            self.registry.destroy(session).await;
        }
    }
}
