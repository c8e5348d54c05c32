use std::{thread, time::Duration};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc::Sender;

#[derive(Debug)]
pub enum AppEvent {
    Input(KeyEvent),
    Tick,
    Quit,
    /// A session published new content.
    ConsoleUpdated(usize),
}

pub type EventSender = Sender<AppEvent>;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

pub fn start(event_sender: EventSender) {
    thread::spawn(move || loop {
        let event = match poll(POLL_INTERVAL) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => Some(key_event(key)),
                Ok(_) => None,
                Err(err) => {
                    log::error!("could not read terminal event: {}", err);
                    return;
                }
            },
            Ok(false) => Some(AppEvent::Tick),
            Err(err) => {
                log::error!("could not poll terminal: {}", err);
                return;
            }
        };

        if let Some(event) = event {
            if event_sender.blocking_send(event).is_err() {
                return;
            }
        }
    });
}

fn key_event(key: KeyEvent) -> AppEvent {
    // handle global keys
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => AppEvent::Quit,
        _ => AppEvent::Input(key),
    }
}
