use std::sync::Arc;

use ratatui::{
    layout::{Constraint, Layout},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{
    app::{notification::NotificationLevel, App},
    console::{self, ConsoleSession, SessionState, Style as Stream},
    theme::Scheme,
};

const HELP: &str = " r rerun  tab next console  c clear  j/k scroll  G follow  q quit";

pub fn render(app: &mut App, frame: &mut Frame) {
    let rows = Layout::default()
        .margin(0)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let session = match app.displayed_session() {
        Some(session) => session.clone(),
        None => return,
    };
    let snapshot = session.snapshot();

    let height = rows[1].height;
    app.scroll = match app.follow {
        true => snapshot.tail_offset(height),
        false => app.scroll.min(snapshot.tail_offset(height)),
    };

    frame.render_widget(status_widget(&session, &snapshot, app), rows[0]);
    frame.render_widget(
        Paragraph::new(console_lines(
            snapshot.viewport(height, app.scroll),
            &app.scheme,
        ))
        .style(app.scheme.console_background),
        rows[1],
    );
    frame.render_widget(footer_widget(app), rows[2]);
}

fn status_widget<'a>(
    session: &ConsoleSession,
    snapshot: &console::DocumentSnapshot,
    app: &App,
) -> Paragraph<'a> {
    let state = session.state();
    let mut spans = vec![
        Span::styled(
            format!(" {} · {} ", session.name(), state),
            match state {
                SessionState::Active => app.scheme.status_active,
                _ => app.scheme.status_inactive,
            },
        ),
        Span::styled(
            format!(
                " {}/{} · {} lines · {} chars ",
                app.displayed + 1,
                app.sessions.len(),
                snapshot.len(),
                snapshot.total_chars()
            ),
            app.scheme.status_detail,
        ),
    ];
    if app.follow {
        spans.push(Span::styled(" follow ", app.scheme.status_follow));
    }
    Paragraph::new(Line::from(spans))
}

fn footer_widget(app: &App) -> Paragraph<'_> {
    if !app.notification.is_visible() {
        return Paragraph::new(HELP).style(app.scheme.status_detail);
    }
    Paragraph::new(app.notification.message.as_str()).style(match app.notification.level {
        NotificationLevel::Error => app.scheme.notification_error,
        NotificationLevel::Info => app.scheme.notification_info,
        NotificationLevel::None => app.scheme.status_detail,
    })
}

fn console_lines<'a>(lines: &[Arc<console::Line>], scheme: &Scheme) -> Vec<Line<'a>> {
    lines
        .iter()
        .map(|line| {
            Line::from(
                line.spans()
                    .iter()
                    .map(|span| {
                        Span::styled(
                            span.text.clone(),
                            match span.style {
                                Stream::Stdout => scheme.console_stdout,
                                Stream::Stderr => scheme.console_stderr,
                            },
                        )
                    })
                    .collect::<Vec<Span>>(),
            )
        })
        .collect()
}
