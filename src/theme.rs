use clap::ValueEnum;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Theme {
    Dark,
    SolarizedDark,
}

impl Theme {
    pub fn scheme(&self) -> Scheme {
        match self {
            Theme::SolarizedDark => Scheme {
                console_stdout: Style::default().fg(Solarized::Base1.to_color()),
                console_stderr: Style::default().fg(Solarized::Red.to_color()),
                console_background: Style::default().bg(Solarized::Base03.to_color()),
                notification_info: Style::default().fg(Solarized::Green.to_color()),
                notification_error: Style::default().fg(Solarized::Red.to_color()),
                status_active: Style::default()
                    .fg(Solarized::Base02.to_color())
                    .bg(Solarized::Green.to_color()),
                status_inactive: Style::default()
                    .fg(Solarized::Base1.to_color())
                    .bg(Solarized::Base02.to_color()),
                status_detail: Style::default().fg(Solarized::Base01.to_color()),
                status_follow: Style::default()
                    .fg(Solarized::Base02.to_color())
                    .bg(Solarized::Yellow.to_color()),
            },
            Theme::Dark => Scheme {
                console_stdout: Style::default().fg(Color::White),
                console_stderr: Style::default().fg(Color::LightRed),
                console_background: Style::default(),

                notification_info: Style::default().fg(Color::Black).bg(Color::Green),
                notification_error: Style::default().fg(Color::White).bg(Color::Red),

                status_active: Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD),
                status_inactive: Style::default().fg(Color::Black).bg(Color::DarkGray),
                status_detail: Style::default().fg(Color::DarkGray),
                status_follow: Style::default().fg(Color::Black).bg(Color::Yellow),
            },
        }
    }
}

pub struct Scheme {
    pub console_stdout: Style,
    pub console_stderr: Style,
    pub console_background: Style,

    pub notification_info: Style,
    pub notification_error: Style,

    pub status_active: Style,
    pub status_inactive: Style,
    pub status_detail: Style,
    pub status_follow: Style,
}

pub enum Solarized {
    Base03,
    Base02,
    Base01,
    Base1,
    Yellow,
    Red,
    Green,
}

impl Solarized {
    fn to_color(&self) -> Color {
        match self {
            Solarized::Base03 => Color::Rgb(0, 43, 54),
            Solarized::Base02 => Color::Rgb(7, 54, 66),
            Solarized::Base01 => Color::Rgb(88, 110, 117),
            Solarized::Base1 => Color::Rgb(147, 161, 161),
            Solarized::Yellow => Color::Rgb(181, 137, 0),
            Solarized::Red => Color::Rgb(220, 50, 47),
            Solarized::Green => Color::Rgb(133, 153, 0),
        }
    }
}
