use better_panic::Settings;
use console_tui::app::App;
use console_tui::config::load_config;
use console_tui::event::input;
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = load_config();
    if let Some(log_path) = &config.log_path {
        if let Err(err) = simple_logging::log_to_file(log_path, log::LevelFilter::Trace) {
            anyhow::bail!(err);
        }
    }

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;
    set_panic_hook();
    let backend = CrosstermBackend::new(stdout);
    let mut terminal: Terminal<CrosstermBackend<io::Stdout>> = Terminal::new(backend)?;
    terminal.clear()?;
    let (event_sender, event_receiver) = mpsc::channel(1024);

    // start input thread
    input::start(event_sender.clone());

    let mut app = App::new(config, event_receiver, event_sender);
    let result = app.run(&mut terminal).await;

    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    disable_raw_mode()?;

    result
}

fn set_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        let _ = execute!(std::io::stderr(), LeaveAlternateScreen);
        let _ = disable_raw_mode();
        Settings::auto()
            .most_recent_first(false)
            .lineno_suffix(true)
            .create_panic_handler()(panic_info);
    }));
}
