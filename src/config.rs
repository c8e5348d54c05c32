use std::time::Duration;

use clap::Parser;

use crate::console::ConsoleConfig;
use crate::theme::Theme;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Milliseconds between console flushes
    #[arg(long)]
    pub flush_interval: Option<u64>,

    /// Number of lines the console keeps
    #[arg(long)]
    pub max_lines: Option<usize>,

    /// Number of characters the console keeps
    #[arg(long)]
    pub max_chars: Option<usize>,

    /// Wrap lines longer than this many characters
    #[arg(long)]
    pub max_line_length: Option<usize>,

    /// Also write program output to this process's stdout/stderr
    #[arg(long)]
    pub echo: bool,

    /// Reuse and empty the console on every re-run
    #[arg(long)]
    pub auto_clear: bool,

    #[arg(short, long)]
    pub log: Option<String>,

    #[arg(long, value_enum, default_value_t = Theme::Dark)]
    pub theme: Theme,

    /// Program to run, followed by its arguments
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

pub fn load_config() -> Config {
    Config::from(Args::parse())
}

#[derive(Clone, Debug)]
pub struct Config {
    pub log_path: Option<String>,
    pub command: Vec<String>,
    pub theme: Theme,
    pub auto_clear: bool,
    pub console: ConsoleConfig,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        let defaults = ConsoleConfig::default();
        Config {
            log_path: args.log,
            command: args.command,
            theme: args.theme,
            auto_clear: args.auto_clear,
            console: ConsoleConfig {
                flush_interval: args
                    .flush_interval
                    .map_or(defaults.flush_interval, Duration::from_millis),
                max_lines: args.max_lines.unwrap_or(defaults.max_lines),
                max_chars: args.max_chars.unwrap_or(defaults.max_chars),
                max_line_length: args.max_line_length.unwrap_or(defaults.max_line_length),
                echo: args.echo,
                ..defaults
            }
            .sanitized(),
        }
    }
}
