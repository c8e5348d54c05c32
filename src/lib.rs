pub mod app;
pub mod config;
pub mod console;
pub mod event;
pub mod process;
pub mod theme;
pub mod ui;
