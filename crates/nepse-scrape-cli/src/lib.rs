//! nepse-scrape CLI — argument parsing, configuration resolution and console output.

pub mod cli;
pub mod config;
pub mod console;
pub mod doctor;

pub use cli::{Cli, Commands, HistoryArgs, RunArgs};
pub use config::{resolve_data_dir, today};
pub use console::ConsoleObserver;
