//! Platform logging initialization for newsfeed_app.
//!
//! The feed is printed on stdout, so terminal logging goes to stderr and file
//! logging writes `./newsfeed.log` in the current working directory.

use std::fs::File;
use std::path::PathBuf;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

const LOG_FILE: &str = "./newsfeed.log";

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDestination {
    /// Write to ./newsfeed.log in current directory.
    File,
    /// Write to the terminal (stderr).
    Terminal,
}

impl LogDestination {
    pub fn from_file_flag(log_to_file: bool) -> Self {
        if log_to_file {
            LogDestination::File
        } else {
            LogDestination::Terminal
        }
    }
}

/// Initialize the logger with the specified destination and level.
///
/// Falls back to the terminal when the log file cannot be created.
pub fn initialize(destination: LogDestination, level: LevelFilter) {
    let config = build_config();

    let loggers: Vec<Box<dyn SharedLogger>> = match destination {
        LogDestination::File => match create_file_logger(level, config.clone()) {
            Some(file_logger) => vec![file_logger],
            None => vec![terminal_logger(level, config)],
        },
        LogDestination::Terminal => vec![terminal_logger(level, config)],
    };

    let _ = CombinedLogger::init(loggers);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn terminal_logger(level: LevelFilter, config: Config) -> Box<TermLogger> {
    TermLogger::new(level, config, TerminalMode::Stderr, ColorChoice::Auto)
}

fn create_file_logger(level: LevelFilter, config: Config) -> Option<Box<WriteLogger<File>>> {
    let log_path = PathBuf::from(LOG_FILE);
    match File::create(&log_path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", log_path, err);
            None
        }
    }
}
