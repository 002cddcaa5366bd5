//! Platform logging initialization for intake_app.

use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Destination for log output.
#[allow(dead_code)]
pub enum LogDestination {
    /// Write to the log file only.
    File,
    /// Write to terminal (stdout).
    Terminal,
    /// Write to both file and terminal.
    Both,
}

/// Initialize the logger. `log_path` is used for `File` and `Both`; if the
/// file cannot be created, logging degrades to whatever remains.
pub fn initialize(destination: LogDestination, log_path: &Path) {
    let level = LevelFilter::Info;
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build();

    let term = || -> Box<dyn SharedLogger> {
        TermLogger::new(level, config.clone(), TerminalMode::Mixed, ColorChoice::Auto)
    };
    let file = || -> Option<Box<dyn SharedLogger>> {
        match File::create(log_path) {
            Ok(file) => Some(WriteLogger::new(level, config.clone(), file)),
            Err(err) => {
                eprintln!("Warning: could not create log file {log_path:?}: {err}");
                None
            }
        }
    };

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    match destination {
        LogDestination::File => loggers.extend(file()),
        LogDestination::Terminal => loggers.push(term()),
        LogDestination::Both => {
            loggers.push(term());
            loggers.extend(file());
        }
    }
    if loggers.is_empty() {
        return;
    }

    let _ = CombinedLogger::init(loggers);
}
