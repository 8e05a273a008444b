//! Logger setup.
//!
//! `env_logger` with an `info` default (override with `RUST_LOG`). The TUI owns
//! the terminal, so in that mode records go to a file instead of stderr.

use std::fs::OpenOptions;
use std::path::PathBuf;

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// Install the global logger. Calling it twice is harmless.
pub fn init(target: LogTarget) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder.format_timestamp_millis().format_module_path(false);

    if let LogTarget::File(path) = &target {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                builder.target(Target::Pipe(Box::new(file)));
            }
            Err(e) => {
                eprintln!("Cannot open log file '{}': {e}; logging disabled.", path.display());
                builder.filter_level(LevelFilter::Off);
            }
        }
    }

    let _ = builder.try_init();
}
