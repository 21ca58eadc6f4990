// Copyright 2025 Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Process-wide `log` backend writing one line per record to stderr or to a file.

use std::fs::File;
use std::io::Write;
use std::os::unix::fs::OpenOptionsExt;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use log::{LevelFilter, Log, Metadata, Record};
use serde::Deserialize;

/// Level used until a configuration says otherwise.
pub const DEFAULT_LEVEL: LevelFilter = LevelFilter::Info;

/// Name prefixed to every log line.
pub const LOG_SOURCE: &str = "seccomp-policy";

/// The logger. Writes to stderr until a log file is configured.
pub static LOGGER: Logger = Logger {
    target: Mutex::new(None),
};

/// Error type for [`Logger::init`].
pub type LoggerInitError = log::SetLoggerError;

/// Error type for [`Logger::update`].
#[derive(Debug, thiserror::Error)]
#[error("Failed to open log file: {0}")]
pub struct LoggerUpdateError(pub std::io::Error);

/// Logger section of the policy configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggerConfig {
    /// File the log lines are appended to instead of stderr.
    pub log_path: Option<PathBuf>,
    /// Maximum level written, case insensitive.
    pub level: Option<LevelFilter>,
}

/// A `log` backend with a swappable output.
#[derive(Debug)]
pub struct Logger {
    target: Mutex<Option<File>>,
}

impl Logger {
    /// Registers the logger with the `log` facade.
    pub fn init(&'static self) -> Result<(), LoggerInitError> {
        log::set_logger(self)?;
        log::set_max_level(DEFAULT_LEVEL);
        Ok(())
    }

    /// Sets the level and, when a path is given, redirects the output to that file.
    pub fn update(&self, config: LoggerConfig) -> Result<(), LoggerUpdateError> {
        if let Some(path) = config.log_path {
            // A named pipe without a reader must not block logging.
            let file = std::fs::OpenOptions::new()
                .custom_flags(libc::O_NONBLOCK)
                .create(true)
                .append(true)
                .open(path)
                .map_err(LoggerUpdateError)?;
            *self.lock() = Some(file);
        }
        log::set_max_level(config.level.unwrap_or(DEFAULT_LEVEL));
        Ok(())
    }

    // A panic while logging must not silence the logger for the rest of the process.
    fn lock(&self) -> MutexGuard<'_, Option<File>> {
        self.target.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn format_record(record: &Record) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!(
        "{}.{:06} [{LOG_SOURCE}:{}:{}] {}\n",
        now.as_secs(),
        now.subsec_micros(),
        std::process::id(),
        record.level(),
        record.args()
    )
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        let line = format_record(record);
        let mut target = self.lock();
        // Nowhere left to report a failed write.
        let _ = match target.as_mut() {
            Some(file) => file.write_all(line.as_bytes()),
            None => std::io::stderr().write_all(line.as_bytes()),
        };
    }

    fn flush(&self) {}
}
