//! In-app log panel capture
//!
//! Records go to a bounded buffer rendered by the log panel. The terminal
//! only sees errors so the alternate screen stays readable.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use anyhow::Context as _;
use chrono::{DateTime, Local};
use log::{Level, Log, Metadata, Record};

const MAX_LOG_ENTRIES: usize = 1000;

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: Level,
    pub target: String,
    pub message: String,
}

/// Buffer shared between the logger and the log panel
pub type LogBuffer = Arc<Mutex<VecDeque<LogEntry>>>;

pub fn create_buffer() -> LogBuffer {
    Arc::new(Mutex::new(VecDeque::with_capacity(MAX_LOG_ENTRIES)))
}

/// Append an entry, dropping the oldest one once the buffer is full
pub fn push_entry(logs: &LogBuffer, entry: LogEntry) {
    if let Ok(mut logs) = logs.lock() {
        if logs.len() >= MAX_LOG_ENTRIES {
            logs.pop_front();
        }
        logs.push_back(entry);
    }
}

pub fn entry_count(logs: &LogBuffer) -> usize {
    logs.lock().map(|logs| logs.len()).unwrap_or(0)
}

pub struct CaptureLogger {
    logs: LogBuffer,
    terminal: env_logger::Logger,
    panel_filter: env_logger::Logger,
}

impl CaptureLogger {
    pub fn new(logs: LogBuffer) -> Self {
        let terminal = env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Error)
            .build();

        // RUST_LOG wins; otherwise only the demo and the library at Debug
        let panel_filter = if std::env::var("RUST_LOG").is_ok() {
            env_logger::Builder::from_default_env().build()
        } else {
            env_logger::Builder::new()
                .filter_module("tui_commands_demo", log::LevelFilter::Debug)
                .filter_module("tui_commands", log::LevelFilter::Debug)
                .build()
        };

        Self {
            logs,
            terminal,
            panel_filter,
        }
    }
}

impl Log for CaptureLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.panel_filter.enabled(metadata) || self.terminal.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if self.panel_filter.enabled(record.metadata()) {
            push_entry(
                &self.logs,
                LogEntry {
                    timestamp: Local::now(),
                    level: record.level(),
                    target: record.target().to_string(),
                    message: record.args().to_string(),
                },
            );
        }

        if self.terminal.enabled(record.metadata()) {
            self.terminal.log(record);
        }
    }

    fn flush(&self) {
        self.terminal.flush();
    }
}

/// Install the capture logger; call once before anything logs
pub fn init_logger() -> anyhow::Result<LogBuffer> {
    let logs = create_buffer();
    let logger = CaptureLogger::new(logs.clone());

    log::set_boxed_logger(Box::new(logger)).context("Failed to initialize logger")?;
    log::set_max_level(log::LevelFilter::Debug);

    log::info!("Log panel ready - press ` to toggle");
    Ok(logs)
}
