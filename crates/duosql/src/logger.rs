//! Dual-stream append-only log writer.
//!
//! One [`Logger`] lives for the process lifetime and owns two independent
//! streams: `init.log` for startup events and `action.log` for statement
//! activity. Every entry is timestamped, mirrored to stdout, and flushed
//! immediately. Entries also surface as `tracing` events so a host
//! subscriber observes them without tailing the files.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::DbResult;

/// A process-wide logger with separate init and action streams.
#[derive(Debug)]
pub struct Logger {
    init: LogStream,
    action: LogStream,
    path: PathBuf,
}

impl Logger {
    /// Create the log directory and open both streams in append mode.
    pub fn open(path: impl Into<PathBuf>) -> DbResult<Logger> {
        let path = path.into();
        std::fs::create_dir_all(&path)?;
        Ok(Logger {
            init: LogStream::open(path.join("init.log"))?,
            action: LogStream::open(path.join("action.log"))?,
            path,
        })
    }

    /// Write an entry to the init stream.
    pub fn init(&self, is_error: bool, lines: &[&str]) {
        self.init.write(is_error, lines);
        emit_trace("init", is_error, lines);
    }

    /// Write an entry to the action stream.
    pub fn action(&self, is_error: bool, lines: &[&str]) {
        self.action.write(is_error, lines);
        emit_trace("action", is_error, lines);
    }

    /// The directory both log files live in.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Debug)]
struct LogStream {
    file: Mutex<File>,
}

impl LogStream {
    fn open(path: PathBuf) -> std::io::Result<LogStream> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(LogStream {
            file: Mutex::new(file),
        })
    }

    fn write(&self, is_error: bool, lines: &[&str]) {
        if lines.is_empty() {
            return;
        }
        let stamp = chrono::Local::now().format("%Y/%m/%d %H:%M:%S");
        // Hold the lock for the whole entry so tree lines stay contiguous.
        let mut file = self.file.lock().unwrap();
        for line in render_tree(is_error, lines) {
            let entry = format!("{stamp} {line}\n");
            let _ = file.write_all(entry.as_bytes());
            print!("{entry}");
        }
        let _ = file.flush();
    }
}

/// Render a multi-line entry as a tree: first line plain (tagged `[ERROR]`
/// when applicable), middle lines `├──`, last line `└──`.
fn render_tree(is_error: bool, lines: &[&str]) -> Vec<String> {
    let tag = if is_error { "[ERROR] " } else { "" };
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                format!("{tag}{line}")
            } else if i == lines.len() - 1 {
                format!("└── {line}")
            } else {
                format!("├── {line}")
            }
        })
        .collect()
}

fn emit_trace(stream: &'static str, is_error: bool, lines: &[&str]) {
    if lines.is_empty() {
        return;
    }
    let message = lines.join(" | ");
    if is_error {
        tracing::error!(target: "duosql", stream, "{message}");
    } else {
        tracing::info!(target: "duosql", stream, "{message}");
    }
}
