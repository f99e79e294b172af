use crate::state::Alert;
use chrono::Local;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
        })
    }
}

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("failed to open alert log {path}: {source}")]
    Open {
        path: String,
        source: io::Error,
    },
}

/// Append-only, line-oriented log. Every line is flushed as it is written.
pub struct Journal<W> {
    writer: W,
}

impl Journal<File> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, JournalError> {
        let path_ref = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path_ref)
            .map_err(|source| JournalError::Open {
                path: path_ref.display().to_string(),
                source,
            })?;
        Ok(Self::new(file))
    }
}

impl<W: Write> Journal<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn append(&mut self, severity: Severity, message: &str) -> io::Result<()> {
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S,%3f");
        writeln!(self.writer, "{stamp} - {severity} - {message}")?;
        self.writer.flush()
    }

    #[cfg(test)]
    pub fn get_ref(&self) -> &W {
        &self.writer
    }
}

pub trait AlertSink {
    fn dispatch(&mut self, alert: &Alert);
}

/// Operator-facing lifecycle messages that are not alerts.
pub trait StatusLog {
    /// Info-level journal entry, mirrored to tracing.
    fn notice(&mut self, message: &str);
    /// Console-only line.
    fn say(&mut self, line: &str);
}

/// Records alerts in the journal and shows them on the console. Each side
/// effect is attempted even if the other one fails.
pub struct AlertLog<J, C> {
    journal: Journal<J>,
    console: C,
}

impl<J: Write, C: Write> AlertLog<J, C> {
    pub fn new(journal: Journal<J>, console: C) -> Self {
        Self { journal, console }
    }

    #[cfg(test)]
    pub fn journal(&self) -> &Journal<J> {
        &self.journal
    }

    #[cfg(test)]
    pub fn console(&self) -> &C {
        &self.console
    }
}

impl<J: Write, C: Write> AlertSink for AlertLog<J, C> {
    fn dispatch(&mut self, alert: &Alert) {
        let line = format!("🚨 ALERT [{}]: {}", alert.kind, alert.message);

        warn!(kind = %alert.kind, message = %alert.message, "threshold exceeded");
        if let Err(err) = self.journal.append(Severity::Warning, &line) {
            error!(error = %err, "failed to write alert log");
        }
        self.say(&format!("\n{line}\n"));
    }
}

impl<J: Write, C: Write> StatusLog for AlertLog<J, C> {
    fn notice(&mut self, message: &str) {
        info!("{message}");
        if let Err(err) = self.journal.append(Severity::Info, message) {
            error!(error = %err, "failed to write alert log");
        }
    }

    fn say(&mut self, line: &str) {
        if let Err(err) = writeln!(self.console, "{line}").and_then(|_| self.console.flush()) {
            error!(error = %err, "failed to write to console");
        }
    }
}
