/*!
 * Lookup progress events and their dispatch.
 *
 * Events are plain data returned with every lookup. Showing them to a user is
 * the job of a `NotificationSink` chosen by the caller.
 */

use std::fmt;
use std::sync::Mutex;

use log::{error, info, warn};

/// Severity of a user-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        write!(f, "{}", name)
    }
}

/// Something that happened during a lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupEvent {
    /// A search for the title is starting
    Matching { title: String },
    /// Neither the original nor the cleaned keyword found a song
    SongNotFound { title: String },
    /// Lyrics were produced
    MatchSucceeded { matched: usize, word_lines: usize },
    /// A song was found but its tracks merged to nothing
    NoLyrics { title: String },
    /// A collaborator failed; the lookup was abandoned
    LookupFailed { message: String },
}

impl LookupEvent {
    pub fn severity(&self) -> Severity {
        match self {
            Self::Matching { .. } | Self::MatchSucceeded { .. } => Severity::Success,
            Self::SongNotFound { .. } | Self::NoLyrics { .. } => Severity::Warning,
            Self::LookupFailed { .. } => Severity::Error,
        }
    }

    /// Message suitable for a toast
    pub fn message(&self) -> String {
        match self {
            Self::Matching { title } => format!("Matching: {}", title),
            Self::SongNotFound { title } => format!("Song not found: {}", title),
            Self::MatchSucceeded { word_lines: 0, .. } => "Lyrics matched".to_string(),
            Self::MatchSucceeded { matched, word_lines } => {
                format!("Lyrics matched ({}/{} word-level lines aligned)", matched, word_lines)
            }
            Self::NoLyrics { title } => format!("No lyrics available: {}", title),
            Self::LookupFailed { message } => format!("Lookup failed: {}", message),
        }
    }
}

/// Receiver of user-facing messages
pub trait NotificationSink: Send + Sync {
    fn notify(&self, severity: Severity, message: &str);
}

/// Sink that writes messages to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Success => info!("{}", message),
            Severity::Warning => warn!("{}", message),
            Severity::Error => error!("{}", message),
        }
    }
}

/// Sink that keeps every message in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<(Severity, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far, oldest first
    pub fn messages(&self) -> Vec<(Severity, String)> {
        match self.messages.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl NotificationSink for MemorySink {
    fn notify(&self, severity: Severity, message: &str) {
        let mut guard = match self.messages.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push((severity, message.to_string()));
    }
}
