//! Blocking user notices raised when a backend call fails.

use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            message: message.into(),
        }
    }
}

pub trait NoticeSink: Send + Sync {
    fn show(&self, notice: &Notice);
}

/// Writes notices to the log. Used when no interactive surface is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotice;

impl NoticeSink for LogNotice {
    fn show(&self, notice: &Notice) {
        log::error!("{}: {}", notice.title, notice.message);
    }
}

/// Keeps every notice so tests can inspect what the user would have seen.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotice {
    shown: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.shown.lock().map(|n| n.clone()).unwrap_or_default()
    }
}

impl NoticeSink for RecordingNotice {
    fn show(&self, notice: &Notice) {
        if let Ok(mut shown) = self.shown.lock() {
            shown.push(notice.clone());
        }
    }
}
