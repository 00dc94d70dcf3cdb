//! Transient user-facing notices.

use std::fmt;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        write!(f, "[{}] {}", level, self.message)
    }
}

/// Destination for notices. Delivery is best effort.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Forwards notices over a bounded channel, dropping them when it is full
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<Notice>,
}

impl ChannelSink {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Notice>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }
}

impl NotificationSink for ChannelSink {
    fn notify(&self, notice: Notice) {
        if let Err(e) = self.tx.try_send(notice) {
            debug!("Dropped notice: {}", e.into_inner());
        }
    }
}

/// Writes notices to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => info!(notice = %notice.message),
            NoticeLevel::Warning => warn!(notice = %notice.message),
            NoticeLevel::Error => error!(notice = %notice.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_sink_delivers_in_order() {
        let (sink, mut rx) = ChannelSink::new(4);
        sink.notify(Notice::info("one"));
        sink.notify(Notice::error("two"));

        assert_eq!(rx.try_recv().unwrap(), Notice::info("one"));
        assert_eq!(rx.try_recv().unwrap().level, NoticeLevel::Error);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_channel_sink_drops_when_full() {
        let (sink, mut rx) = ChannelSink::new(1);
        sink.notify(Notice::warning("kept"));
        sink.notify(Notice::warning("dropped"));

        assert_eq!(rx.try_recv().unwrap().message, "kept");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_channel_sink_survives_closed_receiver() {
        let (sink, rx) = ChannelSink::new(1);
        drop(rx);
        sink.notify(Notice::info("nobody listening"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Notice::warning("careful").to_string(), "[warning] careful");
    }
}
