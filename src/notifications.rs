//! Notifications
//!
//! Human-readable messages raised after cart changes and simulated terminal
//! actions. They are informational only: nothing reads them back to make a
//! decision.

use std::fmt;

/// How a notice should be presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Severity {
    /// Confirmation of something that happened
    #[default]
    Info,

    /// A blocked action the user has to fix
    Destructive,
}

/// A title, description and severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Short headline
    pub title: String,

    /// Longer explanation
    pub description: String,

    /// Presentation severity
    pub severity: Severity,
}

impl Notice {
    /// An informational notice.
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Info,
        }
    }

    /// A destructive (warning) notice.
    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Destructive,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}

/// Receives notices. The display layer decides how they surface.
pub trait NotificationSink {
    /// Deliver a notice.
    fn notify(&mut self, notice: Notice);
}

impl<S: NotificationSink + ?Sized> NotificationSink for &mut S {
    fn notify(&mut self, notice: Notice) {
        (**self).notify(notice);
    }
}

/// Emits every notice as a `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&mut self, notice: Notice) {
        match notice.severity {
            Severity::Info => {
                tracing::info!(title = %notice.title, "{}", notice.description);
            }
            Severity::Destructive => {
                tracing::warn!(title = %notice.title, "{}", notice.description);
            }
        }
    }
}

/// Keeps every notice in memory, oldest first.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    notices: Vec<Notice>,
}

impl RecordingSink {
    /// Create an empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All notices received so far.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// The most recent notice.
    pub fn last(&self) -> Option<&Notice> {
        self.notices.last()
    }

    /// Remove and return all notices.
    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_severity() {
        assert_eq!(Notice::info("a", "b").severity, Severity::Info);
        assert_eq!(Notice::destructive("a", "b").severity, Severity::Destructive);
    }

    #[test]
    fn display_joins_title_and_description() {
        let notice = Notice::info("Perfil actualizado", "Tus datos han sido guardados.");

        assert_eq!(
            notice.to_string(),
            "Perfil actualizado: Tus datos han sido guardados."
        );
    }

    #[test]
    fn recording_sink_keeps_order() {
        let mut sink = RecordingSink::new();

        sink.notify(Notice::info("first", ""));
        sink.notify(Notice::destructive("second", ""));

        assert_eq!(sink.notices().len(), 2);
        assert_eq!(sink.last().map(|n| n.title.as_str()), Some("second"));

        let drained = sink.drain();
        assert_eq!(drained.len(), 2);
        assert!(sink.notices().is_empty());
    }

    fn deliver(mut sink: impl NotificationSink) {
        sink.notify(Notice::info("forwarded", ""));
    }

    #[test]
    fn mutable_references_forward_notices() {
        let mut sink = RecordingSink::new();

        deliver(&mut sink);
        deliver(&mut sink);

        assert_eq!(sink.notices().len(), 2);
    }

    #[test]
    fn tracing_sink_accepts_both_severities() {
        let mut sink = TracingSink;

        sink.notify(Notice::info("ok", "fine"));
        sink.notify(Notice::destructive("careful", "blocked"));
    }
}
