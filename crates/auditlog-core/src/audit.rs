//! Audit entry mirror — copies admin audit-log writes into the security log.
//!
//! Every time an [`AuditEntry`] is saved, [`SecurityMirror::record_saved`]
//! builds an event describing the write and emits it through the security
//! sink. Timestamps, users and content types travel as opaque values and are
//! rendered by the normalizer's fallback.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::error::EmitError;
use crate::normalizer;
use crate::sink::LoggingSink;
use crate::types::{Event, Extra, FieldValue, Fields, Severity};

/// Kind of change an audit entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionFlag {
    Addition,
    Change,
    Deletion,
}

impl ActionFlag {
    pub fn code(self) -> u8 {
        match self {
            ActionFlag::Addition => 1,
            ActionFlag::Change => 2,
            ActionFlag::Deletion => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(ActionFlag::Addition),
            2 => Some(ActionFlag::Change),
            3 => Some(ActionFlag::Deletion),
            _ => None,
        }
    }

    /// Human-readable action name.
    pub fn description(self) -> &'static str {
        match self {
            ActionFlag::Addition => "Addition",
            ActionFlag::Change => "Change",
            ActionFlag::Deletion => "Deletion",
        }
    }
}

impl fmt::Display for ActionFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// The staff account that performed an audited action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: u64,
    pub username: String,
    pub is_staff: bool,
}

/// Model the audited object belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    pub app_label: String,
    pub model: String,
}

/// One row of the admin audit log.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEntry {
    pub id: u64,
    pub action_time: DateTime<Utc>,
    pub user: Actor,
    pub content_type: Option<ContentType>,
    pub object_id: Option<String>,
    pub object_repr: String,
    pub action_flag: ActionFlag,
    pub change_message: String,
}

/// Emits a security-log event for every saved [`AuditEntry`].
#[derive(Debug)]
pub struct SecurityMirror<S> {
    sink: S,
    severity: Severity,
}

impl<S: LoggingSink> SecurityMirror<S> {
    /// Mirror into `sink` at info level.
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            severity: Severity::Info,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Build the event describing a save of `entry`.
    ///
    /// `context` carries whatever the save notification supplied alongside
    /// the entry (database alias, raw flag, updated fields, …).
    pub fn event_for(sender: &str, entry: &AuditEntry, created: bool, context: Fields) -> Event {
        let verb = if created { "created" } else { "updated" };
        let content_type = entry
            .content_type
            .clone()
            .map(FieldValue::opaque)
            .unwrap_or(FieldValue::Null);

        Event::record([
            ("msg", FieldValue::from(format!("LogEntry {} was {verb}\n", entry.id))),
            ("action_time", FieldValue::opaque(entry.action_time)),
            ("user", FieldValue::opaque(entry.user.clone())),
            ("content_type", content_type),
            ("object_id", FieldValue::from(entry.object_id.clone())),
            ("object_repr", FieldValue::from(entry.object_repr.clone())),
            ("action_flag", FieldValue::from(entry.action_flag.code())),
            ("change_message", FieldValue::from(entry.change_message.clone())),
            ("sender", FieldValue::from(sender)),
            ("kwargs", FieldValue::Object(context)),
        ])
    }

    /// Emit the event for a save of `entry` through the security sink.
    pub fn record_saved(
        &self,
        sender: &str,
        entry: &AuditEntry,
        created: bool,
        context: Fields,
    ) -> Result<(), EmitError> {
        let event = Self::event_for(sender, entry, created, context);
        tracing::trace!(entry = entry.id, created, "mirroring audit entry");
        normalizer::emit(&self.sink, &event, self.severity, &Extra::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn entry(flag: ActionFlag) -> AuditEntry {
        AuditEntry {
            id: 17,
            action_time: Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
            user: Actor {
                id: 1,
                username: "admin".to_string(),
                is_staff: true,
            },
            content_type: Some(ContentType {
                app_label: "polls".to_string(),
                model: "question".to_string(),
            }),
            object_id: Some("4".to_string()),
            object_repr: "What's new?".to_string(),
            action_flag: flag,
            change_message: "[]".to_string(),
        }
    }

    #[test]
    fn action_codes_round_trip() {
        for flag in [ActionFlag::Addition, ActionFlag::Change, ActionFlag::Deletion] {
            assert_eq!(ActionFlag::from_code(flag.code()), Some(flag));
        }
        assert_eq!(ActionFlag::from_code(0), None);
        assert_eq!(ActionFlag::Deletion.to_string(), "Deletion");
    }

    #[test]
    fn event_message_reflects_created_flag() {
        let created = SecurityMirror::<MemorySink>::event_for(
            "AuditEntry",
            &entry(ActionFlag::Addition),
            true,
            Fields::new(),
        );
        let updated = SecurityMirror::<MemorySink>::event_for(
            "AuditEntry",
            &entry(ActionFlag::Change),
            false,
            Fields::new(),
        );
        assert_eq!(
            created.fields().unwrap()["msg"].as_str(),
            Some("LogEntry 17 was created\n")
        );
        assert_eq!(
            updated.fields().unwrap()["msg"].as_str(),
            Some("LogEntry 17 was updated\n")
        );
    }

    #[test]
    fn record_saved_emits_once_at_info() {
        let mirror = SecurityMirror::new(MemorySink::new());
        let context = Fields::from([("using".to_string(), FieldValue::from("default"))]);
        mirror
            .record_saved("AuditEntry", &entry(ActionFlag::Deletion), true, context)
            .unwrap();

        let records = mirror.sink().records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].severity, Severity::Info);

        let line: serde_json::Value = serde_json::from_str(&records[0].message).unwrap();
        assert_eq!(line["action_flag"], 3);
        assert_eq!(line["action_time"], "2024-01-15T10:00:00Z");
        assert_eq!(line["kwargs"]["using"], "default");
        assert_eq!(line["object_id"], "4");
    }

    #[test]
    fn missing_content_type_is_null() {
        let mut e = entry(ActionFlag::Change);
        e.content_type = None;
        e.object_id = None;
        let event = SecurityMirror::<MemorySink>::event_for("AuditEntry", &e, false, Fields::new());
        let fields = event.fields().unwrap();
        assert_eq!(fields["content_type"], FieldValue::Null);
        assert_eq!(fields["object_id"], FieldValue::Null);
    }

    #[test]
    fn severity_is_configurable() {
        let mirror = SecurityMirror::new(MemorySink::new()).with_severity(Severity::Warning);
        mirror
            .record_saved("AuditEntry", &entry(ActionFlag::Change), false, Fields::new())
            .unwrap();
        assert_eq!(mirror.sink().records().unwrap()[0].severity, Severity::Warning);
    }
}
