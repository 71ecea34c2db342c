//! Test builders — ergonomic constructors for events and audit entries.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use auditlog_core::audit::{ActionFlag, Actor, AuditEntry, ContentType};
use auditlog_core::{Event, FieldValue, Fields, Opaque};
use chrono::{TimeZone, Utc};

// ---------------------------------------------------------------------------
// EventBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for mapping [`Event`] fixtures.
///
/// # Example
///
/// ```rust
/// let event = EventBuilder::new()
///     .field("msg", "login failed")
///     .field("attempt", 3)
///     .opaque("at", Utc::now())
///     .build();
/// ```
#[derive(Default)]
pub struct EventBuilder {
    fields: Fields,
}

impl EventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn opaque<T: Opaque>(mut self, key: impl Into<String>, value: T) -> Self {
        self.fields.insert(key.into(), FieldValue::opaque(value));
        self
    }

    pub fn build(self) -> Event {
        Event::from(self.fields)
    }
}

// ---------------------------------------------------------------------------
// Audit entries
// ---------------------------------------------------------------------------

pub fn staff_actor() -> Actor {
    Actor {
        id: 1,
        username: "admin".to_string(),
        is_staff: true,
    }
}

/// An audit entry for `polls.question` #4 at a fixed time.
pub fn audit_entry(id: u64, flag: ActionFlag) -> AuditEntry {
    AuditEntry {
        id,
        action_time: Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
        user: staff_actor(),
        content_type: Some(ContentType {
            app_label: "polls".to_string(),
            model: "question".to_string(),
        }),
        object_id: Some("4".to_string()),
        object_repr: "What's up?".to_string(),
        action_flag: flag,
        change_message: r#"[{"changed": {"fields": ["Question text"]}}]"#.to_string(),
    }
}
