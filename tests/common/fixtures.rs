//! Static corpora used across harnesses.
//!
//! Each corpus is a `&'static [&'static str]` of representative lines as an
//! upstream log source would hand them over.

/// Valid JSON lines in various shapes.
pub const CORPUS_JSON: &[&str] = &[
    r#"{"ts":"2024-01-15T10:00:00Z","level":"INFO","message":"Server started","port":8080}"#,
    r#"{"timestamp":"2024-01-15T10:00:01Z","severity":"ERROR","msg":"Connection refused","host":"db.internal","port":5432}"#,
    r#"{"user":{"id":42,"name":"zoë"},"action":"login","ok":true,"attempts":[1,2,3]}"#,
    r#"{"request_id":"req-abc123","latency_ms":47.5,"tags":[],"meta":{}}"#,
    r#"["not", "a", "mapping"]"#,
    r#""just a string""#,
    "null",
    "12345",
];

/// Lines that are not JSON and must pass through `parse` unchanged.
pub const CORPUS_MALFORMED: &[&str] = &[
    "2024-01-15 10:00:00 INFO  Starting application version 2.4.1",
    "Jan 15 10:00:02 myhost sshd[12345]: Failed password for invalid user admin",
    "ts=2024-01-15T10:00:00Z level=info msg=\"Server started\"",
    "{\"unterminated\": ",
    "{'single': 'quotes'}",
    "[1, 2,]",
    "NaN",
    "",
];

/// Audit-style payloads with non-ASCII text.
pub const CORPUS_UNICODE: &[&str] = &[
    r#"{"msg":"café"}"#,
    r#"{"object_repr":"Grüße aus München","user":"jürgen"}"#,
    r#"{"msg":"日本語のログ","emoji":"🔒"}"#,
];
