//! Normalizer — turns [`Event`] values into canonical JSON log lines.
//!
//! Output is deterministic: mapping keys are sorted at every nesting level,
//! non-ASCII text is written literally, and items are separated the way the
//! downstream log tooling expects (`{"a": 1, "b": [1, 2]}`).

use std::io;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;
use serde_json::Value as Json;

use crate::error::{EmitError, SerializationError};
use crate::sink::LoggingSink;
use crate::types::{Event, Extra, FieldValue, Opaque, Severity};

// ---------------------------------------------------------------------------
// Fallback rendering
// ---------------------------------------------------------------------------

/// Renders values that have no native JSON form.
///
/// Any `Fn(&dyn Opaque) -> anyhow::Result<String>` closure is a fallback.
/// Returning `Err` aborts serialization with
/// [`SerializationError::Fallback`].
pub trait Fallback {
    fn render(&self, value: &dyn Opaque) -> anyhow::Result<String>;
}

impl<F> Fallback for F
where
    F: Fn(&dyn Opaque) -> anyhow::Result<String>,
{
    fn render(&self, value: &dyn Opaque) -> anyhow::Result<String> {
        self(value)
    }
}

/// Default fallback: the value's `Debug` representation.
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugRepr;

impl Fallback for DebugRepr {
    fn render(&self, value: &dyn Opaque) -> anyhow::Result<String> {
        Ok(format!("{value:?}"))
    }
}

// ---------------------------------------------------------------------------
// Public operations
// ---------------------------------------------------------------------------

/// Deepest array/object nesting `parse` will decode. Deeper input is kept
/// as text.
pub const MAX_DEPTH: usize = 512;

/// Parse a raw line as JSON, or keep it as text if it is not valid JSON.
///
/// Never fails: malformed input comes back unchanged as [`Event::Text`].
/// Numbers keep their exact text, so integers wider than 64 bits and long
/// decimals survive a parse/serialize round trip.
pub fn parse(raw: &str) -> Event {
    let depth = nesting_depth(raw);
    if depth > MAX_DEPTH {
        tracing::trace!(depth, max = MAX_DEPTH, "line nested too deeply, keeping as text");
        return Event::Text(raw.to_string());
    }

    match decode(raw) {
        Ok(value) => Event::Structured(FieldValue::from(value)),
        Err(err) => {
            tracing::trace!(error = %err, "line is not JSON, keeping as text");
            Event::Text(raw.to_string())
        }
    }
}

/// Serialize an event with the [`DebugRepr`] fallback.
pub fn serialize(event: &Event) -> Result<String, SerializationError> {
    serialize_with(event, &DebugRepr)
}

/// Serialize an event, rendering opaque values with `fallback`.
///
/// A text event becomes a quoted JSON string, never the bare text.
pub fn serialize_with<F>(event: &Event, fallback: &F) -> Result<String, SerializationError>
where
    F: Fallback + ?Sized,
{
    match event {
        Event::Structured(value) => write_line(&Canonical(&resolve(value, fallback)?)),
        Event::Text(text) => write_line(text),
    }
}

/// Serialize `event` and hand it to the sink method matching `severity`.
///
/// The sink is called exactly once, and only if serialization succeeded.
pub fn emit<S>(sink: &S, event: &Event, severity: Severity, extra: &Extra) -> Result<(), EmitError>
where
    S: LoggingSink + ?Sized,
{
    emit_with(sink, event, severity, extra, &DebugRepr)
}

/// Like [`emit`], rendering opaque values with `fallback`.
pub fn emit_with<S, F>(
    sink: &S,
    event: &Event,
    severity: Severity,
    extra: &Extra,
    fallback: &F,
) -> Result<(), EmitError>
where
    S: LoggingSink + ?Sized,
    F: Fallback + ?Sized,
{
    let message = serialize_with(event, fallback)?;
    sink.log(severity, &message, extra).map_err(EmitError::Sink)
}

/// Like [`emit`], with the severity given by name. Unrecognised names log at
/// debug.
pub fn emit_named<S>(sink: &S, event: &Event, level: &str, extra: &Extra) -> Result<(), EmitError>
where
    S: LoggingSink + ?Sized,
{
    emit(sink, event, Severity::from_name(level), extra)
}

// ---------------------------------------------------------------------------
// Encoding internals
// ---------------------------------------------------------------------------

fn resolve<F>(value: &FieldValue, fallback: &F) -> Result<Json, SerializationError>
where
    F: Fallback + ?Sized,
{
    Ok(match value {
        FieldValue::Null => Json::Null,
        FieldValue::Bool(b) => Json::Bool(*b),
        FieldValue::Number(n) => Json::Number(n.clone()),
        FieldValue::String(s) => Json::String(s.clone()),
        FieldValue::Array(items) => Json::Array(
            items
                .iter()
                .map(|item| resolve(item, fallback))
                .collect::<Result<_, _>>()?,
        ),
        FieldValue::Object(fields) => Json::Object(
            fields
                .iter()
                .map(|(key, item)| -> Result<_, SerializationError> {
                    Ok((key.clone(), resolve(item, fallback)?))
                })
                .collect::<Result<_, _>>()?,
        ),
        FieldValue::Opaque(object) => {
            let object: &dyn Opaque = &**object;
            let rendered = fallback
                .render(object)
                .map_err(|source| SerializationError::Fallback {
                    type_name: object.type_name(),
                    source,
                })?;
            Json::String(rendered)
        }
    })
}

/// Decode without serde_json's fixed recursion limit; `serde_stacker` grows
/// the stack on demand while nesting stays within [`MAX_DEPTH`].
fn decode(raw: &str) -> serde_json::Result<Json> {
    let mut de = serde_json::Deserializer::from_str(raw);
    de.disable_recursion_limit();
    let value = Json::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

/// Maximum bracket nesting outside string literals.
fn nesting_depth(raw: &str) -> usize {
    let (mut depth, mut max) = (0usize, 0usize);
    let (mut in_string, mut escaped) = (false, false);

    for byte in raw.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                max = max.max(depth);
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    max
}

fn write_line<T: Serialize + ?Sized>(value: &T) -> Result<String, SerializationError> {
    let mut buf = Vec::with_capacity(128);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, LogLineFormatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8(buf)?)
}

/// Serializes a JSON value with object keys in code-point order, whatever
/// order the underlying map iterates in.
struct Canonical<'a>(&'a Json);

impl Serialize for Canonical<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Json::Object(map) => {
                let mut entries: Vec<_> = map.iter().collect();
                entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
                let mut out = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    out.serialize_entry(key, &Canonical(value))?;
                }
                out.end()
            }
            Json::Array(items) => serializer.collect_seq(items.iter().map(Canonical)),
            other => other.serialize(serializer),
        }
    }
}

/// Compact JSON with a space after `,` and `:`.
struct LogLineFormatter;

impl serde_json::ser::Formatter for LogLineFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
