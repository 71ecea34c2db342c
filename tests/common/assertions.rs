//! Domain-specific assertion macros for auditlog harnesses.
//!
//! These wrap `pretty_assertions` and add context-rich failure messages that
//! make it clear *which* property of a normalized line was violated.

/// Assert that a line is valid JSON and return the parsed value.
///
/// ```rust
/// let value = assert_valid_json!(line);
/// ```
#[macro_export]
macro_rules! assert_valid_json {
    ($line:expr) => {{
        let line: &str = &$line;
        match serde_json::from_str::<serde_json::Value>(line) {
            Ok(value) => value,
            Err(err) => panic!(
                "assert_valid_json! failed:\n  line:  {:?}\n  error: {}",
                line, err
            ),
        }
    }};
}

/// Assert that every object in a line has its keys in sorted order.
#[macro_export]
macro_rules! assert_keys_sorted {
    ($line:expr) => {{
        let line: &str = &$line;
        if let Err(path) = $crate::common::assertions::check_sorted(line) {
            panic!(
                "assert_keys_sorted! failed at {}:\n  line: {:?}",
                path, line
            );
        }
    }};
}

enum Frame {
    Object { last: Option<String>, expect_key: bool },
    Array,
}

/// Scan a line's text and return a description of the first object whose
/// keys are not strictly increasing. Works on the raw text because parsing
/// into `serde_json::Value` would not preserve key order.
pub fn check_sorted(line: &str) -> Result<(), String> {
    let mut stack: Vec<Frame> = Vec::new();
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '{' => stack.push(Frame::Object {
                last: None,
                expect_key: true,
            }),
            '[' => stack.push(Frame::Array),
            '}' | ']' => {
                stack.pop();
            }
            ',' => {
                if let Some(Frame::Object { expect_key, .. }) = stack.last_mut() {
                    *expect_key = true;
                }
            }
            '"' => {
                let text = read_string(&mut chars);
                if let Some(Frame::Object { last, expect_key }) = stack.last_mut() {
                    if *expect_key {
                        if let Some(prev) = last.as_deref() {
                            if prev >= text.as_str() {
                                return Err(format!("key {text:?} after {prev:?}"));
                            }
                        }
                        *last = Some(text);
                        *expect_key = false;
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn read_string(chars: &mut std::str::Chars<'_>) -> String {
    let mut out = String::new();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push(c);
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            '"' => break,
            other => out.push(other),
        }
    }
    out
}
