use serde_json::Value;

/// Placeholder the provider uses for values it could not resolve
pub const UNKNOWN_SENTINEL: &str = "Unknown";

/// Decide whether a record value should be sent for translation.
///
/// Only non-blank strings qualify. Absent values, the `"Unknown"` placeholder,
/// numbers, booleans, objects and arrays are passed through untouched.
pub fn is_translatable(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) if s == UNKNOWN_SENTINEL => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Same rules for values that are already plain strings
pub fn is_translatable_text(text: &str) -> bool {
    text != UNKNOWN_SENTINEL && !text.trim().is_empty()
}
