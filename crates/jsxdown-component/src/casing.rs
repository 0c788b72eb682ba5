//! Key casing for exported front matter.

use serde_json::{Map, Value};

/// Camel-case a separator-delimited key: `foo-bar`, `foo_bar` and `foo.bar`
/// all become `fooBar`.
///
/// A separator is dropped when it ends the key and kept when it is not
/// followed by a word character.
pub fn camelize(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut chars = key.chars().peekable();

    while let Some(c) = chars.next() {
        if !is_separator(c) {
            out.push(c);
            continue;
        }

        match chars.peek().copied() {
            Some(next) if is_word(next) => {
                out.extend(next.to_uppercase());
                chars.next();
            }
            Some(_) => out.push(c),
            None => {}
        }
    }

    out
}

/// Camel-case every mapping key in `value`, descending into nested mappings
/// and sequences. Non-key strings are left alone.
pub fn camelize_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(camelize_map(map)),
        Value::Array(items) => Value::Array(items.iter().map(camelize_keys).collect()),
        other => other.clone(),
    }
}

/// Camel-case the keys of a mapping, recursively.
pub fn camelize_map(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .map(|(key, value)| (camelize(key), camelize_keys(value)))
        .collect()
}

fn is_separator(c: char) -> bool {
    matches!(c, '-' | '_' | '.')
}

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
