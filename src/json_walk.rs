//! Depth-first search for string values stored under particular keys,
//! anywhere inside a nested JSON document.

use serde_json::Value;
use std::collections::HashSet;

/// Nesting limit for strings that themselves contain JSON documents.
const MAX_EMBEDDED_DEPTH: usize = 4;

/// Collect every string found directly under any of `keys`, in document
/// order, without duplicates.
///
/// String values that are themselves JSON objects or arrays (a common way for
/// pages to ship state blobs) are parsed and searched as well.
pub fn strings_under_keys(root: &Value, keys: &[&str]) -> Vec<String> {
    let mut collector = Collector {
        keys,
        seen: HashSet::new(),
        found: Vec::new(),
    };
    collector.visit(root, None, 0);
    collector.found
}

/// Collect every value found directly under `key`, in document order.
pub fn values_under_key<'a>(root: &'a Value, key: &str) -> Vec<&'a Value> {
    let mut found = Vec::new();
    collect_values(root, key, &mut found);
    found
}

fn collect_values<'a>(value: &'a Value, key: &str, found: &mut Vec<&'a Value>) {
    match value {
        Value::Object(map) => {
            for (k, child) in map {
                if k == key {
                    found.push(child);
                }
                collect_values(child, key, found);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_values(item, key, found);
            }
        }
        _ => {}
    }
}

struct Collector<'k> {
    keys: &'k [&'k str],
    seen: HashSet<String>,
    found: Vec<String>,
}

impl Collector<'_> {
    fn visit(&mut self, value: &Value, key: Option<&str>, embedded_depth: usize) {
        match value {
            Value::Object(map) => {
                for (k, v) in map {
                    self.visit(v, Some(k), embedded_depth);
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.visit(item, key, embedded_depth);
                }
            }
            Value::String(s) => {
                if key.is_some_and(|k| self.keys.contains(&k)) {
                    let trimmed = s.trim();
                    if !trimmed.is_empty() && self.seen.insert(trimmed.to_string()) {
                        self.found.push(trimmed.to_string());
                    }
                } else if embedded_depth < MAX_EMBEDDED_DEPTH && looks_like_json(s) {
                    if let Ok(inner) = serde_json::from_str::<Value>(s) {
                        self.visit(&inner, None, embedded_depth + 1);
                    }
                }
            }
            Value::Number(_) | Value::Bool(_) | Value::Null => {}
        }
    }
}

fn looks_like_json(s: &str) -> bool {
    let t = s.trim_start();
    t.starts_with('{') || t.starts_with('[')
}
