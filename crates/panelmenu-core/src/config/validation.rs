//! Config validation - warns about unknown fields

use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tracing::warn;

use crate::settings::keys;

/// Validate JSON config and warn about unknown fields.
pub fn warn_unknown_fields(content: &str, config_name: &str) {
    let Ok(value) = serde_json::from_str::<Value>(content) else {
        return;
    };

    let expected = expected_config_keys();
    let unknowns = find_unknown_keys(&value, &expected, "");

    for path in unknowns {
        warn!("Unknown config field in {config_name}: {path}");
    }
}

/// Validate a preferences document and warn about keys no route listens to.
pub fn warn_unknown_preferences(content: &str) {
    let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(content) else {
        return;
    };

    for key in unknown_preference_keys(obj.keys().map(String::as_str)) {
        warn!("Unknown preference key: {key}");
    }
}

/// Keys that are neither routed nor read at startup.
pub fn unknown_preference_keys<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut unknown: Vec<String> = keys
        .filter(|key| !keys::is_known(key))
        .map(str::to_string)
        .collect();
    unknown.sort();
    unknown
}

/// Find unknown keys in JSON value compared to expected keys.
/// Returns paths like "navigation.unknownField" for unknown fields.
fn find_unknown_keys(value: &Value, expected: &ExpectedKeys, prefix: &str) -> Vec<String> {
    let mut unknowns = Vec::new();

    let Value::Object(obj) = value else {
        return unknowns;
    };

    for (key, child) in obj {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        if let Some(nested) = expected.nested.get(key.as_str()) {
            unknowns.extend(find_unknown_keys(child, nested, &path));
        } else if !expected.fields.contains(key.as_str()) {
            unknowns.push(path);
        }
    }

    unknowns
}

/// Expected keys for a config section.
/// `fields` are leaf fields, `nested` are nested objects with their own expected keys.
struct ExpectedKeys {
    fields: HashSet<&'static str>,
    nested: HashMap<&'static str, ExpectedKeys>,
}

impl ExpectedKeys {
    fn new(fields: &[&'static str]) -> Self {
        Self {
            fields: fields.iter().copied().collect(),
            nested: HashMap::new(),
        }
    }

    fn with_nested(mut self, key: &'static str, nested: ExpectedKeys) -> Self {
        self.nested.insert(key, nested);
        self
    }
}

/// Expected keys for `Config` (settings.rs)
fn expected_config_keys() -> ExpectedKeys {
    ExpectedKeys::new(&[])
        .with_nested("monitors", ExpectedKeys::new(&["outputs", "primary"]))
        .with_nested("navigation", ExpectedKeys::new(&["leaveDelayMs"]))
        .with_nested("search", ExpectedKeys::new(&["maxResults"]))
        .with_nested("daemon", ExpectedKeys::new(&["socketPath", "tickMs"]))
}
