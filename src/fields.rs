use crate::error::{ListingError, Result};
use log::debug;
use serde_json::Value;

/// Form inputs that carry files and never appear in the field table.
pub const PHOTOS_FIELD: &str = "photos";
pub const VIDEO_FIELD: &str = "video";

const FIELD_LABELS: &[(&str, &str)] = &[
    ("landSize", "Land Size (sq. ft.)"),
    ("price", "Price (₹)"),
    ("propertyType", "Property Type"),
    ("state", "State"),
    ("district", "District/Tehsil"),
    ("village", "Village"),
    ("khasraNo", "Khasra no./Khata no."),
];

/// Display label for a field key, or the key itself when it is not a known field.
pub fn display_label(key: &str) -> &str {
    FIELD_LABELS
        .iter()
        .find(|(known, _)| *known == key)
        .map(|(_, label)| *label)
        .unwrap_or(key)
}

/// Field values captured at submission time, in form order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSnapshot {
    entries: Vec<(String, String)>,
}

impl FieldSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a snapshot from raw form entries, dropping the file inputs.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut snapshot = Self::new();
        for (key, value) in entries {
            snapshot.insert(key, value);
        }
        snapshot
    }

    /// Parses a JSON object of field values. Key order is kept.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| ListingError::Form(format!("form is not valid JSON: {}", e)))?;
        let object = match value {
            Value::Object(object) => object,
            other => {
                return Err(ListingError::Form(format!(
                    "form must be a JSON object, found {}",
                    json_kind(&other)
                )))
            }
        };

        let mut snapshot = Self::new();
        for (key, value) in object {
            let text = match value {
                Value::String(s) => s,
                Value::Null => String::new(),
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                other => {
                    return Err(ListingError::Form(format!(
                        "field {} must be a scalar, found {}",
                        key,
                        json_kind(&other)
                    )))
                }
            };
            snapshot.insert(key, text);
        }
        Ok(snapshot)
    }

    /// Adds a field, replacing the value in place if the key is already present.
    /// File inputs are ignored.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        if key == PHOTOS_FIELD || key == VIDEO_FIELD {
            debug!("Skipping file input {} in field snapshot", key);
            return;
        }
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parses a `key=value` command-line field.
pub fn parse_field_arg(arg: &str) -> Result<(String, String)> {
    match arg.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(ListingError::Form(format!(
            "expected key=value, got {:?}",
            arg
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_keys_use_display_labels() {
        assert_eq!(display_label("landSize"), "Land Size (sq. ft.)");
        assert_eq!(display_label("price"), "Price (₹)");
        assert_eq!(display_label("khasraNo"), "Khasra no./Khata no.");
    }

    #[test]
    fn unknown_keys_fall_back_to_raw_key() {
        assert_eq!(display_label("ownerName"), "ownerName");
        assert_eq!(display_label(""), "");
    }

    #[test]
    fn file_inputs_are_excluded() {
        let snapshot = FieldSnapshot::from_entries(vec![
            ("landSize", "1200"),
            ("photos", "a.jpg"),
            ("video", "tour.mp4"),
            ("price", "500000"),
        ]);
        let keys: Vec<&str> = snapshot.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["landSize", "price"]);
    }

    #[test]
    fn reinserting_a_key_keeps_its_position() {
        let mut snapshot = FieldSnapshot::from_entries(vec![("state", "UP"), ("village", "X")]);
        snapshot.insert("state", "MP");
        let entries: Vec<(&str, &str)> = snapshot.iter().collect();
        assert_eq!(entries, vec![("state", "MP"), ("village", "X")]);
    }

    #[test]
    fn json_form_keeps_order_and_stringifies_scalars() {
        let snapshot = FieldSnapshot::from_json(
            r#"{"price": 500000, "landSize": "1200", "village": null, "corner": true}"#,
        )
        .unwrap();
        let entries: Vec<(&str, &str)> = snapshot.iter().collect();
        assert_eq!(
            entries,
            vec![
                ("price", "500000"),
                ("landSize", "1200"),
                ("village", ""),
                ("corner", "true")
            ]
        );
    }

    #[test]
    fn json_form_rejects_nested_values() {
        let err = FieldSnapshot::from_json(r#"{"price": [1, 2]}"#).unwrap_err();
        assert!(matches!(err, ListingError::Form(_)));
        assert!(FieldSnapshot::from_json("[]").is_err());
    }

    #[test]
    fn field_args_split_on_first_equals() {
        assert_eq!(
            parse_field_arg("khasraNo=12/3=4").unwrap(),
            ("khasraNo".to_string(), "12/3=4".to_string())
        );
        assert!(parse_field_arg("novalue").is_err());
        assert!(parse_field_arg("=x").is_err());
    }
}
