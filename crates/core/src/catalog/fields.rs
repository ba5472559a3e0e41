//! Loosely typed request fields and the coercions the input schemas share.
//!
//! Multipart forms, urlencoded bodies and JSON objects all land here as
//! `name -> [values]`, so product and blog schemas parse one shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, de};
use serde_json::Value;

use super::error::CatalogError;

/// Text fields of a request, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    values: BTreeMap<String, Vec<String>>,
}

impl FormFields {
    /// Creates an empty set of fields.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value. `name[]` is stored under `name`.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let mut name = name.into();
        if let Some(stripped) = name.strip_suffix("[]") {
            name = stripped.to_string();
        }
        self.values.entry(name).or_default().push(value.into());
    }

    /// Builds fields from a JSON object.
    ///
    /// Scalars become a single value and arrays of scalars become repeated
    /// values. Objects and nested arrays are kept as JSON text.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Invalid` when the body is not a JSON object.
    pub fn from_json(body: &Value) -> Result<Self, CatalogError> {
        let Value::Object(map) = body else {
            return Err(CatalogError::invalid("Request body must be a JSON object"));
        };

        let mut fields = Self::new();
        for (name, value) in map {
            match value {
                Value::Null => {}
                Value::Array(items) if items.iter().all(is_scalar) => {
                    for item in items {
                        if let Some(text) = scalar_text(item) {
                            fields.push(name.clone(), text);
                        }
                    }
                    // Keep an explicitly empty list distinguishable from an absent one.
                    fields.values.entry(name.clone()).or_default();
                }
                Value::Array(_) | Value::Object(_) => fields.push(name.clone(), value.to_string()),
                scalar => {
                    if let Some(text) = scalar_text(scalar) {
                        fields.push(name.clone(), text);
                    }
                }
            }
        }
        Ok(fields)
    }

    /// Whether the field was sent at all.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// First value of a field, trimmed.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .and_then(|v| v.first())
            .map(|s| s.trim())
    }

    /// First value of a field, trimmed, treating blank as absent.
    #[must_use]
    pub fn non_blank(&self, name: &str) -> Option<&str> {
        self.text(name).filter(|s| !s.is_empty())
    }

    /// A field that must be present and non-blank.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Invalid` naming the field.
    pub fn required(&self, name: &str) -> Result<&str, CatalogError> {
        self.non_blank(name)
            .ok_or_else(|| CatalogError::invalid(format!("{name} is required")))
    }

    /// Every value of a field, trimmed, blanks dropped.
    ///
    /// `None` when the field was not sent.
    #[must_use]
    pub fn list(&self, name: &str) -> Option<Vec<String>> {
        self.values.get(name).map(|values| {
            values
                .iter()
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(String::from)
                .collect()
        })
    }

    /// A boolean field.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Invalid` unless the value is `true` or `false`.
    pub fn flag(&self, name: &str) -> Result<Option<bool>, CatalogError> {
        match self.non_blank(name) {
            None => Ok(None),
            Some(raw) => parse_flag(raw)
                .map(Some)
                .ok_or_else(|| CatalogError::invalid(format!("{name} must be true or false"))),
        }
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Parses `"true"` / `"false"`, ignoring case and surrounding space.
#[must_use]
pub fn parse_flag(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Query-string flag filter: anything but `true`/`false` means "no filter".
#[must_use]
pub fn flag_filter(raw: Option<&str>) -> Option<bool> {
    raw.and_then(parse_flag)
}

/// Deserializes a JSON boolean or a `"true"`/`"false"` string.
///
/// # Errors
///
/// Fails on any other string.
pub fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Bool(b)) => Ok(Some(b)),
        Some(Raw::Text(t)) => parse_flag(&t)
            .map(Some)
            .ok_or_else(|| de::Error::custom("expected true or false")),
    }
}

/// Trims a search term and drops it when blank.
#[must_use]
pub fn search_term(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_push_folds_bracket_suffix() {
        let mut fields = FormFields::new();
        fields.push("existingImages[]", "a.png");
        fields.push("existingImages", "b.png");
        assert_eq!(
            fields.list("existingImages"),
            Some(vec!["a.png".to_string(), "b.png".to_string()])
        );
    }

    #[test]
    fn test_required_rejects_blank() {
        let mut fields = FormFields::new();
        fields.push("name", "   ");
        let err = fields.required("name").unwrap_err();
        assert_eq!(err.to_string(), "name is required");
    }

    #[test]
    fn test_flag_coercion() {
        let mut fields = FormFields::new();
        fields.push("isActive", " FALSE ");
        fields.push("featured", "maybe");
        assert_eq!(fields.flag("isActive").unwrap(), Some(false));
        assert_eq!(fields.flag("missing").unwrap(), None);
        assert!(fields.flag("featured").is_err());
    }

    #[test]
    fn test_from_json_shapes() {
        let body = json!({
            "name": "Mailer Box",
            "quantityPerPack": 25,
            "isActive": true,
            "existingImages": ["https://cdn/a.png", "https://cdn/b.png"],
            "content": [{"title": "Why", "description": "Because"}],
            "size": null
        });
        let fields = FormFields::from_json(&body).unwrap();

        assert_eq!(fields.text("name"), Some("Mailer Box"));
        assert_eq!(fields.text("quantityPerPack"), Some("25"));
        assert_eq!(fields.flag("isActive").unwrap(), Some(true));
        assert_eq!(fields.list("existingImages").unwrap().len(), 2);
        assert!(fields.text("content").unwrap().starts_with('['));
        assert!(!fields.contains("size"));
    }

    #[test]
    fn test_from_json_keeps_empty_list() {
        let fields = FormFields::from_json(&json!({"existingImages": []})).unwrap();
        assert_eq!(fields.list("existingImages"), Some(vec![]));
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        assert!(FormFields::from_json(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_deserialize_flag() {
        #[derive(Deserialize)]
        struct Probe {
            #[serde(default, deserialize_with = "deserialize_flag")]
            flag: Option<bool>,
        }

        let probe: Probe = serde_json::from_value(json!({"flag": "true"})).unwrap();
        assert_eq!(probe.flag, Some(true));
        let probe: Probe = serde_json::from_value(json!({"flag": false})).unwrap();
        assert_eq!(probe.flag, Some(false));
        let probe: Probe = serde_json::from_value(json!({})).unwrap();
        assert_eq!(probe.flag, None);
        assert!(serde_json::from_value::<Probe>(json!({"flag": "yes"})).is_err());
    }
}
