//! Decoded update input
//!
//! The HTTP layer turns a request into [`FormFields`] plus a list of
//! [`UploadedFile`]s that are already on disk.

use serde_json::Value;
use std::collections::BTreeMap;

/// Presence of a form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// Key absent from the update
    Unset,
    /// Key present with an empty string
    Empty,
    Value(&'a str),
}

impl<'a> FieldValue<'a> {
    pub fn is_set(&self) -> bool {
        !matches!(self, FieldValue::Unset)
    }

    /// New value for an overwrite-if-present field
    pub fn overwrite(&self) -> Option<String> {
        match self {
            FieldValue::Unset => None,
            FieldValue::Empty => Some(String::new()),
            FieldValue::Value(v) => Some((*v).to_string()),
        }
    }

    /// Checkbox semantics: only `on` and `true` are truthy
    pub fn is_truthy(&self) -> bool {
        matches!(self, FieldValue::Value("on") | FieldValue::Value("true"))
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            FieldValue::Unset => None,
            FieldValue::Empty => Some(""),
            FieldValue::Value(v) => Some(v),
        }
    }
}

/// Text fields of one update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields(BTreeMap<String, String>);

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later values for the same key replace earlier ones
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> FieldValue<'_> {
        match self.0.get(key) {
            None => FieldValue::Unset,
            Some(v) if v.is_empty() => FieldValue::Empty,
            Some(v) => FieldValue::Value(v.as_str()),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Build from a JSON object body
    ///
    /// Strings are taken as-is, `null` counts as absent, everything else is
    /// re-encoded as JSON text (`true` becomes `"true"`, arrays stay parseable).
    pub fn from_json_object(object: serde_json::Map<String, Value>) -> Self {
        let mut fields = Self::new();
        for (key, value) in object {
            match value {
                Value::Null => {}
                Value::String(s) => fields.insert(key, s),
                other => fields.insert(key, other.to_string()),
            }
        }
        fields
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (k, v) in iter {
            fields.insert(k, v);
        }
        fields
    }
}

/// A file persisted by the media store for this request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Form field the file arrived under
    pub field_name: String,
    /// Public path, e.g. `/uploads/banner-1700000000000-123.jpg`
    pub stored_path: String,
    pub size_bytes: u64,
}

/// Fields and files of one home document update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HomeUpdate {
    pub fields: FormFields,
    pub files: Vec<UploadedFile>,
}

impl HomeUpdate {
    pub fn new(fields: FormFields, files: Vec<UploadedFile>) -> Self {
        Self { fields, files }
    }

    pub fn field(&self, key: &str) -> FieldValue<'_> {
        self.fields.get(key)
    }

    /// First file uploaded under `field`
    pub fn file_for(&self, field: &str) -> Option<&UploadedFile> {
        self.files.iter().find(|f| f.field_name == field)
    }

    /// Every file uploaded under `field`, in arrival order
    pub fn files_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a UploadedFile> + 'a {
        self.files.iter().filter(move |f| f.field_name == field)
    }

    pub fn stored_paths(&self) -> Vec<String> {
        self.files.iter().map(|f| f.stored_path.clone()).collect()
    }
}
