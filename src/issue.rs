//! Mapping validation issues back onto form field names.
//!
//! A schema validator reports each failure with an optional structured path.
//! [`get_field_path`] renders that path in the same dot/bracket notation the
//! form used, so error messages can be shown next to the input that caused
//! them.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

static INDEX_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("index key pattern is valid"));

/// A single property key as reported by a validator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum IssueKey {
    String(String),
    Number(f64),
    /// Anything else (booleans, objects, symbol-like tokens). Such a key has
    /// no field-name spelling.
    Opaque(serde_json::Value),
}

/// One element of an issue path: a bare key or a `{ "key": ... }` descriptor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PathItem {
    Segment { key: IssueKey },
    Key(IssueKey),
}

impl PathItem {
    pub fn key(&self) -> &IssueKey {
        match self {
            PathItem::Segment { key } | PathItem::Key(key) => key,
        }
    }
}

/// A validation failure.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Issue {
    pub message: String,
    #[serde(default)]
    pub path: Option<Vec<PathItem>>,
}

impl Issue {
    pub fn new(message: impl Into<String>) -> Self {
        Issue {
            message: message.into(),
            path: None,
        }
    }

    pub fn with_path(mut self, path: Vec<PathItem>) -> Self {
        self.path = Some(path);
        self
    }
}

impl From<&str> for IssueKey {
    fn from(s: &str) -> Self {
        IssueKey::String(s.to_string())
    }
}

impl From<String> for IssueKey {
    fn from(s: String) -> Self {
        IssueKey::String(s)
    }
}

impl From<usize> for IssueKey {
    fn from(n: usize) -> Self {
        IssueKey::Number(n as f64)
    }
}

impl From<f64> for IssueKey {
    fn from(n: f64) -> Self {
        IssueKey::Number(n)
    }
}

impl From<IssueKey> for PathItem {
    fn from(key: IssueKey) -> Self {
        PathItem::Key(key)
    }
}

impl From<&str> for PathItem {
    fn from(s: &str) -> Self {
        PathItem::Key(s.into())
    }
}

impl From<usize> for PathItem {
    fn from(n: usize) -> Self {
        PathItem::Key(n.into())
    }
}

/// Render an issue's path as a field name, e.g. `user.contacts[0].type`.
///
/// Returns `None` when the issue has no path, an empty path, or a key that is
/// neither a string nor a number; such issues belong to the form as a whole.
/// Numbers and all-digit strings after the first position are written as
/// `[n]`, so `["items", 1]` and `["items", "1"]` both give `items[1]`.
pub fn get_field_path(issue: &Issue) -> Option<String> {
    let path = issue.path.as_deref().filter(|p| !p.is_empty())?;

    let mut field_path = String::new();
    for (i, item) in path.iter().enumerate() {
        let (text, is_index) = match item.key() {
            IssueKey::String(s) => (s.clone(), INDEX_KEY.is_match(s)),
            IssueKey::Number(n) => (render_number(*n), true),
            IssueKey::Opaque(_) => return None,
        };
        if i == 0 {
            field_path.push_str(&text);
        } else if is_index {
            field_path.push('[');
            field_path.push_str(&text);
            field_path.push(']');
        } else {
            field_path.push('.');
            field_path.push_str(&text);
        }
    }
    Some(field_path)
}

/// Spell a number as a JavaScript template string does: `-0` is `0`, and
/// magnitudes from 1e21 up or below 1e-6 use the `1e+21` style.
fn render_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let magnitude = n.abs();
    if n.is_finite() && (magnitude >= 1e21 || magnitude < 1e-6) {
        let text = format!("{:e}", n);
        match text.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => text,
        }
    } else {
        n.to_string()
    }
}

/// Validation messages grouped by where they belong.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormErrors {
    /// Messages with no resolvable field.
    pub form_errors: Vec<String>,
    /// Messages keyed by field name, in issue order.
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.form_errors.is_empty() && self.field_errors.is_empty()
    }
}

/// Sort issues into form-level and field-level messages.
pub fn form_errors<'a>(issues: impl IntoIterator<Item = &'a Issue>) -> FormErrors {
    let mut errors = FormErrors::default();
    for issue in issues {
        match get_field_path(issue) {
            Some(field) => errors
                .field_errors
                .entry(field)
                .or_default()
                .push(issue.message.clone()),
            None => errors.form_errors.push(issue.message.clone()),
        }
    }
    errors
}
