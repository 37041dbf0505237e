pub mod ast;
pub mod builder;
pub mod error;
pub mod issue;
pub mod json;
pub mod parser;
pub mod tree;

use error::PathError;
use tree::{FormTree, FormValue};

pub use builder::DecodeOptions;
pub use issue::{form_errors, get_field_path, FormErrors, Issue, IssueKey, PathItem};

// ── Core API ───────────────────────────────────────────────────────

/// The result of folding entries into a tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormResult {
    pub value: FormTree,
    /// Entries that were skipped, in the order they were seen.
    pub errors: Vec<PathError>,
    /// List slots allocated so far, charged against
    /// `DecodeOptions::max_list_slots`.
    slots_used: usize,
}

impl FormResult {
    /// Fold one more entry in, returning the updated result.
    pub fn set(self, path: &str, value: impl Into<FormValue>) -> Self {
        self.set_with_options(path, value, &DecodeOptions::default())
    }

    fn set_with_options(
        mut self,
        path: &str,
        value: impl Into<FormValue>,
        options: &DecodeOptions,
    ) -> Self {
        let value = value.into();
        tracing::trace!(path, kind = %value.kind(), "folding entry");
        let outcome = parser::parse(path).and_then(|parsed| {
            builder::insert(&mut self.value, &parsed, value, options, self.slots_used)
        });
        match outcome {
            Ok(slots) => self.slots_used += slots,
            Err(err) => {
                tracing::debug!(path, code = err.code(), "skipping entry: {}", err);
                self.errors.push(err);
            }
        }
        self
    }
}

/// Write `value` at the dot/bracket field name `path` and return the updated
/// tree. A second write to the same path turns the value into a list.
///
/// ```
/// let result = formpath::set_path(Default::default(), "tasks[0].content", "Write code");
/// assert!(result.errors.is_empty());
/// ```
pub fn set_path(tree: FormTree, path: &str, value: impl Into<FormValue>) -> FormResult {
    FormResult {
        value: tree,
        ..FormResult::default()
    }
    .set(path, value)
}

/// Read the value at `path`. `None` means nothing is stored there.
pub fn get_path<'a>(tree: &'a FormTree, path: &str) -> Option<&'a FormValue> {
    let parsed = parser::parse(path).ok()?;
    tree::lookup(tree, &parsed.segments)
}

/// Fold a sequence of `(field name, value)` entries, in order, into a fresh
/// tree. Repeated names accumulate into lists.
pub fn decode<I, K, V>(entries: I) -> FormResult
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<FormValue>,
{
    decode_with_options(entries, &DecodeOptions::default())
}

pub fn decode_with_options<I, K, V>(entries: I, options: &DecodeOptions) -> FormResult
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<FormValue>,
{
    entries
        .into_iter()
        .fold(FormResult::default(), |acc, (key, value)| {
            acc.set_with_options(key.as_ref(), value, options)
        })
}

/// Decode an `application/x-www-form-urlencoded` body.
pub fn decode_urlencoded(body: &str) -> Result<FormResult, serde_urlencoded::de::Error> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(body)?;
    Ok(decode(pairs))
}
