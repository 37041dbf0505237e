use crate::tree::NodeKind;

/// An entry that could not be folded into the tree.
///
/// These are non-fatal: the offending entry is skipped and the tree is left
/// as it was before that entry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PathError {
    #[error("empty field path")]
    EmptyPath,

    /// `path` addresses a node that was already built with a different shape,
    /// e.g. `a.b` after `a[0]`.
    #[error("{path}: expected {expected} but found {found}")]
    Conflict {
        path: String,
        expected: NodeKind,
        found: NodeKind,
    },

    #[error("{path}: index {index} exceeds the limit of {max}")]
    IndexTooLarge {
        path: String,
        index: usize,
        max: usize,
    },

    /// The entry would grow lists past `DecodeOptions::max_list_slots`.
    #[error("{path}: needs {needed} list slots but only {remaining} remain")]
    ListBudgetExceeded {
        path: String,
        needed: usize,
        remaining: usize,
    },
}

impl PathError {
    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            PathError::EmptyPath => "empty-path",
            PathError::Conflict { .. } => "path-conflict",
            PathError::IndexTooLarge { .. } => "index-too-large",
            PathError::ListBudgetExceeded { .. } => "list-budget-exceeded",
        }
    }
}
