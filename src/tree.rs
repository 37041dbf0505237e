use crate::ast::PathSegment;
use std::collections::BTreeMap;
use std::fmt;

/// The root of a decoded form: always a mapping from field name to value.
///
/// Mappings are kept sorted by key rather than in submission order; order
/// carries no meaning for form data, it only changes how JSON output reads.
pub type FormTree = BTreeMap<String, FormValue>;

/// An uploaded file, kept as opaque bytes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FileBlob {
    pub name: String,
    /// MIME type as reported by the client, if any.
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl FileBlob {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        FileBlob {
            name: name.into(),
            content_type: None,
            data: data.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// A node in the decoded form tree.
///
/// Leaves are left exactly as submitted; no numeric or boolean
/// interpretation happens here.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FormValue {
    /// An intentionally empty field.
    #[default]
    Undefined,
    /// Padding in a sparse list, e.g. `items[1]` when only `items[2]` was
    /// written. Reads as undefined; the first write to it replaces it.
    Hole,
    Text(String),
    File(FileBlob),
    /// Built from index segments, or from repeated writes to one path.
    List(Vec<FormValue>),
    Map(BTreeMap<String, FormValue>),
}

static UNDEFINED: FormValue = FormValue::Undefined;

/// The shape of a node, used when reporting structural conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Undefined,
    Scalar,
    List,
    Map,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeKind::Undefined => "nothing",
            NodeKind::Scalar => "a scalar",
            NodeKind::List => "a list",
            NodeKind::Map => "a mapping",
        })
    }
}

impl FormValue {
    pub fn kind(&self) -> NodeKind {
        match self {
            FormValue::Undefined | FormValue::Hole => NodeKind::Undefined,
            FormValue::Text(_) | FormValue::File(_) => NodeKind::Scalar,
            FormValue::List(_) => NodeKind::List,
            FormValue::Map(_) => NodeKind::Map,
        }
    }

    /// True for stored `Undefined` and for list padding alike.
    pub fn is_undefined(&self) -> bool {
        matches!(self, FormValue::Undefined | FormValue::Hole)
    }

    pub fn is_hole(&self) -> bool {
        matches!(self, FormValue::Hole)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FormValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileBlob> {
        match self {
            FormValue::File(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FormValue]> {
        match self {
            FormValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, FormValue>> {
        match self {
            FormValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Follow `segments` downwards from this node. A name on a list, an
    /// index on a mapping, or anything on a scalar is a miss. List padding is
    /// reported as `Undefined`.
    pub fn get_at(&self, segments: &[PathSegment]) -> Option<&FormValue> {
        let mut current = self;
        for seg in segments {
            current = match (seg, current) {
                (PathSegment::Key(name), FormValue::Map(map)) => map.get(name)?,
                (PathSegment::Index(idx), FormValue::List(items)) => items.get(*idx)?,
                _ => return None,
            };
        }
        match current {
            FormValue::Hole => Some(&UNDEFINED),
            _ => Some(current),
        }
    }
}

/// Look up `segments` starting at the root mapping.
pub fn lookup<'a>(tree: &'a FormTree, segments: &[PathSegment]) -> Option<&'a FormValue> {
    let (first, rest) = segments.split_first()?;
    let root = match first {
        PathSegment::Key(name) => tree.get(name)?,
        PathSegment::Index(_) => return None,
    };
    root.get_at(rest)
}

impl From<&str> for FormValue {
    fn from(s: &str) -> Self {
        FormValue::Text(s.to_string())
    }
}

impl From<String> for FormValue {
    fn from(s: String) -> Self {
        FormValue::Text(s)
    }
}

impl From<FileBlob> for FormValue {
    fn from(file: FileBlob) -> Self {
        FormValue::File(file)
    }
}

impl<T: Into<FormValue>> From<Option<T>> for FormValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FormValue::Undefined, Into::into)
    }
}

impl<T: Into<FormValue>> From<Vec<T>> for FormValue {
    fn from(items: Vec<T>) -> Self {
        FormValue::List(items.into_iter().map(Into::into).collect())
    }
}
