use std::fmt;

/// One step of a field path: either a named property or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// A parsed field path. The first segment is always the root field name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath {
    pub segments: Vec<PathSegment>,
}

impl FieldPath {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        FieldPath { segments }
    }

    /// Render the first `len` segments, e.g. for pointing at the node where a
    /// write went wrong.
    pub fn prefix(&self, len: usize) -> FieldPath {
        let end = len.min(self.segments.len());
        FieldPath::new(self.segments[..end].to_vec())
    }
}

/// Format a path back to its string form: `tasks[0].content`
impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for seg in &self.segments {
            match seg {
                PathSegment::Key(name) => {
                    if !first {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                PathSegment::Index(idx) if first => write!(f, "{}", idx)?,
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
            }
            first = false;
        }
        Ok(())
    }
}
