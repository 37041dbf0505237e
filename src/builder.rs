use crate::ast::{FieldPath, PathSegment};
use crate::error::PathError;
use crate::tree::{FormTree, FormValue, NodeKind};
use std::collections::BTreeMap;

/// Limits applied while folding entries into a tree.
///
/// Sparse lists are padded up to the highest index written, so both limits
/// exist to keep a short request body from allocating a large tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Largest array index accepted in a field name.
    pub max_index: usize,
    /// Total number of list slots (padding included) that one decode may
    /// allocate across all lists.
    pub max_list_slots: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            max_index: 1_000,
            max_list_slots: 10_000,
        }
    }
}

/// A write stopped at an existing node of the wrong shape. `depth` is the
/// number of path segments leading to that node.
struct Clash {
    depth: usize,
    expected: NodeKind,
    found: NodeKind,
}

/// Fold one entry into `tree`.
///
/// Missing intermediate nodes are created: a mapping for a name segment, a
/// list for an index segment (padded with holes). Writing to a path that
/// already holds a value appends to it instead of overwriting.
///
/// `slots_used` is how many list slots earlier entries of the same decode
/// allocated; the number this entry allocates is returned. On error the tree
/// is left exactly as it was.
pub fn insert(
    tree: &mut FormTree,
    path: &FieldPath,
    value: FormValue,
    options: &DecodeOptions,
    slots_used: usize,
) -> Result<usize, PathError> {
    let (first, rest) = path.segments.split_first().ok_or(PathError::EmptyPath)?;

    // Checked up front so that nothing is created before the error.
    for (i, seg) in path.segments.iter().enumerate() {
        if let PathSegment::Index(index) = seg {
            if *index > options.max_index {
                return Err(PathError::IndexTooLarge {
                    path: path.prefix(i + 1).to_string(),
                    index: *index,
                    max: options.max_index,
                });
            }
        }
    }

    let name = match first {
        PathSegment::Key(name) => name.clone(),
        PathSegment::Index(idx) => idx.to_string(),
    };

    let needed = slots_needed(tree, &name, rest);
    let remaining = options.max_list_slots.saturating_sub(slots_used);
    if needed > remaining {
        return Err(PathError::ListBudgetExceeded {
            path: path.to_string(),
            needed,
            remaining,
        });
    }

    write_key(tree, &name, rest, value, 1).map_err(|clash| PathError::Conflict {
        path: path.prefix(clash.depth).to_string(),
        expected: clash.expected,
        found: clash.found,
    })?;
    Ok(needed)
}

/// Count the list slots a write along `rest` would add, without touching the
/// tree. Below the first missing node every list is new.
fn slots_needed(tree: &FormTree, name: &str, rest: &[PathSegment]) -> usize {
    let mut current = tree.get(name);
    let mut total = 0;
    for seg in rest {
        current = match seg {
            PathSegment::Index(index) => {
                let items: &[FormValue] = match current {
                    Some(FormValue::List(items)) => items.as_slice(),
                    _ => &[],
                };
                total += (index + 1).saturating_sub(items.len());
                items.get(*index)
            }
            PathSegment::Key(key) => match current {
                Some(FormValue::Map(map)) => map.get(key),
                _ => None,
            },
        };
    }
    total
}

fn write_key(
    map: &mut BTreeMap<String, FormValue>,
    name: &str,
    rest: &[PathSegment],
    value: FormValue,
    depth: usize,
) -> Result<(), Clash> {
    match rest.split_first() {
        None => {
            match map.get_mut(name) {
                Some(existing) => promote(existing, value),
                None => {
                    map.insert(name.to_string(), value);
                }
            }
            Ok(())
        }
        Some((next, tail)) => {
            let child = map.entry(name.to_string()).or_default();
            descend(child, next, tail, value, depth)
        }
    }
}

fn write_index(
    items: &mut Vec<FormValue>,
    index: usize,
    rest: &[PathSegment],
    value: FormValue,
    depth: usize,
) -> Result<(), Clash> {
    if items.len() <= index {
        items.resize_with(index + 1, || FormValue::Hole);
    }
    let slot = &mut items[index];

    match rest.split_first() {
        None if slot.is_hole() => {
            *slot = value;
            Ok(())
        }
        None => {
            promote(slot, value);
            Ok(())
        }
        Some((next, tail)) => descend(slot, next, tail, value, depth),
    }
}

/// Step from `slot` through `segment`, turning an undefined slot into the
/// container the segment needs.
fn descend(
    slot: &mut FormValue,
    segment: &PathSegment,
    rest: &[PathSegment],
    value: FormValue,
    depth: usize,
) -> Result<(), Clash> {
    match segment {
        PathSegment::Key(name) => {
            if slot.is_undefined() {
                *slot = FormValue::Map(BTreeMap::new());
            }
            match slot {
                FormValue::Map(map) => write_key(map, name, rest, value, depth + 1),
                other => Err(Clash {
                    depth,
                    expected: NodeKind::Map,
                    found: other.kind(),
                }),
            }
        }
        PathSegment::Index(index) => {
            if slot.is_undefined() {
                *slot = FormValue::List(Vec::new());
            }
            match slot {
                FormValue::List(items) => write_index(items, *index, rest, value, depth + 1),
                other => Err(Clash {
                    depth,
                    expected: NodeKind::List,
                    found: other.kind(),
                }),
            }
        }
    }
}

/// Second and later writes to one path: a list grows, anything else becomes
/// `[existing, value]`.
fn promote(existing: &mut FormValue, value: FormValue) {
    match existing {
        FormValue::List(items) => items.push(value),
        other => {
            let first = std::mem::take(other);
            *other = FormValue::List(vec![first, value]);
        }
    }
}
