//! Request trees: linearization and reconstruction
//!
//! A do-script asks for its inputs as an arbitrarily nested structure of
//! filenames. `linearize` flattens that structure into one ordered filename
//! list (so the builder can be invoked once, batched) plus an index tree that
//! mirrors the nesting. `unlinearize` rebuilds the original shape with each
//! filename replaced by its loaded value.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde_json::Value;

use crate::domain::error::{DomainError, DomainResult};

/// A nested container with values at the leaves.
///
/// Mappings preserve insertion order, so flattening order and reconstruction
/// are deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tree<T> {
    Leaf(T),
    Sequence(Vec<Tree<T>>),
    Mapping(IndexMap<String, Tree<T>>),
}

/// A request names the files a do-script depends on.
pub type Request = Tree<PathBuf>;

/// An index mirrors a request's shape, with flat-list offsets at the leaves.
pub type Index = Tree<usize>;

impl<T> Tree<T> {
    /// Number of leaves, which equals the length of the flat list
    /// produced by [`linearize`].
    pub fn leaf_count(&self) -> usize {
        match self {
            Tree::Leaf(_) => 1,
            Tree::Sequence(children) => children.iter().map(Tree::leaf_count).sum(),
            Tree::Mapping(entries) => entries.values().map(Tree::leaf_count).sum(),
        }
    }

    fn variant_name(&self) -> &'static str {
        match self {
            Tree::Leaf(_) => "leaf",
            Tree::Sequence(_) => "sequence",
            Tree::Mapping(_) => "mapping",
        }
    }
}

impl Request {
    /// Convert an untyped request description into a `Request`.
    ///
    /// This is the boundary where the closed Leaf/Sequence/Mapping model is
    /// enforced: strings become leaves, arrays become sequences, objects
    /// become mappings (keeping key order), and anything else is rejected.
    pub fn from_json(value: &Value) -> DomainResult<Self> {
        match value {
            Value::String(s) => Ok(Tree::Leaf(PathBuf::from(s))),
            Value::Array(items) => items
                .iter()
                .map(Self::from_json)
                .collect::<DomainResult<Vec<_>>>()
                .map(Tree::Sequence),
            Value::Object(entries) => {
                let mut mapping = IndexMap::with_capacity(entries.len());
                for (key, child) in entries {
                    mapping.insert(key.clone(), Self::from_json(child)?);
                }
                Ok(Tree::Mapping(mapping))
            }
            Value::Null => Err(DomainError::UnsupportedType("null".into())),
            Value::Bool(_) => Err(DomainError::UnsupportedType("boolean".into())),
            Value::Number(_) => Err(DomainError::UnsupportedType("number".into())),
        }
    }
}

impl From<&str> for Request {
    fn from(s: &str) -> Self {
        Tree::Leaf(PathBuf::from(s))
    }
}

impl From<PathBuf> for Request {
    fn from(p: PathBuf) -> Self {
        Tree::Leaf(p)
    }
}

impl From<Vec<Request>> for Request {
    fn from(children: Vec<Request>) -> Self {
        Tree::Sequence(children)
    }
}

impl Tree<Option<Value>> {
    /// Render a loaded result tree as JSON. Absent leaves become `null`.
    pub fn into_json(self) -> Value {
        match self {
            Tree::Leaf(None) => Value::Null,
            Tree::Leaf(Some(value)) => value,
            Tree::Sequence(children) => {
                Value::Array(children.into_iter().map(Tree::into_json).collect())
            }
            Tree::Mapping(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(key, child)| (key, child.into_json()))
                    .collect(),
            ),
        }
    }
}

/// Flatten `request` into an ordered filename list and a mirroring index tree.
///
/// Traversal is pre-order depth-first; each leaf's index is its 0-based
/// position in the returned list, counted from `offset` (top-level callers
/// pass 0, recursive calls carry the running offset).
///
/// Pure and deterministic: the same request always yields the same list and
/// index.
pub fn linearize(request: &Request, offset: usize) -> (Vec<String>, Index) {
    match request {
        Tree::Leaf(path) => (
            vec![path.to_string_lossy().into_owned()],
            Tree::Leaf(offset),
        ),
        Tree::Sequence(children) => {
            let mut filenames = Vec::new();
            let mut indices = Vec::with_capacity(children.len());
            for child in children {
                let (mut child_files, child_index) = linearize(child, offset + filenames.len());
                filenames.append(&mut child_files);
                indices.push(child_index);
            }
            (filenames, Tree::Sequence(indices))
        }
        Tree::Mapping(entries) => {
            let mut filenames = Vec::new();
            let mut indices = IndexMap::with_capacity(entries.len());
            for (key, child) in entries {
                let (mut child_files, child_index) = linearize(child, offset + filenames.len());
                filenames.append(&mut child_files);
                indices.insert(key.clone(), child_index);
            }
            (filenames, Tree::Mapping(indices))
        }
    }
}

/// Rebuild the shape of `request` with each leaf replaced by the loaded value
/// at its index offset.
///
/// `index` must be the index tree produced by [`linearize`] for this same
/// request; the shapes are walked together and any divergence (variant,
/// length, key set or key order) fails with `ShapeMismatch` rather than
/// producing a silently misaligned result.
pub fn unlinearize<T: Clone>(request: &Request, index: &Index, data: &[T]) -> DomainResult<Tree<T>> {
    match (request, index) {
        (Tree::Leaf(_), Tree::Leaf(offset)) => data
            .get(*offset)
            .cloned()
            .map(Tree::Leaf)
            .ok_or(DomainError::OffsetOutOfRange {
                offset: *offset,
                len: data.len(),
            }),
        (Tree::Sequence(children), Tree::Sequence(indices)) => {
            if children.len() != indices.len() {
                return Err(DomainError::ShapeMismatch {
                    expected: format!("sequence of {}", children.len()),
                    found: format!("sequence of {}", indices.len()),
                });
            }
            children
                .iter()
                .zip(indices)
                .map(|(child, child_index)| unlinearize(child, child_index, data))
                .collect::<DomainResult<Vec<_>>>()
                .map(Tree::Sequence)
        }
        (Tree::Mapping(children), Tree::Mapping(indices)) => {
            if children.len() != indices.len() {
                return Err(DomainError::ShapeMismatch {
                    expected: format!("mapping of {}", children.len()),
                    found: format!("mapping of {}", indices.len()),
                });
            }
            let mut result = IndexMap::with_capacity(children.len());
            for (position, (key, child)) in children.iter().enumerate() {
                let (index_key, child_index) =
                    indices.get_index(position).expect("lengths checked above");
                if index_key != key {
                    return Err(DomainError::ShapeMismatch {
                        expected: format!("key {:?}", key),
                        found: format!("key {:?}", index_key),
                    });
                }
                result.insert(key.clone(), unlinearize(child, child_index, data)?);
            }
            Ok(Tree::Mapping(result))
        }
        (request, index) => Err(DomainError::ShapeMismatch {
            expected: request.variant_name().to_string(),
            found: index.variant_name().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_linearizes_to_single_filename_at_offset() {
        let request = Request::from("a.csv");
        let (filenames, index) = linearize(&request, 0);
        assert_eq!(filenames, vec!["a.csv".to_string()]);
        assert_eq!(index, Tree::Leaf(0));
    }

    #[test]
    fn recursive_calls_carry_the_running_offset() {
        let request = Request::from("a.csv");
        let (_, index) = linearize(&request, 3);
        assert_eq!(index, Tree::Leaf(3));
    }

    #[test]
    fn from_json_rejects_scalar_shapes() {
        let err = Request::from_json(&serde_json::json!(42)).unwrap_err();
        assert!(matches!(err, DomainError::UnsupportedType(ref t) if t == "number"));
    }

    #[test]
    fn unlinearize_rejects_foreign_index_shape() {
        let request = Request::from(vec![Request::from("a.csv"), Request::from("b.txt")]);
        // Index from a different (leaf) request shape.
        let index = Tree::Leaf(0);
        let err = unlinearize(&request, &index, &["A", "B"]).unwrap_err();
        assert!(matches!(err, DomainError::ShapeMismatch { .. }));
    }
}
