//! # Path-addressed tree access
//!
//! A [`NodePath`] addresses one node inside the content tree: an ordered
//! sequence of field and index segments. Two textual notations are accepted
//! on input (`a.0.b` and `a[0].b`); both normalize to the same internal
//! representation, and the canonical rendering is dot-form. Callers must
//! not rely on byte-for-byte reconstruction of the input string.
//!
//! [`get`] and [`set`] are the only ways content is read and written:
//! `get` never fails for a structurally absent path, and `set` validates
//! before it applies, so a rejected write leaves nothing half-changed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

/// One step of a [`NodePath`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Bare identifier descending into an object
    Field(String),
    /// Non-negative integer descending into an ordered sequence
    Index(usize),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("Empty segment in path {0:?}")]
    EmptySegment(String),

    #[error("Invalid index {segment:?} in path {path:?}")]
    InvalidIndex { path: String, segment: String },

    #[error("Unterminated '[' in path {0:?}")]
    UnterminatedBracket(String),

    #[error("Type mismatch at {at:?}: expected {expected}")]
    TypeMismatch { at: String, expected: &'static str },
}

/// Canonical address of a node inside the content tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NodePath {
    segments: Vec<Segment>,
}

impl NodePath {
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Parse either textual notation (`a.0.b`, `a[0].b`)
    pub fn parse(input: &str) -> Result<Self, PathError> {
        if input.is_empty() {
            return Err(PathError::EmptySegment(input.to_string()));
        }

        let mut segments = Vec::new();
        let bytes = input.as_bytes();
        let mut i = 0;
        let mut expect_segment = true; // at start or right after '.'
        while i < bytes.len() {
            match bytes[i] {
                b'.' => {
                    if expect_segment {
                        return Err(PathError::EmptySegment(input.to_string()));
                    }
                    expect_segment = true;
                    i += 1;
                }
                b'[' => {
                    let close = input[i..]
                        .find(']')
                        .map(|offset| i + offset)
                        .ok_or_else(|| PathError::UnterminatedBracket(input.to_string()))?;
                    let inner = &input[i + 1..close];
                    let index =
                        inner
                            .parse::<usize>()
                            .map_err(|_| PathError::InvalidIndex {
                                path: input.to_string(),
                                segment: inner.to_string(),
                            })?;
                    segments.push(Segment::Index(index));
                    expect_segment = false;
                    i = close + 1;
                }
                _ => {
                    let end = input[i..]
                        .find(['.', '['])
                        .map(|offset| i + offset)
                        .unwrap_or(input.len());
                    let word = &input[i..end];
                    segments.push(Self::bare_segment(input, word)?);
                    expect_segment = false;
                    i = end;
                }
            }
        }
        if expect_segment {
            // trailing '.'
            return Err(PathError::EmptySegment(input.to_string()));
        }
        Ok(Self { segments })
    }

    /// A bare all-digit segment is an index into the preceding sequence
    fn bare_segment(input: &str, word: &str) -> Result<Segment, PathError> {
        if word.bytes().all(|b| b.is_ascii_digit()) {
            let index = word
                .parse::<usize>()
                .map_err(|_| PathError::InvalidIndex {
                    path: input.to_string(),
                    segment: word.to_string(),
                })?;
            Ok(Segment::Index(index))
        } else {
            Ok(Segment::Field(word.to_string()))
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// Extend with a field segment
    pub fn child(&self, name: &str) -> Self {
        let mut path = self.clone();
        path.push(Segment::Field(name.to_string()));
        path
    }

    /// Extend with an index segment
    pub fn index(&self, index: usize) -> Self {
        let mut path = self.clone();
        path.push(Segment::Index(index));
        path
    }

    /// True when `self` begins with every segment of `prefix`
    pub fn starts_with(&self, prefix: &NodePath) -> bool {
        self.segments.len() >= prefix.segments.len()
            && self.segments[..prefix.segments.len()] == prefix.segments[..]
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            match segment {
                Segment::Field(name) => f.write_str(name)?,
                Segment::Index(index) => write!(f, "{}", index)?,
            }
        }
        Ok(())
    }
}

impl FromStr for NodePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for NodePath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NodePath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Resolve `path` inside `tree`. A structurally absent path yields `None`,
/// never an error.
pub fn get<'a>(tree: &'a Value, path: &NodePath) -> Option<&'a Value> {
    let mut current = tree;
    for segment in path.segments() {
        current = match (segment, current) {
            (Segment::Field(name), Value::Object(map)) => map.get(name)?,
            (Segment::Index(index), Value::Array(items)) => items.get(*index)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Mutable twin of [`get`], for callers that own the tree
pub fn get_mut<'a>(tree: &'a mut Value, path: &NodePath) -> Option<&'a mut Value> {
    let mut current = tree;
    for segment in path.segments() {
        current = match (segment, current) {
            (Segment::Field(name), Value::Object(map)) => map.get_mut(name)?,
            (Segment::Index(index), Value::Array(items)) => items.get_mut(*index)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Validate that `path` can be written into `tree`: every value that
/// already exists along the way must match its segment's container kind.
/// Absent and null intermediates are fine; [`set`] creates them.
pub fn check(tree: &Value, path: &NodePath) -> Result<(), PathError> {
    let mut current = Some(tree);
    for (depth, segment) in path.segments().iter().enumerate() {
        let Some(value) = current else { break };
        match (segment, value) {
            (_, Value::Null) => break,
            (Segment::Field(name), Value::Object(map)) => current = map.get(name),
            (Segment::Index(index), Value::Array(items)) => current = items.get(*index),
            (Segment::Field(_), _) => return Err(type_mismatch(path, depth, "an object")),
            (Segment::Index(_), _) => return Err(type_mismatch(path, depth, "a sequence")),
        }
    }
    Ok(())
}

fn type_mismatch(path: &NodePath, depth: usize, expected: &'static str) -> PathError {
    let prefix = NodePath::from_segments(path.segments()[..depth].to_vec());
    PathError::TypeMismatch {
        at: prefix.to_string(),
        expected,
    }
}

/// Write `value` at `path`, returning the updated tree.
///
/// The tree is taken by value and untouched subtrees are moved into the
/// result, never copied. Absent or null intermediates are created — object
/// or sequence depending on the next segment — and sequences are padded
/// with `null` up to a written index. A segment whose kind contradicts the
/// existing container fails fast with [`PathError::TypeMismatch`]; no
/// coercion is attempted, and validation happens before anything moves.
pub fn set(tree: Value, path: &NodePath, value: Value) -> Result<Value, PathError> {
    check(&tree, path)?;
    Ok(apply(tree, path.segments(), value))
}

// Infallible after `check`: every container mismatch was rejected, so the
// only non-matching value left along the path is Null.
fn apply(current: Value, segments: &[Segment], value: Value) -> Value {
    let Some((segment, rest)) = segments.split_first() else {
        return value;
    };
    match segment {
        Segment::Field(name) => {
            let mut map = match current {
                Value::Object(map) => map,
                _ => Map::new(),
            };
            // edit in place so an existing key keeps its position
            let slot = map.entry(name.clone()).or_insert(Value::Null);
            let child = std::mem::take(slot);
            *slot = apply(child, rest, value);
            Value::Object(map)
        }
        Segment::Index(index) => {
            let mut items = match current {
                Value::Array(items) => items,
                _ => Vec::new(),
            };
            if items.len() <= *index {
                items.resize(index + 1, Value::Null);
            }
            let child = std::mem::replace(&mut items[*index], Value::Null);
            items[*index] = apply(child, rest, value);
            Value::Array(items)
        }
    }
}
