//! Location descriptors: the resolved form of a path string such as
//! `order.items[2].sku`.

use crate::value::{Value, ValueVector};
use std::borrow::Cow;
use std::fmt;

/// One `name[index]` component of a location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    pub name: String,
    /// `None` addresses the first element.
    pub index: Option<usize>,
}

impl Segment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index: None,
        }
    }

    pub fn indexed(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index: Some(index),
        }
    }

    pub fn position(&self) -> usize {
        self.index.unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Location {
    segments: Vec<Segment>,
}

impl Location {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// A single-segment location naming a top-level variable.
    pub fn variable(name: impl Into<String>) -> Self {
        Self::new(vec![Segment::new(name)])
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// Extends the location by one unindexed field.
    pub fn with_field(mut self, name: impl Into<String>) -> Self {
        self.segments.push(Segment::new(name));
        self
    }

    /// Pins the last segment to `index`. No-op on an empty location.
    pub fn with_last_index(mut self, index: usize) -> Self {
        if let Some(last) = self.segments.last_mut() {
            last.index = Some(index);
        }
        self
    }

    /// The sequence addressed by the last segment, without creating anything.
    pub fn resolve_vector(&self, root: &Value) -> Option<ValueVector> {
        let (last, parents) = self.segments.split_last()?;
        let mut current = root.clone();
        for segment in parents {
            current = current.child(&segment.name, segment.position())?;
        }
        current.child_vector(&last.name)
    }

    /// The node addressed by this location, without creating anything. An
    /// empty location addresses `root` itself.
    pub fn resolve(&self, root: &Value) -> Option<Value> {
        match self.segments.last() {
            None => Some(root.clone()),
            Some(last) => self.resolve_vector(root)?.get(last.position()),
        }
    }

    /// The node addressed by this location, creating every missing field and
    /// padding every short sequence on the way.
    pub fn resolve_or_create(&self, root: &Value) -> Value {
        self.segments.iter().fold(root.clone(), |current, segment| {
            current
                .get_children(&segment.name)
                .get_or_create(segment.position())
        })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", escape_field_name(&segment.name))?;
            if let Some(index) = segment.index {
                write!(f, "[{}]", index)?;
            }
        }
        Ok(())
    }
}

/// Characters that would otherwise be read as path syntax.
const RESERVED: [char; 4] = ['\\', '.', '[', ']'];

/// Escapes path syntax inside a field name with a backslash. Plain names are
/// returned unchanged.
pub fn escape_field_name(name: &str) -> Cow<'_, str> {
    if !name.contains(RESERVED) {
        return Cow::Borrowed(name);
    }
    let mut escaped = String::with_capacity(name.len() + 2);
    for c in name.chars() {
        if RESERVED.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    Cow::Owned(escaped)
}
