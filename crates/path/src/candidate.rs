use arbor_value::{Location, Value, ValueVector};

/// One concrete tree location reached by a path: a backing sequence, a
/// position within it and the location that renders to the path string.
///
/// A candidate references its sequence rather than copying it, so reads see
/// concurrent writes to the tree.
#[derive(Debug, Clone)]
pub struct Candidate {
    vector: ValueVector,
    position: usize,
    location: Location,
}

impl Candidate {
    pub fn new(vector: ValueVector, position: usize, location: Location) -> Self {
        Self {
            vector,
            position,
            location,
        }
    }

    pub fn vector(&self) -> &ValueVector {
        &self.vector
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// The human-readable path, parseable back into the same location.
    pub fn path_string(&self) -> String {
        self.location.to_string()
    }

    /// The node at this candidate's position, or `None` if the backing
    /// sequence has since shrunk below it.
    pub fn value(&self) -> Option<Value> {
        self.vector.get(self.position)
    }

    /// Length of the backing sequence.
    pub fn len(&self) -> usize {
        self.vector.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vector.is_empty()
    }
}
