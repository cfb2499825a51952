//! The path step vocabulary.

use arbor_value::escape_field_name;
use std::fmt;

/// One atomic navigation operation applied to a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    /// `.name`: the whole sequence under `name`.
    Field(String),
    /// `.*`: one candidate per non-empty field.
    FieldWildcard,
    /// `[n]`: position `n` of the current sequence, if it exists.
    ArrayIndex(usize),
    /// `[*]`: every position of the current sequence.
    ArrayWildcard,
    /// `..name`: every descendant sequence named `name`, breadth-first.
    RecursiveField(String),
    /// `..*`: every descendant sequence, breadth-first.
    RecursiveWildcard,
}

impl Step {
    pub fn field(name: impl Into<String>) -> Self {
        Step::Field(name.into())
    }

    pub fn recursive_field(name: impl Into<String>) -> Self {
        Step::RecursiveField(name.into())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Field(name) => write!(f, ".{}", escape_field_name(name)),
            Step::FieldWildcard => write!(f, ".*"),
            Step::ArrayIndex(index) => write!(f, "[{}]", index),
            Step::ArrayWildcard => write!(f, "[*]"),
            Step::RecursiveField(name) => write!(f, "..{}", escape_field_name(name)),
            Step::RecursiveWildcard => write!(f, "..*"),
        }
    }
}
