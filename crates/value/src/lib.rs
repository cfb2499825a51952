//! The value tree: a mutable node type carrying an optional scalar plus named,
//! ordered, repeatable child sequences.
//!
//! Every handle type here is cheap to clone and shares its target; nodes and
//! sequences synchronize internally so trees can be shared across sessions.

pub mod json;
pub mod link;
pub mod location;
pub mod scalar;
pub mod value;

pub use link::ValueLink;
pub use location::{Location, Segment, escape_field_name};
pub use scalar::Scalar;
pub use value::{Value, ValueVector};
