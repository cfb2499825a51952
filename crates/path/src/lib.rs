//! Path navigation over value trees.
//!
//! A path is a start location plus a list of [`Step`]s. [`navigate`] expands it
//! into the ordered list of [`Candidate`]s it reaches; every candidate carries a
//! location that renders to a path string and parses back with
//! [`parse_location`].

pub mod ast;
pub mod candidate;
pub mod error;
pub mod navigator;
pub mod parser;

pub use ast::Step;
pub use candidate::Candidate;
pub use error::PathError;
pub use navigator::{navigate, navigate_from};
pub use parser::{parse_location, render_suffix};
