//! Query expressions over value trees.
//!
//! PATHS and VALUES enumerate the candidates a path reaches, filtered by an
//! optional `where` predicate evaluated with existential semantics. PVAL turns
//! a path string returned by PATHS back into a live alias.

pub mod ast;
pub mod config;
pub mod engine;
pub mod error;
pub mod operators;
pub mod parser;
pub mod query;
pub mod where_clause;

pub use ast::{BinaryOperator, Expression, PathQuery, UnaryOperator};
pub use config::QueryConfig;
pub use engine::{EvaluationContext, evaluate};
pub use error::QueryError;
pub use parser::parse_expression;
pub use query::{RESULTS, current_value_size, paths, resolve_pval, values};
pub use where_clause::matches;
