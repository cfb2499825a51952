//! Path queries with existential predicates over mutable value trees.
//!
//! ```
//! use arbor::{Engine, results};
//! use serde_json::json;
//!
//! let engine = Engine::from_json(&json!({
//!     "items": [ { "score": 3 }, { "score": 9 }, { "score": 1 } ]
//! }));
//! let found = engine.evaluate_str("paths items[*] where $.score > 5").unwrap();
//! assert_eq!(results(&found)[0].scalar().to_string(), "items[1]");
//! ```

mod error;

pub use arbor_path::{Candidate, PathError, Step, navigate, navigate_from, parse_location};
pub use arbor_query::{
    EvaluationContext, Expression, QueryConfig, QueryError, RESULTS, evaluate, parse_expression,
};
pub use arbor_value::{Location, Scalar, Segment, Value, ValueLink, ValueVector};
pub use error::Error;

use std::fs;
use std::path::Path;

/// A state root paired with the configuration queries against it run with.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    root: Value,
    config: QueryConfig,
}

impl Engine {
    pub fn new(root: Value) -> Self {
        Self {
            root,
            config: QueryConfig::default(),
        }
    }

    pub fn with_config(mut self, config: QueryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn from_json(json: &serde_json::Value) -> Self {
        Self::new(Value::from_json(json))
    }

    /// Loads a JSON document from disk as the state root.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let text = fs::read_to_string(path.as_ref())?;
        let json: serde_json::Value = serde_json::from_str(&text)?;
        log::debug!("loaded state root from {}", path.as_ref().display());
        Ok(Self::from_json(&json))
    }

    /// The live state root. Writes through it are seen by later queries.
    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    pub fn context(&self) -> EvaluationContext<'_> {
        EvaluationContext::new(&self.root, &self.config)
    }

    pub fn evaluate(&self, expr: &Expression) -> Result<Value, Error> {
        Ok(evaluate(expr, &self.context())?)
    }

    /// Parses and evaluates a textual expression.
    pub fn evaluate_str(&self, text: &str) -> Result<Value, Error> {
        let expr = parse_expression(text)?;
        log::debug!("evaluating {:?}", expr);
        self.evaluate(&expr)
    }

    /// Dereferences a path string, as returned by a `paths` query, into a live
    /// alias.
    pub fn pval_str(&self, path: &str) -> Result<ValueLink, Error> {
        let source = Expression::literal(Scalar::Path(path.to_string()));
        Ok(arbor_query::resolve_pval(&self.context(), &source, &[])?)
    }
}

/// The entries of a PATHS or VALUES result node, in order.
pub fn results(result: &Value) -> Vec<Value> {
    result
        .child_vector(RESULTS)
        .map(|v| v.snapshot())
        .unwrap_or_default()
}
