//! The evaluation engine for executing a parsed query AST against a value tree.

use crate::ast::{Expression, UnaryOperator};
use crate::config::QueryConfig;
use crate::error::QueryError;
use crate::{operators, query, where_clause};
use arbor_path::{Candidate, navigate_from};
use arbor_value::{Location, Value};

/// A container for all state needed during expression evaluation.
///
/// The candidate under test is threaded through explicitly: a `where` clause
/// evaluates its predicate in a context derived with [`with_current`], so no
/// shared placeholder is ever written and evaluation is reentrant.
///
/// [`with_current`]: EvaluationContext::with_current
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    /// The state root that variables are read from.
    pub root: &'a Value,
    pub config: &'a QueryConfig,
    /// The candidate bound to `$`, if any.
    pub current: Option<&'a Candidate>,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(root: &'a Value, config: &'a QueryConfig) -> Self {
        Self {
            root,
            config,
            current: None,
        }
    }

    /// Returns a context identical to this one with `candidate` bound to `$`.
    pub fn with_current<'c>(&self, candidate: &'c Candidate) -> EvaluationContext<'c>
    where
        'a: 'c,
    {
        EvaluationContext {
            root: self.root,
            config: self.config,
            current: Some(candidate),
        }
    }

    /// The values reached from the bound candidate through `suffix`. Empty if
    /// nothing is bound.
    pub(crate) fn current_values(&self, suffix: &[arbor_path::Step]) -> Vec<Value> {
        match self.current {
            Some(candidate) => navigate_from(candidate, suffix)
                .iter()
                .filter_map(Candidate::value)
                .collect(),
            None => Vec::new(),
        }
    }
}

/// Evaluates an expression and returns the resulting node.
///
/// Reads never create anything in the tree. Absent variables evaluate to a
/// detached undefined node unless the context is strict.
pub fn evaluate(expr: &Expression, ctx: &EvaluationContext<'_>) -> Result<Value, QueryError> {
    match expr {
        Expression::Literal(scalar) => Ok(Value::with_scalar(scalar.clone())),
        Expression::Variable(location) => read_variable(location, ctx),
        Expression::VectorSize(location) => {
            let size = location.resolve_vector(ctx.root).map_or(0, |v| v.len());
            Ok(Value::with_scalar(size))
        }
        Expression::CurrentValue(suffix) => Ok(ctx
            .current_values(suffix)
            .into_iter()
            .next()
            .unwrap_or_default()),
        Expression::CurrentValueSize => Ok(Value::with_scalar(query::current_value_size(ctx))),
        Expression::Paths(q) => query::paths(ctx, &q.start, &q.steps, q.where_clause.as_deref()),
        Expression::Values(q) => query::values(ctx, &q.start, &q.steps, q.where_clause.as_deref()),
        Expression::Pval { source, suffix } => {
            let link = query::resolve_pval(ctx, source, suffix)?;
            Ok(link.get().unwrap_or_default())
        }
        Expression::BinaryOp { left, op, right } => {
            if op.is_arithmetic() {
                let left_val = evaluate(left, ctx)?.scalar();
                let right_val = evaluate(right, ctx)?.scalar();
                operators::arithmetic(*op, &left_val, &right_val).map(Value::with_scalar)
            } else {
                where_clause::test(expr, ctx).map(Value::with_scalar)
            }
        }
        Expression::UnaryOp { op, expr: inner } => match op {
            UnaryOperator::Not => where_clause::test(expr, ctx).map(Value::with_scalar),
            UnaryOperator::Minus => {
                let val = evaluate(inner, ctx)?.scalar();
                Ok(Value::with_scalar(operators::negate(&val)))
            }
        },
    }
}

fn read_variable(location: &Location, ctx: &EvaluationContext<'_>) -> Result<Value, QueryError> {
    if ctx.config.strict
        && let Some(first) = location.segments().first()
        && ctx.root.child_vector(&first.name).is_none()
    {
        return Err(QueryError::UnknownVariable(first.name.clone()));
    }
    Ok(location.resolve(ctx.root).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BinaryOperator;
    use arbor_value::Scalar;
    use serde_json::json;

    fn var(path: &str) -> Expression {
        Expression::Variable(arbor_path::parse_location(path).unwrap())
    }

    #[test]
    fn test_variable_reads_do_not_vivify() {
        let root = Value::from_json(&json!({ "a": { "b": 4 } }));
        let config = QueryConfig::default();
        let ctx = EvaluationContext::new(&root, &config);

        assert_eq!(evaluate(&var("a.b"), &ctx).unwrap().scalar(), Scalar::Int(4));
        assert!(!evaluate(&var("a.missing.deeper"), &ctx).unwrap().is_defined());
        let a = root.child("a", 0).unwrap();
        assert!(a.child_vector("missing").is_none());
    }

    #[test]
    fn test_strict_mode_rejects_unknown_variables() {
        let root = Value::from_json(&json!({ "known": 1 }));
        let config = QueryConfig {
            strict: true,
            ..QueryConfig::default()
        };
        let ctx = EvaluationContext::new(&root, &config);
        assert!(matches!(
            evaluate(&var("unknown"), &ctx),
            Err(QueryError::UnknownVariable(name)) if name == "unknown"
        ));
        assert!(evaluate(&var("known"), &ctx).is_ok());
    }

    #[test]
    fn test_vector_size_and_arithmetic() {
        let root = Value::from_json(&json!({ "xs": [1, 2, 3] }));
        let config = QueryConfig::default();
        let ctx = EvaluationContext::new(&root, &config);

        let size = Expression::VectorSize(Location::variable("xs"));
        assert_eq!(evaluate(&size, &ctx).unwrap().scalar(), Scalar::Int(3));
        let absent = Expression::VectorSize(Location::variable("ys"));
        assert_eq!(evaluate(&absent, &ctx).unwrap().scalar(), Scalar::Int(0));

        let sum = Expression::binary(var("xs[2]"), BinaryOperator::Multiply, Expression::literal(10));
        assert_eq!(evaluate(&sum, &ctx).unwrap().scalar(), Scalar::Int(30));
    }

    #[test]
    fn test_current_value_without_binding_is_undefined() {
        let root = Value::new();
        let config = QueryConfig::default();
        let ctx = EvaluationContext::new(&root, &config);
        let current = Expression::CurrentValue(vec![]);
        assert!(!evaluate(&current, &ctx).unwrap().is_defined());
        assert_eq!(
            evaluate(&Expression::CurrentValueSize, &ctx).unwrap().scalar(),
            Scalar::Int(0)
        );
    }
}
