//! The query forms built on navigation: PATHS, VALUES, the current-value size
//! and PVAL dereferencing.

use crate::ast::Expression;
use crate::engine::{EvaluationContext, evaluate};
use crate::error::QueryError;
use crate::where_clause;
use arbor_path::{Candidate, Step, navigate, parse_location, render_suffix};
use arbor_value::{Location, Scalar, Value, ValueLink};

/// The field of a query result node that holds the matches.
pub const RESULTS: &str = "results";

/// Collects the path string of every matching candidate, in navigation order.
pub fn paths(
    ctx: &EvaluationContext<'_>,
    start: &Location,
    steps: &[Step],
    where_clause: Option<&Expression>,
) -> Result<Value, QueryError> {
    let result = Value::new();
    for candidate in filtered(ctx, start, steps, where_clause)? {
        let path = Value::with_scalar(Scalar::Path(candidate.path_string()));
        result.add_child(RESULTS, path);
    }
    Ok(result)
}

/// Collects a deep copy of every matching candidate's value, in navigation
/// order. The copies share nothing with the source tree.
pub fn values(
    ctx: &EvaluationContext<'_>,
    start: &Location,
    steps: &[Step],
    where_clause: Option<&Expression>,
) -> Result<Value, QueryError> {
    let result = Value::new();
    for candidate in filtered(ctx, start, steps, where_clause)? {
        if let Some(value) = candidate.value() {
            result.add_child(RESULTS, value.deep_copy());
        }
    }
    Ok(result)
}

fn filtered(
    ctx: &EvaluationContext<'_>,
    start: &Location,
    steps: &[Step],
    where_clause: Option<&Expression>,
) -> Result<Vec<Candidate>, QueryError> {
    let candidates = navigate(ctx.root, start, steps);
    let total = candidates.len();
    let kept = match where_clause {
        None => candidates,
        Some(predicate) => {
            let mut kept = Vec::with_capacity(total);
            for candidate in candidates {
                if where_clause::matches(predicate, &candidate, ctx)? {
                    kept.push(candidate);
                }
            }
            kept
        }
    };
    log::debug!("query from '{}': {} of {} candidate(s) kept", start, kept.len(), total);
    Ok(kept)
}

/// Length of the sequence backing the candidate bound to `$`, 0 if none.
pub fn current_value_size(ctx: &EvaluationContext<'_>) -> usize {
    ctx.current.map_or(0, Candidate::len)
}

/// Turns a path-typed value plus a field/index suffix into a live alias.
///
/// The suffix is rendered and appended to the path text, and the result is
/// parsed back into a location. Any other kind of value is a type error.
pub fn resolve_pval(
    ctx: &EvaluationContext<'_>,
    source: &Expression,
    suffix: &[Step],
) -> Result<ValueLink, QueryError> {
    let path = match evaluate(source, ctx)?.scalar() {
        Scalar::Path(path) => path,
        other => {
            return Err(QueryError::TypeError(format!(
                "pval expects a path, found a {} value",
                other.type_name()
            )));
        }
    };
    let text = format!("{}{}", path, render_suffix(suffix)?);
    let location = parse_location(&text)?;
    log::trace!("pval resolved '{}'", location);
    Ok(ValueLink::new(ctx.root.clone(), location))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QueryConfig;
    use crate::ast::BinaryOperator;
    use serde_json::json;

    fn items() -> Value {
        Value::from_json(&json!({
            "items": [ { "score": 3 }, { "score": 9 }, { "score": 1 } ]
        }))
    }

    fn score_above(limit: i32) -> Expression {
        Expression::binary(
            Expression::CurrentValue(vec![Step::field("score")]),
            BinaryOperator::GreaterThan,
            Expression::literal(limit),
        )
    }

    fn results(value: &Value) -> Vec<Value> {
        value
            .child_vector(RESULTS)
            .map(|v| v.snapshot())
            .unwrap_or_default()
    }

    #[test]
    fn test_values_with_where() {
        let _ = env_logger::builder().is_test(true).try_init();
        let root = items();
        let config = QueryConfig::default();
        let ctx = EvaluationContext::new(&root, &config);
        let predicate = score_above(5);

        let found = values(&ctx, &Location::variable("items"), &[Step::ArrayWildcard], Some(&predicate))
            .unwrap();
        let found = results(&found);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].to_json(), json!({ "score": 9 }));

        let found = paths(&ctx, &Location::variable("items"), &[Step::ArrayWildcard], Some(&predicate))
            .unwrap();
        let found: Vec<Scalar> = results(&found).iter().map(Value::scalar).collect();
        assert_eq!(found, vec![Scalar::Path("items[1]".to_string())]);
    }

    #[test]
    fn test_no_matches_leaves_results_absent() {
        let root = items();
        let config = QueryConfig::default();
        let ctx = EvaluationContext::new(&root, &config);
        let predicate = score_above(100);
        let found = paths(&ctx, &Location::variable("items"), &[Step::ArrayWildcard], Some(&predicate))
            .unwrap();
        assert!(found.child_vector(RESULTS).is_none());
    }

    #[test]
    fn test_values_are_independent_copies() {
        let root = items();
        let config = QueryConfig::default();
        let ctx = EvaluationContext::new(&root, &config);
        let found = values(&ctx, &Location::variable("items"), &[Step::ArrayIndex(0)], None).unwrap();
        let copy = &results(&found)[0];
        copy.first_child("score").set_scalar(100);
        let original = root.child("items", 0).and_then(|n| n.child("score", 0)).unwrap();
        assert_eq!(original.scalar(), Scalar::Int(3));
    }

    #[test]
    fn test_pval_round_trip_is_a_live_alias() {
        let _ = env_logger::builder().is_test(true).try_init();
        let root = items();
        let config = QueryConfig::default();
        let ctx = EvaluationContext::new(&root, &config);
        let source = Expression::literal(Scalar::Path("items[1]".to_string()));

        let link = resolve_pval(&ctx, &source, &[Step::field("score")]).unwrap();
        assert_eq!(link.location().to_string(), "items[1].score");
        let aliased = link.get().unwrap();
        assert_eq!(aliased.scalar(), Scalar::Int(9));

        aliased.set_scalar(10);
        let original = root.child("items", 1).and_then(|n| n.child("score", 0)).unwrap();
        assert_eq!(original.scalar(), Scalar::Int(10));
    }

    #[test]
    fn test_pval_rejects_non_path_values() {
        let root = items();
        let config = QueryConfig::default();
        let ctx = EvaluationContext::new(&root, &config);
        let source = Expression::literal("items[1]");
        assert!(matches!(
            resolve_pval(&ctx, &source, &[]),
            Err(QueryError::TypeError(_))
        ));

        let bad = Expression::literal(Scalar::Path("items[x]".to_string()));
        assert!(matches!(
            resolve_pval(&ctx, &bad, &[]),
            Err(QueryError::Path(_))
        ));
    }

    #[test]
    fn test_current_value_size() {
        let root = items();
        let config = QueryConfig::default();
        let ctx = EvaluationContext::new(&root, &config);
        assert_eq!(current_value_size(&ctx), 0);
        let candidate = navigate(&root, &Location::variable("items"), &[]).remove(0);
        assert_eq!(current_value_size(&ctx.with_current(&candidate)), 3);
    }
}
