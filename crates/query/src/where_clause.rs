//! Existential evaluation of `where` predicates.
//!
//! A predicate is true for a candidate if *some* expansion of the paths hanging
//! off `$` makes it true. Comparison operands are resolved to lists of scalars
//! and the comparison holds if any pair from their cross product satisfies it.
//! Each operand of `&&`/`||` runs its own search.
//!
//! Under the default config a failure is contained where it happens: a pair
//! of arithmetic operands that cannot be combined contributes no value, and a
//! comparison whose operands fail to resolve is false. The connectives around
//! it only ever see a boolean.

use crate::ast::{BinaryOperator, Expression, UnaryOperator};
use crate::engine::{EvaluationContext, evaluate};
use crate::error::QueryError;
use crate::operators;
use arbor_path::Candidate;
use arbor_value::Scalar;
use itertools::Itertools;

/// Decides whether `candidate` satisfies `predicate`.
///
/// Errors raised while probing the candidate's shape count as a non-match
/// unless [`QueryConfig::where_errors_as_false`] is disabled.
///
/// [`QueryConfig::where_errors_as_false`]: crate::QueryConfig::where_errors_as_false
pub fn matches(
    predicate: &Expression,
    candidate: &Candidate,
    ctx: &EvaluationContext<'_>,
) -> Result<bool, QueryError> {
    let scoped = ctx.with_current(candidate);
    match test(predicate, &scoped) {
        Ok(result) => Ok(result),
        Err(e) if ctx.config.where_errors_as_false => {
            log::debug!(
                "predicate failed on '{}', treating as no match: {}",
                candidate.path_string(),
                e
            );
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// Evaluates `expr` as a boolean in the given context.
pub fn test(expr: &Expression, ctx: &EvaluationContext<'_>) -> Result<bool, QueryError> {
    match expr {
        Expression::CurrentValue(suffix) => {
            Ok(ctx.current_values(suffix).iter().any(|v| v.to_bool()))
        }
        Expression::BinaryOp { left, op, right } => match op {
            BinaryOperator::And => Ok(test(left, ctx)? && test(right, ctx)?),
            BinaryOperator::Or => Ok(test(left, ctx)? || test(right, ctx)?),
            op if op.is_comparison() => contain(compare(*op, left, right, ctx), expr, ctx),
            _ => contain(evaluate(expr, ctx).map(|v| v.to_bool()), expr, ctx),
        },
        Expression::UnaryOp {
            op: UnaryOperator::Not,
            expr: inner,
        } => Ok(!test(inner, ctx)?),
        _ => contain(evaluate(expr, ctx).map(|v| v.to_bool()), expr, ctx),
    }
}

fn compare(
    op: BinaryOperator,
    left: &Expression,
    right: &Expression,
    ctx: &EvaluationContext<'_>,
) -> Result<bool, QueryError> {
    let lefts = resolve_operand(left, ctx)?;
    let rights = resolve_operand(right, ctx)?;
    Ok(lefts
        .iter()
        .cartesian_product(rights.iter())
        .any(|(l, r)| operators::compare(op, l, r)))
}

/// True while testing a candidate with errors counted as non-matches.
fn lenient(ctx: &EvaluationContext<'_>) -> bool {
    ctx.current.is_some() && ctx.config.where_errors_as_false
}

fn contain(
    result: Result<bool, QueryError>,
    expr: &Expression,
    ctx: &EvaluationContext<'_>,
) -> Result<bool, QueryError> {
    match result {
        Err(e) if lenient(ctx) => {
            log::debug!("'{:?}' failed, counted as false: {}", expr, e);
            Ok(false)
        }
        other => other,
    }
}

/// Resolves a comparison operand to every scalar it can take. Operands that do
/// not mention `$` take exactly one.
fn resolve_operand(expr: &Expression, ctx: &EvaluationContext<'_>) -> Result<Vec<Scalar>, QueryError> {
    if !expr.contains_current_value() {
        return Ok(vec![evaluate(expr, ctx)?.scalar()]);
    }
    match expr {
        Expression::CurrentValue(suffix) => Ok(ctx
            .current_values(suffix)
            .iter()
            .map(|v| v.scalar())
            .collect()),
        Expression::BinaryOp { left, op, right } if op.is_arithmetic() => {
            let lefts = resolve_operand(left, ctx)?;
            let rights = resolve_operand(right, ctx)?;
            let mut resolved = Vec::with_capacity(lefts.len() * rights.len());
            for (l, r) in lefts.iter().cartesian_product(rights.iter()) {
                match operators::arithmetic(*op, l, r) {
                    Ok(value) => resolved.push(value),
                    Err(e) if lenient(ctx) => {
                        log::debug!("skipping operand pair ({:?}, {:?}): {}", l, r, e)
                    }
                    Err(e) => return Err(e),
                }
            }
            Ok(resolved)
        }
        Expression::UnaryOp {
            op: UnaryOperator::Minus,
            expr: inner,
        } => Ok(resolve_operand(inner, ctx)?
            .iter()
            .map(operators::negate)
            .collect()),
        _ => Ok(vec![evaluate(expr, ctx)?.scalar()]),
    }
}
