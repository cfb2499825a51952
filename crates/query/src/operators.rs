//! Scalar comparison and arithmetic.

use crate::ast::BinaryOperator;
use crate::error::QueryError;
use arbor_value::Scalar;
use std::cmp::Ordering;

/// Applies a comparison operator to one pair of scalars. Operands with no
/// defined ordering satisfy no relational operator.
pub fn compare(op: BinaryOperator, left: &Scalar, right: &Scalar) -> bool {
    match op {
        BinaryOperator::Equals => left.loose_eq(right),
        BinaryOperator::NotEquals => !left.loose_eq(right),
        BinaryOperator::LessThan => left.loose_cmp(right) == Some(Ordering::Less),
        BinaryOperator::LessThanOrEqual => {
            matches!(left.loose_cmp(right), Some(Ordering::Less | Ordering::Equal))
        }
        BinaryOperator::GreaterThan => left.loose_cmp(right) == Some(Ordering::Greater),
        BinaryOperator::GreaterThanOrEqual => {
            matches!(left.loose_cmp(right), Some(Ordering::Greater | Ordering::Equal))
        }
        _ => false,
    }
}

/// Numeric kinds, narrowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum NumericKind {
    Int,
    Long,
    Double,
}

fn numeric_kind(scalar: &Scalar) -> Result<NumericKind, QueryError> {
    match scalar {
        Scalar::Bool(_) | Scalar::Int(_) => Ok(NumericKind::Int),
        Scalar::Long(_) => Ok(NumericKind::Long),
        Scalar::Double(_) => Ok(NumericKind::Double),
        other => Err(QueryError::TypeError(format!(
            "cannot use a {} value in arithmetic",
            other.type_name()
        ))),
    }
}

/// Applies an arithmetic operator.
///
/// `+` concatenates when either side is text. An undefined operand yields the
/// other operand (negated for `undefined - x`). Integer results that overflow
/// `int` widen to `long`.
pub fn arithmetic(op: BinaryOperator, left: &Scalar, right: &Scalar) -> Result<Scalar, QueryError> {
    if !left.is_defined() {
        return match op {
            BinaryOperator::Minus => Ok(negate(right)),
            _ => Ok(right.clone()),
        };
    }
    if !right.is_defined() {
        return Ok(left.clone());
    }
    if op == BinaryOperator::Plus && (left.is_textual() || right.is_textual()) {
        return Ok(Scalar::Str(format!("{}{}", left, right)));
    }

    match numeric_kind(left)?.max(numeric_kind(right)?) {
        NumericKind::Double => Ok(Scalar::Double(double_op(op, left.to_double(), right.to_double()))),
        NumericKind::Long => long_op(op, left.to_long(), right.to_long()).map(Scalar::Long),
        NumericKind::Int => {
            let result = long_op(op, left.to_long(), right.to_long())?;
            Ok(i32::try_from(result).map_or(Scalar::Long(result), Scalar::Int))
        }
    }
}

fn double_op(op: BinaryOperator, l: f64, r: f64) -> f64 {
    match op {
        BinaryOperator::Plus => l + r,
        BinaryOperator::Minus => l - r,
        BinaryOperator::Multiply => l * r,
        BinaryOperator::Divide => l / r,
        BinaryOperator::Modulo => l % r,
        _ => f64::NAN,
    }
}

fn long_op(op: BinaryOperator, l: i64, r: i64) -> Result<i64, QueryError> {
    match op {
        BinaryOperator::Plus => Ok(l.wrapping_add(r)),
        BinaryOperator::Minus => Ok(l.wrapping_sub(r)),
        BinaryOperator::Multiply => Ok(l.wrapping_mul(r)),
        BinaryOperator::Divide if r == 0 => Err(QueryError::Arithmetic(format!("division of {} by zero", l))),
        BinaryOperator::Modulo if r == 0 => Err(QueryError::Arithmetic(format!("remainder of {} by zero", l))),
        BinaryOperator::Divide => Ok(l.wrapping_div(r)),
        BinaryOperator::Modulo => Ok(l.wrapping_rem(r)),
        other => Err(QueryError::TypeError(format!(
            "{:?} is not an arithmetic operator",
            other
        ))),
    }
}

pub fn negate(scalar: &Scalar) -> Scalar {
    match scalar {
        Scalar::Undefined => Scalar::Undefined,
        Scalar::Bool(b) => Scalar::Int(-i32::from(*b)),
        Scalar::Int(i) => i
            .checked_neg()
            .map_or(Scalar::Long(-i64::from(*i)), Scalar::Int),
        Scalar::Long(l) => Scalar::Long(l.wrapping_neg()),
        other => Scalar::Double(-other.to_double()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relational_operators() {
        let (three, five) = (Scalar::Int(3), Scalar::Int(5));
        assert!(compare(BinaryOperator::LessThan, &three, &five));
        assert!(compare(BinaryOperator::LessThanOrEqual, &three, &three));
        assert!(!compare(BinaryOperator::GreaterThan, &three, &five));
        assert!(compare(BinaryOperator::NotEquals, &three, &five));
        assert!(!compare(BinaryOperator::GreaterThanOrEqual, &Scalar::Undefined, &five));
    }

    #[test]
    fn test_arithmetic_widening() {
        assert_eq!(
            arithmetic(BinaryOperator::Plus, &Scalar::Int(2), &Scalar::Int(3)),
            Ok(Scalar::Int(5))
        );
        assert_eq!(
            arithmetic(BinaryOperator::Multiply, &Scalar::Int(i32::MAX), &Scalar::Int(2)),
            Ok(Scalar::Long(i64::from(i32::MAX) * 2))
        );
        assert_eq!(
            arithmetic(BinaryOperator::Divide, &Scalar::Int(7), &Scalar::Double(2.0)),
            Ok(Scalar::Double(3.5))
        );
        assert_eq!(
            arithmetic(BinaryOperator::Plus, &Scalar::Str("n".into()), &Scalar::Int(1)),
            Ok(Scalar::Str("n1".into()))
        );
    }

    #[test]
    fn test_undefined_operands() {
        assert_eq!(
            arithmetic(BinaryOperator::Plus, &Scalar::Undefined, &Scalar::Int(4)),
            Ok(Scalar::Int(4))
        );
        assert_eq!(
            arithmetic(BinaryOperator::Minus, &Scalar::Undefined, &Scalar::Int(4)),
            Ok(Scalar::Int(-4))
        );
    }

    #[test]
    fn test_integer_division_by_zero() {
        assert!(matches!(
            arithmetic(BinaryOperator::Divide, &Scalar::Int(1), &Scalar::Int(0)),
            Err(QueryError::Arithmetic(_))
        ));
        assert!(matches!(
            arithmetic(BinaryOperator::Minus, &Scalar::Str("a".into()), &Scalar::Int(1)),
            Err(QueryError::TypeError(_))
        ));
    }

    #[test]
    fn test_long_division_overflow_wraps() {
        let (min, minus_one) = (Scalar::Long(i64::MIN), Scalar::Long(-1));
        assert_eq!(
            arithmetic(BinaryOperator::Divide, &min, &minus_one),
            Ok(Scalar::Long(i64::MIN))
        );
        assert_eq!(
            arithmetic(BinaryOperator::Modulo, &min, &minus_one),
            Ok(Scalar::Long(0))
        );
        assert_eq!(
            arithmetic(BinaryOperator::Divide, &Scalar::Int(i32::MIN), &Scalar::Int(-1)),
            Ok(Scalar::Long(-i64::from(i32::MIN)))
        );
        assert!(matches!(
            arithmetic(BinaryOperator::Modulo, &min, &Scalar::Long(0)),
            Err(QueryError::Arithmetic(message)) if message.contains("by zero")
        ));
    }
}
