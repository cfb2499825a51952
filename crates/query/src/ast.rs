//! Defines the Abstract Syntax Tree (AST) for query expressions.

use arbor_path::Step;
use arbor_value::{Location, Scalar};

/// The top-level expression that can be evaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Scalar),
    /// A read of a variable (a location under the state root). Never creates it.
    Variable(Location),
    /// `#path`: the length of the sequence at a location, 0 if absent.
    VectorSize(Location),
    /// `$` followed by optional suffix steps: the candidate under test.
    CurrentValue(Vec<Step>),
    /// `$#`: the length of the sequence backing the candidate under test.
    CurrentValueSize,
    Paths(PathQuery),
    Values(PathQuery),
    /// `pval(source)` plus optional field/index suffix: a live alias to the
    /// location named by a path-typed value.
    Pval {
        source: Box<Expression>,
        suffix: Vec<Step>,
    },
    BinaryOp {
        left: Box<Expression>,
        op: BinaryOperator,
        right: Box<Expression>,
    },
    UnaryOp {
        op: UnaryOperator,
        expr: Box<Expression>,
    },
}

impl Expression {
    pub fn binary(left: Expression, op: BinaryOperator, right: Expression) -> Self {
        Expression::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn not(expr: Expression) -> Self {
        Expression::UnaryOp {
            op: UnaryOperator::Not,
            expr: Box::new(expr),
        }
    }

    pub fn literal(scalar: impl Into<Scalar>) -> Self {
        Expression::Literal(scalar.into())
    }

    /// True if the expression refers to the candidate under test outside of a
    /// nested query (whose `where` clause binds its own candidates).
    pub fn contains_current_value(&self) -> bool {
        match self {
            Expression::CurrentValue(_) | Expression::CurrentValueSize => true,
            Expression::BinaryOp { left, right, .. } => {
                left.contains_current_value() || right.contains_current_value()
            }
            Expression::UnaryOp { expr, .. } => expr.contains_current_value(),
            Expression::Pval { source, .. } => source.contains_current_value(),
            Expression::Literal(_)
            | Expression::Variable(_)
            | Expression::VectorSize(_)
            | Expression::Paths(_)
            | Expression::Values(_) => false,
        }
    }
}

/// The shared shape of PATHS and VALUES: a start variable, the steps to apply
/// and an optional filter.
#[derive(Debug, Clone, PartialEq)]
pub struct PathQuery {
    pub start: Location,
    pub steps: Vec<Step>,
    pub where_clause: Option<Box<Expression>>,
}

impl PathQuery {
    pub fn new(start: Location, steps: Vec<Step>) -> Self {
        Self {
            start,
            steps,
            where_clause: None,
        }
    }

    pub fn with_where(mut self, predicate: Expression) -> Self {
        self.where_clause = Some(Box::new(predicate));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
    Minus,
}

/// A binary operator used in an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Logical
    Or,
    And,
    // Equality
    Equals,
    NotEquals,
    // Relational
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    // Additive
    Plus,
    Minus,
    // Multiplicative
    Multiply,
    Divide,
    Modulo,
}

impl BinaryOperator {
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOperator::Equals
                | BinaryOperator::NotEquals
                | BinaryOperator::LessThan
                | BinaryOperator::LessThanOrEqual
                | BinaryOperator::GreaterThan
                | BinaryOperator::GreaterThanOrEqual
        )
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOperator::Plus
                | BinaryOperator::Minus
                | BinaryOperator::Multiply
                | BinaryOperator::Divide
                | BinaryOperator::Modulo
        )
    }
}
