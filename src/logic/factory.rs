//! Stateless constructors for expression nodes.
//!
//! `Logic` has one constructor per operator plus sugared forms built by
//! composition (field comparisons, range checks). No operand type checks are
//! made here; compatibility is left to the evaluator.

use crate::logic::node::{Conditional, Expression, LengthCheck, PatternMatch, Variable};
use crate::logic::{LogicError, LogicResult, Operand, Operator};

/// Factory for logic expressions
pub struct Logic;

impl Logic {
    /// `{"var": path}`
    pub fn var(path: impl Into<Operand>) -> Expression {
        Expression::Var(Variable::new(path))
    }

    /// `{"var": [path, default]}`, or the bare path when `default` is null
    pub fn var_with_default(path: impl Into<Operand>, default: impl Into<Operand>) -> Expression {
        Expression::Var(Variable::with_default(path, default))
    }

    pub fn missing<S: Into<String>>(keys: impl IntoIterator<Item = S>) -> Expression {
        Expression::Missing(keys.into_iter().map(Into::into).collect())
    }

    pub fn missing_some<S: Into<String>>(
        minimum: u64,
        keys: impl IntoIterator<Item = S>,
    ) -> Expression {
        Expression::MissingSome {
            minimum,
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn equals(left: impl Into<Operand>, right: impl Into<Operand>) -> Expression {
        Expression::Equals(left.into(), right.into())
    }

    pub fn not_equals(left: impl Into<Operand>, right: impl Into<Operand>) -> Expression {
        Expression::NotEquals(left.into(), right.into())
    }

    pub fn strict_equals(left: impl Into<Operand>, right: impl Into<Operand>) -> Expression {
        Expression::StrictEquals(left.into(), right.into())
    }

    pub fn strict_not_equals(left: impl Into<Operand>, right: impl Into<Operand>) -> Expression {
        Expression::StrictNotEquals(left.into(), right.into())
    }

    pub fn greater_than(left: impl Into<Operand>, right: impl Into<Operand>) -> Expression {
        Expression::GreaterThan(left.into(), right.into())
    }

    pub fn greater_than_or_equal(
        left: impl Into<Operand>,
        right: impl Into<Operand>,
    ) -> Expression {
        Expression::GreaterThanOrEqual(left.into(), right.into())
    }

    pub fn less_than(left: impl Into<Operand>, right: impl Into<Operand>) -> Expression {
        Expression::LessThan(left.into(), right.into(), None)
    }

    pub fn less_than_or_equal(left: impl Into<Operand>, right: impl Into<Operand>) -> Expression {
        Expression::LessThanOrEqual(left.into(), right.into(), None)
    }

    /// Exclusive range: `{"<": [min, value, max]}`
    pub fn between(
        min: impl Into<Operand>,
        value: impl Into<Operand>,
        max: impl Into<Operand>,
    ) -> Expression {
        Expression::LessThan(min.into(), value.into(), Some(max.into()))
    }

    /// Inclusive range: `{"<=": [min, value, max]}`
    pub fn between_inclusive(
        min: impl Into<Operand>,
        value: impl Into<Operand>,
        max: impl Into<Operand>,
    ) -> Expression {
        Expression::LessThanOrEqual(min.into(), value.into(), Some(max.into()))
    }

    /// Build the two-operand comparison named by `operator`.
    pub fn comparison(
        operator: Operator,
        left: impl Into<Operand>,
        right: impl Into<Operand>,
    ) -> LogicResult<Expression> {
        if !operator.is_comparison() {
            return Err(LogicError::construction(format!(
                "'{}' is not a comparison operator",
                operator
            )));
        }
        let (left, right) = (left.into(), right.into());
        let node = match operator {
            Operator::Equals => Expression::Equals(left, right),
            Operator::NotEquals => Expression::NotEquals(left, right),
            Operator::StrictEquals => Expression::StrictEquals(left, right),
            Operator::StrictNotEquals => Expression::StrictNotEquals(left, right),
            Operator::GreaterThan => Expression::GreaterThan(left, right),
            Operator::GreaterThanOrEqual => Expression::GreaterThanOrEqual(left, right),
            Operator::LessThan => Expression::LessThan(left, right, None),
            _ => Expression::LessThanOrEqual(left, right, None),
        };
        Ok(node)
    }

    pub fn and<T: Into<Operand>>(operands: impl IntoIterator<Item = T>) -> Expression {
        Expression::And(collect(operands))
    }

    pub fn or<T: Into<Operand>>(operands: impl IntoIterator<Item = T>) -> Expression {
        Expression::Or(collect(operands))
    }

    pub fn not(operand: impl Into<Operand>) -> Expression {
        Expression::Not(operand.into())
    }

    pub fn double_negate(operand: impl Into<Operand>) -> Expression {
        Expression::DoubleNegate(operand.into())
    }

    /// `if` from a flat `[cond, result, ..., else?]` list
    pub fn condition<T: Into<Operand>>(
        branches: impl IntoIterator<Item = T>,
    ) -> LogicResult<Expression> {
        Ok(Expression::If(Conditional::new(branches)?))
    }

    pub fn all(collection: impl Into<Operand>, test: impl Into<Operand>) -> Expression {
        Expression::All(collection.into(), test.into())
    }

    pub fn some(collection: impl Into<Operand>, test: impl Into<Operand>) -> Expression {
        Expression::Some(collection.into(), test.into())
    }

    pub fn none(collection: impl Into<Operand>, test: impl Into<Operand>) -> Expression {
        Expression::None(collection.into(), test.into())
    }

    /// `in`: membership in a list, or substring of a string
    pub fn is_in(needle: impl Into<Operand>, haystack: impl Into<Operand>) -> Expression {
        Expression::In(needle.into(), haystack.into())
    }

    pub fn map(collection: impl Into<Operand>, logic: impl Into<Operand>) -> Expression {
        Expression::Map(collection.into(), logic.into())
    }

    pub fn filter(collection: impl Into<Operand>, logic: impl Into<Operand>) -> Expression {
        Expression::Filter(collection.into(), logic.into())
    }

    pub fn reduce(
        collection: impl Into<Operand>,
        logic: impl Into<Operand>,
        initial: impl Into<Operand>,
    ) -> Expression {
        Expression::Reduce(collection.into(), logic.into(), initial.into())
    }

    pub fn merge<T: Into<Operand>>(operands: impl IntoIterator<Item = T>) -> Expression {
        Expression::Merge(collect(operands))
    }

    pub fn max<T: Into<Operand>>(operands: impl IntoIterator<Item = T>) -> Expression {
        Expression::Max(collect(operands))
    }

    pub fn min<T: Into<Operand>>(operands: impl IntoIterator<Item = T>) -> Expression {
        Expression::Min(collect(operands))
    }

    pub fn add<T: Into<Operand>>(operands: impl IntoIterator<Item = T>) -> Expression {
        Expression::Add(collect(operands))
    }

    pub fn subtract<T: Into<Operand>>(operands: impl IntoIterator<Item = T>) -> Expression {
        Expression::Subtract(collect(operands))
    }

    pub fn multiply<T: Into<Operand>>(operands: impl IntoIterator<Item = T>) -> Expression {
        Expression::Multiply(collect(operands))
    }

    pub fn divide(left: impl Into<Operand>, right: impl Into<Operand>) -> Expression {
        Expression::Divide(left.into(), right.into())
    }

    pub fn modulo(left: impl Into<Operand>, right: impl Into<Operand>) -> Expression {
        Expression::Modulo(left.into(), right.into())
    }

    pub fn cat<T: Into<Operand>>(operands: impl IntoIterator<Item = T>) -> Expression {
        Expression::Cat(collect(operands))
    }

    pub fn length(subject: impl Into<Operand>) -> Expression {
        Expression::Length(LengthCheck::new(subject))
    }

    pub fn matches(subject: impl Into<Operand>, pattern: impl Into<Operand>) -> Expression {
        Expression::Match(PatternMatch::new(subject, pattern))
    }

    pub fn matches_with_flags(
        subject: impl Into<Operand>,
        pattern: impl Into<Operand>,
        flags: impl Into<Operand>,
    ) -> Expression {
        Expression::Match(PatternMatch::with_flags(subject, pattern, flags))
    }

    pub fn substr(string: impl Into<Operand>, start: impl Into<Operand>) -> Expression {
        Expression::Substr(string.into(), start.into(), None)
    }

    pub fn substr_with_length(
        string: impl Into<Operand>,
        start: impl Into<Operand>,
        length: impl Into<Operand>,
    ) -> Expression {
        Expression::Substr(string.into(), start.into(), Some(length.into()))
    }

    /// `field == value`
    pub fn field_equals(field: impl Into<Operand>, value: impl Into<Operand>) -> Expression {
        Self::equals(Self::var(field), value)
    }

    /// `field != value`
    pub fn field_not_equals(field: impl Into<Operand>, value: impl Into<Operand>) -> Expression {
        Self::not_equals(Self::var(field), value)
    }

    /// `field1 == field2`
    pub fn fields_equals(field1: impl Into<Operand>, field2: impl Into<Operand>) -> Expression {
        Self::equals(Self::var(field1), Self::var(field2))
    }

    /// `field1 != field2`
    pub fn fields_not_equals(
        field1: impl Into<Operand>,
        field2: impl Into<Operand>,
    ) -> Expression {
        Self::not_equals(Self::var(field1), Self::var(field2))
    }

    /// `!!field`
    pub fn field_not_empty(field: impl Into<Operand>) -> Expression {
        Self::double_negate(Self::var(field))
    }
}

fn collect<T: Into<Operand>>(operands: impl IntoIterator<Item = T>) -> Vec<Operand> {
    operands.into_iter().map(Into::into).collect()
}
