//! Conversion strategies: one function per constraint kind, turning a field
//! name and positional arguments into an expression node.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::logic::{Conditional, Expression, Logic, Operand, Operator};
use crate::translate::{TranslateError, TranslateResult};

/// Signature of a conversion strategy
pub type StrategyFn = fn(&str, &[Value]) -> TranslateResult<Expression>;

/// Built-in conversion strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinStrategy {
    // Presence
    NotBlank,
    Blank,

    // Comparison against a literal
    Comparison,
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,

    // Comparison against another field
    CompareFields,
    SameAs,
    NotSameAs,
    GreaterThanField,
    GreaterThanOrEqualToField,
    LessThanField,
    LessThanOrEqualToField,

    // Ranges and lengths
    LengthBetween,
    Range,
    Between,
    MinLength,
    MaxLength,

    // Lists and selections
    InList,
    NotInList,
    MinCount,
    MaxCount,
    Multiple,

    // Not expressible as logic
    Numeric,
    NaturalNumber,
    Integer,
    Boolean,
    Email,
    Url,
    Ip,
    Uuid,
}

/// Constraint names mapped by a default translator
pub const DEFAULT_TABLE: &[(&str, BuiltinStrategy)] = &[
    ("notBlank", BuiltinStrategy::NotBlank),
    ("notEmpty", BuiltinStrategy::NotBlank),
    ("blank", BuiltinStrategy::Blank),
    ("comparison", BuiltinStrategy::Comparison),
    ("equals", BuiltinStrategy::Equals),
    ("notEquals", BuiltinStrategy::NotEquals),
    ("greaterThan", BuiltinStrategy::GreaterThan),
    ("greaterThanOrEqual", BuiltinStrategy::GreaterThanOrEqual),
    ("lessThan", BuiltinStrategy::LessThan),
    ("lessThanOrEqual", BuiltinStrategy::LessThanOrEqual),
    ("compareFields", BuiltinStrategy::CompareFields),
    ("sameAs", BuiltinStrategy::SameAs),
    ("compareWith", BuiltinStrategy::SameAs),
    ("notSameAs", BuiltinStrategy::NotSameAs),
    ("greaterThanField", BuiltinStrategy::GreaterThanField),
    ("greaterThanOrEqualToField", BuiltinStrategy::GreaterThanOrEqualToField),
    ("lessThanField", BuiltinStrategy::LessThanField),
    ("lessThanOrEqualToField", BuiltinStrategy::LessThanOrEqualToField),
    ("lengthBetween", BuiltinStrategy::LengthBetween),
    ("range", BuiltinStrategy::Range),
    ("between", BuiltinStrategy::Between),
    ("minLength", BuiltinStrategy::MinLength),
    ("maxLength", BuiltinStrategy::MaxLength),
    ("inList", BuiltinStrategy::InList),
    ("notInList", BuiltinStrategy::NotInList),
    ("hasAtLeast", BuiltinStrategy::MinCount),
    ("hasAtMost", BuiltinStrategy::MaxCount),
    ("multiple", BuiltinStrategy::Multiple),
    ("numeric", BuiltinStrategy::Numeric),
    ("naturalNumber", BuiltinStrategy::NaturalNumber),
    ("integer", BuiltinStrategy::Integer),
    ("isInteger", BuiltinStrategy::Integer),
    ("boolean", BuiltinStrategy::Boolean),
    ("email", BuiltinStrategy::Email),
    ("url", BuiltinStrategy::Url),
    ("ip", BuiltinStrategy::Ip),
    ("uuid", BuiltinStrategy::Uuid),
];

impl BuiltinStrategy {
    pub const ALL: [BuiltinStrategy; 34] = [
        BuiltinStrategy::NotBlank,
        BuiltinStrategy::Blank,
        BuiltinStrategy::Comparison,
        BuiltinStrategy::Equals,
        BuiltinStrategy::NotEquals,
        BuiltinStrategy::GreaterThan,
        BuiltinStrategy::GreaterThanOrEqual,
        BuiltinStrategy::LessThan,
        BuiltinStrategy::LessThanOrEqual,
        BuiltinStrategy::CompareFields,
        BuiltinStrategy::SameAs,
        BuiltinStrategy::NotSameAs,
        BuiltinStrategy::GreaterThanField,
        BuiltinStrategy::GreaterThanOrEqualToField,
        BuiltinStrategy::LessThanField,
        BuiltinStrategy::LessThanOrEqualToField,
        BuiltinStrategy::LengthBetween,
        BuiltinStrategy::Range,
        BuiltinStrategy::Between,
        BuiltinStrategy::MinLength,
        BuiltinStrategy::MaxLength,
        BuiltinStrategy::InList,
        BuiltinStrategy::NotInList,
        BuiltinStrategy::MinCount,
        BuiltinStrategy::MaxCount,
        BuiltinStrategy::Multiple,
        BuiltinStrategy::Numeric,
        BuiltinStrategy::NaturalNumber,
        BuiltinStrategy::Integer,
        BuiltinStrategy::Boolean,
        BuiltinStrategy::Email,
        BuiltinStrategy::Url,
        BuiltinStrategy::Ip,
        BuiltinStrategy::Uuid,
    ];

    /// Strategy name
    pub fn as_str(&self) -> &'static str {
        match self {
            BuiltinStrategy::NotBlank => "notBlank",
            BuiltinStrategy::Blank => "blank",
            BuiltinStrategy::Comparison => "comparison",
            BuiltinStrategy::Equals => "equals",
            BuiltinStrategy::NotEquals => "notEquals",
            BuiltinStrategy::GreaterThan => "greaterThan",
            BuiltinStrategy::GreaterThanOrEqual => "greaterThanOrEqual",
            BuiltinStrategy::LessThan => "lessThan",
            BuiltinStrategy::LessThanOrEqual => "lessThanOrEqual",
            BuiltinStrategy::CompareFields => "compareFields",
            BuiltinStrategy::SameAs => "sameAs",
            BuiltinStrategy::NotSameAs => "notSameAs",
            BuiltinStrategy::GreaterThanField => "greaterThanField",
            BuiltinStrategy::GreaterThanOrEqualToField => "greaterThanOrEqualToField",
            BuiltinStrategy::LessThanField => "lessThanField",
            BuiltinStrategy::LessThanOrEqualToField => "lessThanOrEqualToField",
            BuiltinStrategy::LengthBetween => "lengthBetween",
            BuiltinStrategy::Range => "range",
            BuiltinStrategy::Between => "between",
            BuiltinStrategy::MinLength => "minLength",
            BuiltinStrategy::MaxLength => "maxLength",
            BuiltinStrategy::InList => "inList",
            BuiltinStrategy::NotInList => "notInList",
            BuiltinStrategy::MinCount => "minCount",
            BuiltinStrategy::MaxCount => "maxCount",
            BuiltinStrategy::Multiple => "multiple",
            BuiltinStrategy::Numeric => "numeric",
            BuiltinStrategy::NaturalNumber => "naturalNumber",
            BuiltinStrategy::Integer => "integer",
            BuiltinStrategy::Boolean => "boolean",
            BuiltinStrategy::Email => "email",
            BuiltinStrategy::Url => "url",
            BuiltinStrategy::Ip => "ip",
            BuiltinStrategy::Uuid => "uuid",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.as_str() == name)
    }

    /// Build the node for `field` from positional `args`.
    pub fn convert(&self, field: &str, args: &[Value]) -> TranslateResult<Expression> {
        let name = self.as_str();
        let node = match self {
            BuiltinStrategy::NotBlank => Logic::field_not_empty(field),
            BuiltinStrategy::Blank => Logic::not(Logic::var(field)),

            BuiltinStrategy::Comparison => {
                let token = required(name, args, 0)?;
                let value = args.get(1).cloned().unwrap_or(Value::Null);
                compare(name, token, Logic::var(field), value)?
            }
            BuiltinStrategy::Equals => Logic::field_equals(field, required(name, args, 0)?.clone()),
            BuiltinStrategy::NotEquals => {
                Logic::field_not_equals(field, required(name, args, 0)?.clone())
            }
            BuiltinStrategy::GreaterThan => {
                Logic::greater_than(Logic::var(field), required(name, args, 0)?.clone())
            }
            BuiltinStrategy::GreaterThanOrEqual => {
                Logic::greater_than_or_equal(Logic::var(field), required(name, args, 0)?.clone())
            }
            BuiltinStrategy::LessThan => {
                Logic::less_than(Logic::var(field), required(name, args, 0)?.clone())
            }
            BuiltinStrategy::LessThanOrEqual => {
                Logic::less_than_or_equal(Logic::var(field), required(name, args, 0)?.clone())
            }

            BuiltinStrategy::CompareFields => {
                let other = field_arg(name, args, 0)?;
                let token = required(name, args, 1)?;
                compare(name, token, Logic::var(field), Logic::var(other))?
            }
            BuiltinStrategy::SameAs => Logic::fields_equals(field, field_arg(name, args, 0)?),
            BuiltinStrategy::NotSameAs => {
                Logic::fields_not_equals(field, field_arg(name, args, 0)?)
            }
            BuiltinStrategy::GreaterThanField => {
                Logic::greater_than(Logic::var(field), Logic::var(field_arg(name, args, 0)?))
            }
            BuiltinStrategy::GreaterThanOrEqualToField => Logic::greater_than_or_equal(
                Logic::var(field),
                Logic::var(field_arg(name, args, 0)?),
            ),
            BuiltinStrategy::LessThanField => {
                Logic::less_than(Logic::var(field), Logic::var(field_arg(name, args, 0)?))
            }
            BuiltinStrategy::LessThanOrEqualToField => Logic::less_than_or_equal(
                Logic::var(field),
                Logic::var(field_arg(name, args, 0)?),
            ),

            BuiltinStrategy::LengthBetween => Logic::between_inclusive(
                bound(args, 0, 0),
                Logic::length(Logic::var(field)),
                bound(args, 1, 255),
            ),
            BuiltinStrategy::Range | BuiltinStrategy::Between => Logic::between_inclusive(
                bound(args, 0, 0),
                Logic::var(field),
                bound(args, 1, 100),
            ),
            BuiltinStrategy::MinLength => Logic::greater_than_or_equal(
                Logic::length(Logic::var(field)),
                required(name, args, 0)?.clone(),
            ),
            BuiltinStrategy::MaxLength => Logic::less_than_or_equal(
                Logic::length(Logic::var(field)),
                required(name, args, 0)?.clone(),
            ),

            BuiltinStrategy::InList => {
                Logic::is_in(Logic::var(field), required(name, args, 0)?.clone())
            }
            BuiltinStrategy::NotInList => Logic::not(Logic::is_in(
                Logic::var(field),
                required(name, args, 0)?.clone(),
            )),
            BuiltinStrategy::MinCount => min_count(field, count_arg(name, args, 0)?),
            BuiltinStrategy::MaxCount => max_count(field, count_arg(name, args, 0)?),
            BuiltinStrategy::Multiple => multiple(name, field, required(name, args, 0)?)?,

            BuiltinStrategy::Numeric
            | BuiltinStrategy::NaturalNumber
            | BuiltinStrategy::Integer
            | BuiltinStrategy::Boolean
            | BuiltinStrategy::Email
            | BuiltinStrategy::Url
            | BuiltinStrategy::Ip
            | BuiltinStrategy::Uuid => {
                return Err(TranslateError::UnsupportedConstraint {
                    name: name.to_string(),
                })
            }
        };
        Ok(node)
    }
}

impl FromStr for BuiltinStrategy {
    type Err = TranslateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| TranslateError::InvalidArgument {
            constraint: s.to_string(),
            reason: "no built-in strategy with this name".to_string(),
        })
    }
}

impl fmt::Display for BuiltinStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered conversion: built-in or caller supplied
#[derive(Clone, Copy)]
pub enum Strategy {
    Builtin(BuiltinStrategy),
    Custom(StrategyFn),
}

impl Strategy {
    pub fn custom(convert: StrategyFn) -> Self {
        Strategy::Custom(convert)
    }

    pub fn convert(&self, field: &str, args: &[Value]) -> TranslateResult<Expression> {
        match self {
            Strategy::Builtin(builtin) => builtin.convert(field, args),
            Strategy::Custom(convert) => convert(field, args),
        }
    }
}

impl From<BuiltinStrategy> for Strategy {
    fn from(builtin: BuiltinStrategy) -> Self {
        Strategy::Builtin(builtin)
    }
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Builtin(builtin) => f.debug_tuple("Builtin").field(builtin).finish(),
            Strategy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

fn required<'a>(
    constraint: &str,
    args: &'a [Value],
    position: usize,
) -> TranslateResult<&'a Value> {
    args.get(position)
        .ok_or_else(|| TranslateError::MissingArgument {
            constraint: constraint.to_string(),
            position,
        })
}

fn field_arg(constraint: &str, args: &[Value], position: usize) -> TranslateResult<String> {
    match required(constraint, args, position)? {
        Value::String(other) => Ok(other.clone()),
        other => Err(TranslateError::InvalidArgument {
            constraint: constraint.to_string(),
            reason: format!("expected a field name, got {}", other),
        }),
    }
}

fn count_arg(constraint: &str, args: &[Value], position: usize) -> TranslateResult<i64> {
    let value = required(constraint, args, position)?;
    let count = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    count.ok_or_else(|| TranslateError::InvalidArgument {
        constraint: constraint.to_string(),
        reason: format!("expected an integer count, got {}", value),
    })
}

/// Range bound; an omitted or `null` argument falls back to `default`.
fn bound(args: &[Value], position: usize, default: i64) -> Operand {
    match args.get(position) {
        Some(value) if !value.is_null() => Operand::from(value.clone()),
        _ => Operand::from(default),
    }
}

fn compare(
    constraint: &str,
    token: &Value,
    left: impl Into<Operand>,
    right: impl Into<Operand>,
) -> TranslateResult<Expression> {
    let operator = token
        .as_str()
        .and_then(Operator::from_comparison_token)
        .ok_or_else(|| TranslateError::UnsupportedOperator {
            constraint: constraint.to_string(),
            operator: match token {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            },
        })?;
    Ok(Logic::comparison(operator, left, right)?)
}

/// Number of truthy elements of `field`:
/// `reduce(field, accumulator + (current ? 1 : 0), 0)`
fn truthy_count(field: &str) -> Expression {
    let mut step = Conditional::empty();
    step.add_branch(Logic::var("current"), 1, Some(Operand::from(0)));
    Logic::reduce(
        Logic::var(field),
        Logic::add(vec![
            Operand::from(Logic::var("accumulator")),
            Operand::from(Expression::from(step)),
        ]),
        0,
    )
}

fn min_count(field: &str, count: i64) -> Expression {
    if count == 1 {
        Logic::greater_than_or_equal(Logic::length(Logic::var(field)), count)
    } else {
        Logic::greater_than_or_equal(truthy_count(field), count)
    }
}

fn max_count(field: &str, count: i64) -> Expression {
    // The reduce branch is only reached for negative counts.
    if count >= 0 {
        Logic::less_than_or_equal(Logic::length(Logic::var(field)), count)
    } else {
        Logic::less_than_or_equal(truthy_count(field), count)
    }
}

/// Every selected value is allowed: filtering the selection by the allowed
/// set keeps its length. Object options may add `min`/`max` counts.
fn multiple(constraint: &str, field: &str, options: &Value) -> TranslateResult<Expression> {
    let (allowed, min, max) = match options {
        Value::Object(map) => (
            map.get("in").filter(|v| !v.is_null()),
            map.get("min").filter(|v| !v.is_null()),
            map.get("max").filter(|v| !v.is_null()),
        ),
        other => (Some(other), None, None),
    };

    let mut checks = Vec::new();
    if let Some(allowed) = allowed {
        let kept = Logic::filter(Logic::var(field), Logic::is_in(Logic::var(""), allowed.clone()));
        checks.push(Logic::equals(
            Logic::length(kept),
            Logic::length(Logic::var(field)),
        ));
    }
    if let Some(min) = min {
        checks.push(Logic::greater_than_or_equal(
            Logic::length(Logic::var(field)),
            min.clone(),
        ));
    }
    if let Some(max) = max {
        checks.push(Logic::less_than_or_equal(
            Logic::length(Logic::var(field)),
            max.clone(),
        ));
    }

    match checks.len() {
        0 => Err(TranslateError::MissingArgument {
            constraint: constraint.to_string(),
            position: 0,
        }),
        1 => Ok(checks.remove(0)),
        _ => Ok(Logic::and(checks)),
    }
}
