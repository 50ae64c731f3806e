//! Operator names of the logic language.

use std::fmt;

/// Logic operators, one per node kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    // Data access
    Var,
    Missing,
    MissingSome,

    // Comparison
    Equals,
    NotEquals,
    StrictEquals,
    StrictNotEquals,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,

    // Logical
    And,
    Or,
    Not,
    DoubleNegate,
    If,

    // Collections
    All,
    Some,
    None,
    In,
    Map,
    Filter,
    Reduce,
    Merge,

    // Arithmetic
    Max,
    Min,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,

    // String
    Cat,
    Length,
    Match,
    Substr,
}

impl Operator {
    /// Wire name of this operator
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Var => "var",
            Operator::Missing => "missing",
            Operator::MissingSome => "missing_some",
            Operator::Equals => "==",
            Operator::NotEquals => "!=",
            Operator::StrictEquals => "===",
            Operator::StrictNotEquals => "!==",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqual => ">=",
            Operator::LessThan => "<",
            Operator::LessThanOrEqual => "<=",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Not => "!",
            Operator::DoubleNegate => "!!",
            Operator::If => "if",
            Operator::All => "all",
            Operator::Some => "some",
            Operator::None => "none",
            Operator::In => "in",
            Operator::Map => "map",
            Operator::Filter => "filter",
            Operator::Reduce => "reduce",
            Operator::Merge => "merge",
            Operator::Max => "max",
            Operator::Min => "min",
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Modulo => "%",
            Operator::Cat => "cat",
            Operator::Length => "length",
            Operator::Match => "match",
            Operator::Substr => "substr",
        }
    }

    /// Parse one of the comparison tokens accepted by constraint strategies
    /// (`== != === !== > >= < <=`)
    pub fn from_comparison_token(token: &str) -> Option<Self> {
        match token {
            "==" => Some(Operator::Equals),
            "!=" => Some(Operator::NotEquals),
            "===" => Some(Operator::StrictEquals),
            "!==" => Some(Operator::StrictNotEquals),
            ">" => Some(Operator::GreaterThan),
            ">=" => Some(Operator::GreaterThanOrEqual),
            "<" => Some(Operator::LessThan),
            "<=" => Some(Operator::LessThanOrEqual),
            _ => None,
        }
    }

    /// Whether this operator compares exactly two operands
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Operator::Equals
                | Operator::NotEquals
                | Operator::StrictEquals
                | Operator::StrictNotEquals
                | Operator::GreaterThan
                | Operator::GreaterThanOrEqual
                | Operator::LessThan
                | Operator::LessThanOrEqual
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
