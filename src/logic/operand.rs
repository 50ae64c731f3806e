//! Operand values: nested nodes, ordered lists, or JSON literals.

use serde_json::Value;

use crate::logic::node::Expression;

/// A value an operator acts on
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Nested expression, resolved to its own wire form
    Node(Box<Expression>),
    /// Ordered list, resolved element by element
    List(Vec<Operand>),
    /// Literal passed through unchanged
    Literal(Value),
}

impl Operand {
    /// The `null` literal
    pub fn null() -> Self {
        Operand::Literal(Value::Null)
    }

    pub fn list<T: Into<Operand>>(items: impl IntoIterator<Item = T>) -> Self {
        Operand::List(items.into_iter().map(Into::into).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Operand::Literal(Value::Null))
    }

    pub fn as_node(&self) -> Option<&Expression> {
        match self {
            Operand::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Resolve into the wire representation.
    ///
    /// Nested nodes are replaced by their `to_wire()` output and lists by lists
    /// of resolved elements, so no node reference ever reaches the output.
    pub fn resolve(&self) -> Value {
        match self {
            Operand::Node(node) => node.to_wire(),
            Operand::List(items) => Value::Array(items.iter().map(Operand::resolve).collect()),
            Operand::Literal(value) => value.clone(),
        }
    }
}

/// Drop an optional operand that only holds `null`.
pub(crate) fn present(operand: &Option<Operand>) -> Option<&Operand> {
    operand.as_ref().filter(|op| !op.is_null())
}

impl From<Expression> for Operand {
    fn from(node: Expression) -> Self {
        Operand::Node(Box::new(node))
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Operand::Literal(value)
    }
}

impl From<&str> for Operand {
    fn from(value: &str) -> Self {
        Operand::Literal(Value::String(value.to_string()))
    }
}

impl From<String> for Operand {
    fn from(value: String) -> Self {
        Operand::Literal(Value::String(value))
    }
}

impl From<bool> for Operand {
    fn from(value: bool) -> Self {
        Operand::Literal(Value::Bool(value))
    }
}

macro_rules! literal_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Operand {
                fn from(value: $ty) -> Self {
                    Operand::Literal(Value::from(value))
                }
            }
        )*
    };
}

literal_from_number!(i32, i64, u32, u64, usize, f64);

impl<T: Into<Operand>> From<Vec<T>> for Operand {
    fn from(items: Vec<T>) -> Self {
        Operand::list(items)
    }
}

impl<T: Into<Operand>> From<Option<T>> for Operand {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_else(Operand::null)
    }
}
