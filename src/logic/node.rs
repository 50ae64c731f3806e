//! Expression node taxonomy and its wire serialization.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::logic::operand::{present, Operand};
use crate::logic::{LogicError, LogicResult, Operator};

/// Data access by path, with an optional fallback
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    path: Operand,
    default: Option<Operand>,
}

impl Variable {
    pub fn new(path: impl Into<Operand>) -> Self {
        Self {
            path: path.into(),
            default: None,
        }
    }

    /// A `null` default is the same as no default.
    pub fn with_default(path: impl Into<Operand>, default: impl Into<Operand>) -> Self {
        let mut variable = Self::new(path);
        variable.set_default(default);
        variable
    }

    pub fn path(&self) -> &Operand {
        &self.path
    }

    pub fn default_value(&self) -> Option<&Operand> {
        present(&self.default)
    }

    pub fn set_path(&mut self, path: impl Into<Operand>) -> &mut Self {
        self.path = path.into();
        self
    }

    pub fn set_default(&mut self, default: impl Into<Operand>) -> &mut Self {
        let default = default.into();
        self.default = if default.is_null() { None } else { Some(default) };
        self
    }

    pub fn clear_default(&mut self) -> &mut Self {
        self.default = None;
        self
    }

    fn operands(&self) -> Operand {
        match self.default_value() {
            Some(default) => Operand::List(vec![self.path.clone(), default.clone()]),
            None => self.path.clone(),
        }
    }
}

/// If / else-if / else chain stored as a flat list:
/// `[cond1, result1, cond2, result2, ..., else?]`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Conditional {
    branches: Vec<Operand>,
}

impl Conditional {
    /// Build from a flat branch list. A non-empty list needs at least a
    /// condition and a result.
    pub fn new<T: Into<Operand>>(branches: impl IntoIterator<Item = T>) -> LogicResult<Self> {
        let branches: Vec<Operand> = branches.into_iter().map(Into::into).collect();
        if !branches.is_empty() && branches.len() < 2 {
            return Err(LogicError::construction(format!(
                "if needs at least 2 elements, got {}",
                branches.len()
            )));
        }
        Ok(Self { branches })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Append a condition/result pair, plus an else value when given.
    pub fn add_branch(
        &mut self,
        condition: impl Into<Operand>,
        success: impl Into<Operand>,
        otherwise: Option<Operand>,
    ) -> &mut Self {
        debug_assert!(!self.has_else(), "if branch added after the else value");
        self.branches.push(condition.into());
        self.branches.push(success.into());
        if let Some(otherwise) = otherwise {
            self.branches.push(otherwise);
        }
        self
    }

    pub fn add_else(&mut self, value: impl Into<Operand>) -> &mut Self {
        self.branches.push(value.into());
        debug_assert!(self.has_else(), "if chain must have an odd length after an else");
        self
    }

    pub fn branches(&self) -> &[Operand] {
        &self.branches
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// Odd branch count: the chain ends in an else value.
    pub fn has_else(&self) -> bool {
        self.branches.len() % 2 == 1
    }
}

/// Length of a string or list. The subject may be left unset and filled in
/// later; until then the node has no wire form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LengthCheck {
    subject: Option<Operand>,
}

impl LengthCheck {
    pub fn new(subject: impl Into<Operand>) -> Self {
        Self {
            subject: Some(subject.into()),
        }
    }

    pub fn deferred() -> Self {
        Self::default()
    }

    pub fn subject(&self) -> Option<&Operand> {
        present(&self.subject)
    }

    pub fn set_subject(&mut self, subject: impl Into<Operand>) -> &mut Self {
        self.subject = Some(subject.into());
        self
    }

    fn operands(&self) -> Option<Operand> {
        self.subject().cloned()
    }
}

/// Regular expression match of a subject against a pattern with optional
/// flags. Subject and pattern are both required for a wire form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PatternMatch {
    subject: Option<Operand>,
    pattern: Option<Operand>,
    flags: Option<Operand>,
}

impl PatternMatch {
    pub fn new(subject: impl Into<Operand>, pattern: impl Into<Operand>) -> Self {
        Self {
            subject: Some(subject.into()),
            pattern: Some(pattern.into()),
            flags: None,
        }
    }

    pub fn with_flags(
        subject: impl Into<Operand>,
        pattern: impl Into<Operand>,
        flags: impl Into<Operand>,
    ) -> Self {
        let mut node = Self::new(subject, pattern);
        node.set_flags(flags);
        node
    }

    pub fn deferred() -> Self {
        Self::default()
    }

    pub fn subject(&self) -> Option<&Operand> {
        present(&self.subject)
    }

    pub fn pattern(&self) -> Option<&Operand> {
        present(&self.pattern)
    }

    pub fn flags(&self) -> Option<&Operand> {
        present(&self.flags)
    }

    pub fn set_subject(&mut self, subject: impl Into<Operand>) -> &mut Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn set_pattern(&mut self, pattern: impl Into<Operand>) -> &mut Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn set_flags(&mut self, flags: impl Into<Operand>) -> &mut Self {
        self.flags = Some(flags.into());
        self
    }

    fn operands(&self) -> Option<Operand> {
        let mut items = vec![self.subject()?.clone(), self.pattern()?.clone()];
        if let Some(flags) = self.flags() {
            items.push(flags.clone());
        }
        Some(Operand::List(items))
    }
}

/// Expression tree node, one variant per logic operator
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// `var`: path lookup in the data context
    Var(Variable),

    /// `missing`: keys absent from the data context
    Missing(Vec<String>),

    /// `missing_some`: absent keys, unless at least `minimum` are present
    MissingSome { minimum: u64, keys: Vec<String> },

    Equals(Operand, Operand),
    NotEquals(Operand, Operand),
    StrictEquals(Operand, Operand),
    StrictNotEquals(Operand, Operand),
    GreaterThan(Operand, Operand),
    GreaterThanOrEqual(Operand, Operand),

    /// `<`; a third operand turns it into an exclusive "between"
    LessThan(Operand, Operand, Option<Operand>),

    /// `<=`; a third operand turns it into an inclusive "between"
    LessThanOrEqual(Operand, Operand, Option<Operand>),

    And(Vec<Operand>),
    Or(Vec<Operand>),
    Not(Operand),
    DoubleNegate(Operand),
    If(Conditional),

    /// `all`: collection, per-element test
    All(Operand, Operand),
    Some(Operand, Operand),
    None(Operand, Operand),

    /// `in`: needle, haystack (list or substring search)
    In(Operand, Operand),

    Map(Operand, Operand),
    Filter(Operand, Operand),

    /// `reduce`: collection, logic over `current`/`accumulator`, initial value
    Reduce(Operand, Operand, Operand),

    Merge(Vec<Operand>),
    Max(Vec<Operand>),
    Min(Vec<Operand>),
    Add(Vec<Operand>),
    Subtract(Vec<Operand>),
    Multiply(Vec<Operand>),
    Divide(Operand, Operand),
    Modulo(Operand, Operand),
    Cat(Vec<Operand>),
    Length(LengthCheck),
    Match(PatternMatch),

    /// `substr`: string, start, optional length
    Substr(Operand, Operand, Option<Operand>),
}

impl Expression {
    pub fn operator(&self) -> Operator {
        match self {
            Expression::Var(_) => Operator::Var,
            Expression::Missing(_) => Operator::Missing,
            Expression::MissingSome { .. } => Operator::MissingSome,
            Expression::Equals(..) => Operator::Equals,
            Expression::NotEquals(..) => Operator::NotEquals,
            Expression::StrictEquals(..) => Operator::StrictEquals,
            Expression::StrictNotEquals(..) => Operator::StrictNotEquals,
            Expression::GreaterThan(..) => Operator::GreaterThan,
            Expression::GreaterThanOrEqual(..) => Operator::GreaterThanOrEqual,
            Expression::LessThan(..) => Operator::LessThan,
            Expression::LessThanOrEqual(..) => Operator::LessThanOrEqual,
            Expression::And(_) => Operator::And,
            Expression::Or(_) => Operator::Or,
            Expression::Not(_) => Operator::Not,
            Expression::DoubleNegate(_) => Operator::DoubleNegate,
            Expression::If(_) => Operator::If,
            Expression::All(..) => Operator::All,
            Expression::Some(..) => Operator::Some,
            Expression::None(..) => Operator::None,
            Expression::In(..) => Operator::In,
            Expression::Map(..) => Operator::Map,
            Expression::Filter(..) => Operator::Filter,
            Expression::Reduce(..) => Operator::Reduce,
            Expression::Merge(_) => Operator::Merge,
            Expression::Max(_) => Operator::Max,
            Expression::Min(_) => Operator::Min,
            Expression::Add(_) => Operator::Add,
            Expression::Subtract(_) => Operator::Subtract,
            Expression::Multiply(_) => Operator::Multiply,
            Expression::Divide(..) => Operator::Divide,
            Expression::Modulo(..) => Operator::Modulo,
            Expression::Cat(_) => Operator::Cat,
            Expression::Length(_) => Operator::Length,
            Expression::Match(_) => Operator::Match,
            Expression::Substr(..) => Operator::Substr,
        }
    }

    /// Operand view of this node, shaped as it appears on the wire.
    ///
    /// Returns `None` for a `length`/`match` node whose required operands
    /// are not set yet.
    pub fn operands(&self) -> Option<Operand> {
        let operands = match self {
            Expression::Var(variable) => variable.operands(),
            Expression::Missing(keys) => Operand::list(keys.iter().map(String::as_str)),
            Expression::MissingSome { minimum, keys } => Operand::List(vec![
                Operand::from(*minimum),
                Operand::list(keys.iter().map(String::as_str)),
            ]),
            Expression::Equals(a, b)
            | Expression::NotEquals(a, b)
            | Expression::StrictEquals(a, b)
            | Expression::StrictNotEquals(a, b)
            | Expression::GreaterThan(a, b)
            | Expression::GreaterThanOrEqual(a, b)
            | Expression::All(a, b)
            | Expression::Some(a, b)
            | Expression::None(a, b)
            | Expression::In(a, b)
            | Expression::Map(a, b)
            | Expression::Filter(a, b)
            | Expression::Divide(a, b)
            | Expression::Modulo(a, b) => Operand::List(vec![a.clone(), b.clone()]),
            Expression::LessThan(a, b, c)
            | Expression::LessThanOrEqual(a, b, c)
            | Expression::Substr(a, b, c) => {
                let mut items = vec![a.clone(), b.clone()];
                if let Some(c) = present(c) {
                    items.push(c.clone());
                }
                Operand::List(items)
            }
            Expression::Reduce(a, b, c) => Operand::List(vec![a.clone(), b.clone(), c.clone()]),
            Expression::And(items)
            | Expression::Or(items)
            | Expression::Merge(items)
            | Expression::Max(items)
            | Expression::Min(items)
            | Expression::Add(items)
            | Expression::Subtract(items)
            | Expression::Multiply(items)
            | Expression::Cat(items) => Operand::List(items.clone()),
            Expression::Not(operand) | Expression::DoubleNegate(operand) => {
                Operand::List(vec![operand.clone()])
            }
            Expression::If(conditional) => Operand::List(conditional.branches().to_vec()),
            Expression::Length(check) => return check.operands(),
            Expression::Match(pattern) => return pattern.operands(),
        };
        Some(operands)
    }

    /// Serialize to the wire format `{ <operator>: <resolved operands> }`.
    ///
    /// An incomplete `length`/`match` node yields `null`.
    pub fn to_wire(&self) -> Value {
        match self.operands() {
            Some(operands) => {
                let mut object = Map::with_capacity(1);
                object.insert(self.operator().as_str().to_string(), operands.resolve());
                Value::Object(object)
            }
            None => Value::Null,
        }
    }

    /// Whether every operand the wire form needs is set
    pub fn is_complete(&self) -> bool {
        self.operands().is_some()
    }

    /// Ternary "between" form of `<` / `<=`
    pub fn is_between(&self) -> bool {
        match self {
            Expression::LessThan(_, _, upper) | Expression::LessThanOrEqual(_, _, upper) => {
                present(upper).is_some()
            }
            _ => false,
        }
    }

    /// Append one element to a list-valued node.
    pub fn push_operand(&mut self, operand: impl Into<Operand>) -> LogicResult<&mut Self> {
        match self {
            Expression::And(items)
            | Expression::Or(items)
            | Expression::Merge(items)
            | Expression::Max(items)
            | Expression::Min(items)
            | Expression::Add(items)
            | Expression::Subtract(items)
            | Expression::Multiply(items)
            | Expression::Cat(items) => items.push(operand.into()),
            Expression::If(conditional) => {
                conditional.add_else(operand);
            }
            _ => return Err(self.unsupported("push_operand")),
        }
        Ok(self)
    }

    /// Replace the whole operand list of a list-valued node.
    pub fn set_operands<T: Into<Operand>>(
        &mut self,
        operands: impl IntoIterator<Item = T>,
    ) -> LogicResult<&mut Self> {
        let operands: Vec<Operand> = operands.into_iter().map(Into::into).collect();
        match self {
            Expression::And(items)
            | Expression::Or(items)
            | Expression::Merge(items)
            | Expression::Max(items)
            | Expression::Min(items)
            | Expression::Add(items)
            | Expression::Subtract(items)
            | Expression::Multiply(items)
            | Expression::Cat(items) => *items = operands,
            Expression::If(conditional) => *conditional = Conditional::new(operands)?,
            _ => return Err(self.unsupported("set_operands")),
        }
        Ok(self)
    }

    /// Set (or clear, with `null`) the upper bound of `<` / `<=`.
    pub fn set_upper_bound(&mut self, upper: impl Into<Operand>) -> LogicResult<&mut Self> {
        match self {
            Expression::LessThan(_, _, slot) | Expression::LessThanOrEqual(_, _, slot) => {
                let upper = upper.into();
                *slot = if upper.is_null() { None } else { Some(upper) };
            }
            _ => return Err(self.unsupported("set_upper_bound")),
        }
        Ok(self)
    }

    fn unsupported(&self, operation: &str) -> LogicError {
        LogicError::UnsupportedMutation {
            operator: self.operator().as_str().to_string(),
            operation: operation.to_string(),
        }
    }
}

impl From<Variable> for Expression {
    fn from(variable: Variable) -> Self {
        Expression::Var(variable)
    }
}

impl From<Conditional> for Expression {
    fn from(conditional: Conditional) -> Self {
        Expression::If(conditional)
    }
}

impl From<LengthCheck> for Expression {
    fn from(check: LengthCheck) -> Self {
        Expression::Length(check)
    }
}

impl From<PatternMatch> for Expression {
    fn from(pattern: PatternMatch) -> Self {
        Expression::Match(pattern)
    }
}

impl Serialize for Expression {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_wire().serialize(serializer)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_wire())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::Logic;
    use serde_json::json;

    #[test]
    fn test_var_wire_forms() {
        assert_eq!(Logic::var("user.name").to_wire(), json!({"var": "user.name"}));
        assert_eq!(
            Logic::var_with_default("user.name", "Guest").to_wire(),
            json!({"var": ["user.name", "Guest"]})
        );
        assert_eq!(
            Logic::var_with_default("user.name", json!(null)).to_wire(),
            json!({"var": "user.name"})
        );
        assert_eq!(
            Logic::var(vec!["a", "b"]).to_wire(),
            json!({"var": ["a", "b"]})
        );
        assert_eq!(
            Logic::var_with_default("n", 0).to_wire(),
            json!({"var": ["n", 0]})
        );
    }

    #[test]
    fn test_var_default_mutation() {
        let mut variable = Variable::new("score");
        variable.set_default(10);
        assert_eq!(variable.default_value(), Some(&Operand::from(10)));
        assert_eq!(
            Expression::from(variable.clone()).to_wire(),
            json!({"var": ["score", 10]})
        );

        variable.set_default(json!(null));
        assert!(variable.default_value().is_none());

        variable.set_default("x").clear_default().set_path("total");
        assert_eq!(Expression::from(variable).to_wire(), json!({"var": "total"}));
    }

    #[test]
    fn test_ternary_comparison() {
        let between = Logic::between(0, Logic::var("temperature"), 100);
        assert_eq!(
            between.to_wire(),
            json!({"<": [0, {"var": "temperature"}, 100]})
        );
        assert!(between.is_between());

        let plain = Logic::less_than(Logic::var("temperature"), 100);
        assert_eq!(plain.to_wire(), json!({"<": [{"var": "temperature"}, 100]}));
        assert!(!plain.is_between());

        let inclusive = Logic::between_inclusive(1, Logic::var("x"), 5);
        assert_eq!(inclusive.to_wire(), json!({"<=": [1, {"var": "x"}, 5]}));
        assert!(inclusive.is_between());

        let explicit_null = Expression::LessThan(1.into(), 2.into(), Some(Operand::null()));
        assert!(!explicit_null.is_between());
        assert_eq!(explicit_null.to_wire(), json!({"<": [1, 2]}));
    }

    #[test]
    fn test_set_upper_bound() {
        let mut node = Logic::less_than_or_equal(0, Logic::var("x"));
        node.set_upper_bound(10).unwrap();
        assert!(node.is_between());
        assert_eq!(node.to_wire(), json!({"<=": [0, {"var": "x"}, 10]}));

        node.set_upper_bound(json!(null)).unwrap();
        assert!(!node.is_between());

        let err = Logic::equals(1, 1).set_upper_bound(2).unwrap_err();
        assert_eq!(
            err,
            LogicError::UnsupportedMutation {
                operator: "==".to_string(),
                operation: "set_upper_bound".to_string(),
            }
        );
    }

    #[test]
    fn test_in_nested_resolution() {
        assert_eq!(
            Logic::is_in("John", vec!["John", "Paul", "George", "Ringo"]).to_wire(),
            json!({"in": ["John", ["John", "Paul", "George", "Ringo"]]})
        );
        assert_eq!(
            Logic::is_in(Logic::var("domain"), "alloweddomains.com").to_wire(),
            json!({"in": [{"var": "domain"}, "alloweddomains.com"]})
        );
    }

    #[test]
    fn test_missing_keys() {
        assert_eq!(
            Logic::missing(["a", "b"]).to_wire(),
            json!({"missing": ["a", "b"]})
        );
        assert_eq!(
            Logic::missing_some(1, ["a", "b", "c"]).to_wire(),
            json!({"missing_some": [1, ["a", "b", "c"]]})
        );
        assert_eq!(Logic::missing(Vec::<String>::new()).to_wire(), json!({"missing": []}));
    }

    #[test]
    fn test_if_chain_preserves_order() {
        let node = Logic::condition(vec![
            Operand::from(Logic::less_than(Logic::var("temp"), 0)),
            Operand::from("freezing"),
            Operand::from(Logic::greater_than(Logic::var("temp"), 100)),
            Operand::from("boiling"),
            Operand::from("comfortable"),
        ])
        .unwrap();

        assert_eq!(
            node.to_wire(),
            json!({"if": [
                {"<": [{"var": "temp"}, 0]},
                "freezing",
                {">": [{"var": "temp"}, 100]},
                "boiling",
                "comfortable"
            ]})
        );
    }

    #[test]
    fn test_conditional_construction() {
        let err = Conditional::new(vec![true]).unwrap_err();
        assert!(matches!(err, LogicError::Construction(_)));

        let empty = Conditional::new(Vec::<Operand>::new()).unwrap();
        assert!(empty.is_empty());
        assert_eq!(Expression::from(empty).to_wire(), json!({"if": []}));

        assert!(Conditional::new(vec![true, false]).is_ok());
    }

    #[test]
    fn test_conditional_builders() {
        let mut conditional = Conditional::empty();
        conditional
            .add_branch(Logic::var("a"), "first", None)
            .add_branch(Logic::var("b"), "second", None);
        assert!(!conditional.has_else());
        conditional.add_else("fallback");
        assert!(conditional.has_else());
        assert_eq!(conditional.len(), 5);

        let mut with_else = Conditional::empty();
        with_else.add_branch(true, 1, Some(Operand::from(2)));
        assert_eq!(with_else.branches().len(), 3);

        assert_eq!(
            Expression::from(conditional).to_wire(),
            json!({"if": [{"var": "a"}, "first", {"var": "b"}, "second", "fallback"]})
        );
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "odd length")]
    fn test_second_else_rejected() {
        let mut conditional = Conditional::empty();
        conditional.add_branch(true, 1, Some(Operand::from(0)));
        conditional.add_else(2);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "after the else")]
    fn test_branch_after_else_rejected() {
        let mut conditional = Conditional::new(vec![true, false, true]).unwrap();
        conditional.add_branch(false, 1, None);
    }

    #[test]
    fn test_length_and_match_require_operands() {
        assert_eq!(Expression::from(LengthCheck::deferred()).to_wire(), json!(null));
        assert_eq!(Expression::from(PatternMatch::deferred()).to_wire(), json!(null));

        let mut pattern = PatternMatch::deferred();
        pattern.set_subject(Logic::var("code"));
        assert!(!Expression::from(pattern.clone()).is_complete());
        pattern.set_pattern("^[A-Z]+$");
        assert_eq!(
            Expression::from(pattern.clone()).to_wire(),
            json!({"match": [{"var": "code"}, "^[A-Z]+$"]})
        );
        pattern.set_flags("i");
        assert_eq!(
            Expression::from(pattern).to_wire(),
            json!({"match": [{"var": "code"}, "^[A-Z]+$", "i"]})
        );

        let mut length = LengthCheck::deferred();
        length.set_subject(Logic::var("name"));
        assert_eq!(
            Expression::from(length).to_wire(),
            json!({"length": {"var": "name"}})
        );
    }

    #[test]
    fn test_incomplete_node_nested_as_null() {
        let node = Logic::equals(Expression::from(LengthCheck::deferred()), 3);
        assert_eq!(node.to_wire(), json!({"==": [null, 3]}));
    }

    #[test]
    fn test_push_and_set_operands() {
        let mut node = Logic::and(vec![Logic::var("a")]);
        node.push_operand(Logic::var("b"))
            .unwrap()
            .push_operand(true)
            .unwrap();
        assert_eq!(
            node.to_wire(),
            json!({"and": [{"var": "a"}, {"var": "b"}, true]})
        );

        node.set_operands(vec![false]).unwrap();
        assert_eq!(node.to_wire(), json!({"and": [false]}));

        let mut cat = Logic::cat(vec!["a"]);
        cat.push_operand("b").unwrap();
        assert_eq!(cat.to_wire(), json!({"cat": ["a", "b"]}));

        let mut conditional =
            Logic::condition(vec![Operand::from(true), Operand::from("yes")]).unwrap();
        conditional.push_operand("no").unwrap();
        assert_eq!(conditional.to_wire(), json!({"if": [true, "yes", "no"]}));
        assert!(conditional.set_operands(vec!["only"]).is_err());

        let err = Logic::var("a").push_operand(1).unwrap_err();
        assert!(matches!(err, LogicError::UnsupportedMutation { .. }));
    }

    #[test]
    fn test_unary_and_collection_shapes() {
        assert_eq!(Logic::not(true).to_wire(), json!({"!": [true]}));
        assert_eq!(
            Logic::field_not_empty("email").to_wire(),
            json!({"!!": [{"var": "email"}]})
        );
        assert_eq!(
            Logic::all(Logic::var("pies"), Logic::greater_than(Logic::var(""), 0)).to_wire(),
            json!({"all": [{"var": "pies"}, {">": [{"var": ""}, 0]}]})
        );
        assert_eq!(
            Logic::reduce(
                Logic::var("items"),
                Logic::add(vec![Logic::var("current"), Logic::var("accumulator")]),
                0
            )
            .to_wire(),
            json!({"reduce": [
                {"var": "items"},
                {"+": [{"var": "current"}, {"var": "accumulator"}]},
                0
            ]})
        );
        assert_eq!(
            Logic::substr("jsonlogic", 4).to_wire(),
            json!({"substr": ["jsonlogic", 4]})
        );
        assert_eq!(
            Logic::substr_with_length("jsonlogic", 1, 3).to_wire(),
            json!({"substr": ["jsonlogic", 1, 3]})
        );
        assert_eq!(
            Logic::merge(vec![Operand::from(vec![1, 2]), Operand::from(3)]).to_wire(),
            json!({"merge": [[1, 2], 3]})
        );
    }

    #[test]
    fn test_operator_of_every_factory_node() {
        assert_eq!(Logic::strict_equals(1, 1).operator(), Operator::StrictEquals);
        assert_eq!(Logic::divide(4, 2).operator(), Operator::Divide);
        assert_eq!(Logic::modulo(4, 2).operator(), Operator::Modulo);
        assert_eq!(Logic::max(vec![1, 2]).operator(), Operator::Max);
        assert_eq!(Logic::none(json!([]), true).operator(), Operator::None);
        assert_eq!(Logic::length("abc").operator(), Operator::Length);
    }

    #[test]
    fn test_serialize_and_display() {
        let node = Logic::field_equals("status", "active");
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({"==": [{"var": "status"}, "active"]})
        );
        assert_eq!(node.to_string(), r#"{"==":[{"var":"status"},"active"]}"#);
    }
}
