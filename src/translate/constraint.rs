//! Input model: per-field validation constraints as read from a validator.

use std::fs;
use std::io::Read;
use std::path::Path;

use serde_json::{Map, Value};

use crate::translate::{TranslateError, TranslateResult};

/// How a rule names its constraint
#[derive(Debug, Clone, PartialEq)]
pub enum RuleSpec {
    /// Bare constraint name; arguments come from the passed-argument list
    Name(String),
    /// `[name, arg1, arg2, ...]`
    List(Vec<Value>),
    /// Anything else (an executable callback on the validator side)
    Opaque,
}

impl RuleSpec {
    /// Effective constraint name and positional arguments.
    ///
    /// The list form overrides both the table key and the passed arguments.
    /// Returns `None` for rules that can never be translated.
    pub fn resolve(&self, passed_args: &[Value]) -> Option<(String, Vec<Value>)> {
        match self {
            RuleSpec::Name(name) => Some((name.clone(), passed_args.to_vec())),
            RuleSpec::List(items) => match items.split_first() {
                Some((Value::String(name), args)) => Some((name.clone(), args.to_vec())),
                _ => None,
            },
            RuleSpec::Opaque => None,
        }
    }
}

impl From<Value> for RuleSpec {
    fn from(value: Value) -> Self {
        match value {
            Value::String(name) => RuleSpec::Name(name),
            Value::Array(items) => RuleSpec::List(items),
            _ => RuleSpec::Opaque,
        }
    }
}

impl From<&str> for RuleSpec {
    fn from(name: &str) -> Self {
        RuleSpec::Name(name.to_string())
    }
}

/// One declared constraint on one field
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintSpec {
    pub field: String,
    /// Key the rule was declared under
    pub name: String,
    pub rule: RuleSpec,
    pub passed_args: Vec<Value>,
    pub message: Option<String>,
}

impl ConstraintSpec {
    pub fn new(
        field: impl Into<String>,
        name: impl Into<String>,
        rule: impl Into<RuleSpec>,
    ) -> Self {
        Self {
            field: field.into(),
            name: name.into(),
            rule: rule.into(),
            passed_args: Vec::new(),
            message: None,
        }
    }

    /// Constraint whose rule spec is its own name
    pub fn named(field: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(field, name.clone(), RuleSpec::Name(name))
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = Value>) -> Self {
        self.passed_args = args.into_iter().collect();
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Constraints of one field, in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct FieldConstraints {
    pub field: String,
    pub constraints: Vec<ConstraintSpec>,
}

/// All fields of a validator, in the order they were declared
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConstraintTable {
    fields: Vec<FieldConstraints>,
}

impl ConstraintTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a constraint to its field, creating the field entry on first use.
    pub fn push(&mut self, spec: ConstraintSpec) -> &mut Self {
        match self.fields.iter_mut().find(|entry| entry.field == spec.field) {
            Some(entry) => entry.constraints.push(spec),
            None => self.fields.push(FieldConstraints {
                field: spec.field.clone(),
                constraints: vec![spec],
            }),
        }
        self
    }

    pub fn fields(&self) -> &[FieldConstraints] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Read a table of the form `{ field: { ruleName: entry, ... }, ... }`.
    ///
    /// An entry is a rule spec (string or list) or an object with `rule`,
    /// `pass` and `message` keys. A missing `rule` defaults to the rule name.
    pub fn from_json(value: &Value) -> TranslateResult<Self> {
        let fields = value
            .as_object()
            .ok_or_else(|| TranslateError::InvalidTable("expected an object of fields".into()))?;

        let mut table = Self::new();
        for (field, rules) in fields {
            let rules = rules.as_object().ok_or_else(|| {
                TranslateError::InvalidTable(format!(
                    "rules of field '{}' must be an object",
                    field
                ))
            })?;
            for (name, entry) in rules {
                table.push(parse_entry(field, name, entry)?);
            }
        }
        Ok(table)
    }

    pub fn from_json_str(source: &str) -> TranslateResult<Self> {
        let value: Value = serde_json::from_str(source)?;
        Self::from_json(&value)
    }

    pub fn from_reader<R: Read>(reader: R) -> TranslateResult<Self> {
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_json(&value)
    }

    pub fn from_path(path: impl AsRef<Path>) -> TranslateResult<Self> {
        let source = fs::read_to_string(path)?;
        Self::from_json_str(&source)
    }
}

fn parse_entry(field: &str, name: &str, entry: &Value) -> TranslateResult<ConstraintSpec> {
    let spec = match entry {
        Value::Object(options) => parse_options(field, name, options)?,
        other => ConstraintSpec::new(field, name, RuleSpec::from(other.clone())),
    };
    Ok(spec)
}

fn parse_options(
    field: &str,
    name: &str,
    options: &Map<String, Value>,
) -> TranslateResult<ConstraintSpec> {
    let rule = options
        .get("rule")
        .cloned()
        .map(RuleSpec::from)
        .unwrap_or_else(|| RuleSpec::Name(name.to_string()));

    let passed_args = match options.get("pass") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(args)) => args.clone(),
        Some(single) => vec![single.clone()],
    };

    let message = match options.get("message") {
        None | Some(Value::Null) => None,
        Some(Value::String(message)) => Some(message.clone()),
        Some(_) => {
            return Err(TranslateError::InvalidTable(format!(
                "message of rule '{}' on field '{}' must be a string",
                name, field
            )))
        }
    };

    let mut spec = ConstraintSpec::new(field, name, rule).with_args(passed_args);
    spec.message = message;
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rule_spec_resolution() {
        let passed = vec![json!(3)];

        assert_eq!(
            RuleSpec::from("minLength").resolve(&passed),
            Some(("minLength".to_string(), vec![json!(3)]))
        );
        assert_eq!(
            RuleSpec::from(json!(["lengthBetween", 2, 8])).resolve(&passed),
            Some(("lengthBetween".to_string(), vec![json!(2), json!(8)]))
        );
        assert_eq!(RuleSpec::from(json!([])).resolve(&passed), None);
        assert_eq!(RuleSpec::from(json!([42, 1])).resolve(&passed), None);
        assert_eq!(RuleSpec::from(json!({"callback": "x"})), RuleSpec::Opaque);
        assert_eq!(RuleSpec::Opaque.resolve(&passed), None);
    }

    #[test]
    fn test_table_push_groups_by_field() {
        let mut table = ConstraintTable::new();
        table
            .push(ConstraintSpec::named("name", "notBlank"))
            .push(ConstraintSpec::named("age", "numeric"))
            .push(ConstraintSpec::named("name", "maxLength").with_args(vec![json!(10)]));

        assert_eq!(table.len(), 2);
        assert_eq!(table.fields()[0].field, "name");
        assert_eq!(table.fields()[0].constraints.len(), 2);
        assert_eq!(table.fields()[1].field, "age");
    }

    #[test]
    fn test_from_json_entry_forms() {
        let table = ConstraintTable::from_json(&json!({
            "title": {
                "notBlank": "notBlank",
                "length": ["lengthBetween", 3, 20],
                "max": {"rule": "maxLength", "pass": [20], "message": "Too long"},
                "custom": {"rule": {"callable": "isUnique"}},
                "implicit": {"pass": 5}
            }
        }))
        .unwrap();

        let constraints = &table.fields()[0].constraints;
        assert_eq!(constraints.len(), 5);
        assert_eq!(constraints[0].rule, RuleSpec::Name("notBlank".to_string()));
        assert_eq!(
            constraints[1].rule,
            RuleSpec::List(vec![json!("lengthBetween"), json!(3), json!(20)])
        );
        assert_eq!(constraints[2].passed_args, vec![json!(20)]);
        assert_eq!(constraints[2].message.as_deref(), Some("Too long"));
        assert_eq!(constraints[3].rule, RuleSpec::Opaque);
        assert_eq!(constraints[4].rule, RuleSpec::Name("implicit".to_string()));
        assert_eq!(constraints[4].passed_args, vec![json!(5)]);
    }

    #[test]
    fn test_from_json_preserves_field_order() {
        let table = ConstraintTable::from_json_str(
            r#"{"zeta": {"notBlank": "notBlank"}, "alpha": {"notBlank": "notBlank"}}"#,
        )
        .unwrap();
        let names: Vec<&str> = table.fields().iter().map(|f| f.field.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_from_json_rejects_malformed_tables() {
        assert!(matches!(
            ConstraintTable::from_json(&json!([1, 2])),
            Err(TranslateError::InvalidTable(_))
        ));
        assert!(matches!(
            ConstraintTable::from_json(&json!({"name": "notBlank"})),
            Err(TranslateError::InvalidTable(_))
        ));
        assert!(matches!(
            ConstraintTable::from_json(&json!({"name": {"r": {"message": 5}}})),
            Err(TranslateError::InvalidTable(_))
        ));
        assert!(matches!(
            ConstraintTable::from_json_str("{not json"),
            Err(TranslateError::Json(_))
        ));
    }
}
