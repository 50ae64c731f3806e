//! Constraint translator and output assembly.

use std::collections::HashMap;

use log::{debug, trace};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;

use crate::translate::strategy::DEFAULT_TABLE;
use crate::translate::{
    ConstraintSpec, ConstraintTable, FieldConstraints, Strategy, TranslateError, TranslateResult,
};

/// One translated constraint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslatedRule {
    /// Wire form of the expression
    pub rule: Value,
    pub message: String,
}

/// Translated constraints of one field, in declaration order
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FieldRules {
    pub rules: Vec<TranslatedRule>,
}

/// Field name to translated rules, in the order fields were visited.
/// Fields without any translated rule are absent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TranslationResult {
    fields: Vec<(String, FieldRules)>,
}

impl TranslationResult {
    pub fn get(&self, field: &str) -> Option<&FieldRules> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, rules)| rules)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldRules)> {
        self.fields.iter().map(|(name, rules)| (name.as_str(), rules))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn push(&mut self, field: &str, rules: FieldRules) {
        self.fields.push((field.to_string(), rules));
    }
}

impl Serialize for TranslationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, rules) in self.iter() {
            map.serialize_entry(name, rules)?;
        }
        map.end()
    }
}

/// Maps constraint names to conversion strategies and applies them
#[derive(Debug, Clone)]
pub struct Translator {
    strategies: HashMap<String, Strategy>,
}

impl Translator {
    /// Translator with the built-in constraint table
    pub fn new() -> Self {
        let mut translator = Self::empty();
        for (name, strategy) in DEFAULT_TABLE {
            translator.register(*name, *strategy);
        }
        translator
    }

    /// Translator with no mapped constraints
    pub fn empty() -> Self {
        Self {
            strategies: HashMap::new(),
        }
    }

    /// Add or override the strategy for one constraint name, returning the
    /// strategy it replaced.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        strategy: impl Into<Strategy>,
    ) -> Option<Strategy> {
        self.strategies.insert(name.into(), strategy.into())
    }

    pub fn strategy(&self, name: &str) -> Option<&Strategy> {
        self.strategies.get(name)
    }

    pub fn is_mapped(&self, name: &str) -> bool {
        self.strategies.contains_key(name)
    }

    /// Translate one constraint.
    ///
    /// Returns `Ok(None)` when the constraint is skipped: an opaque rule, a
    /// list rule without a name, or a name with no mapped strategy.
    pub fn translate_constraint(
        &self,
        spec: &ConstraintSpec,
    ) -> TranslateResult<Option<TranslatedRule>> {
        let Some((name, args)) = spec.rule.resolve(&spec.passed_args) else {
            debug!(
                "skipping rule '{}' on field '{}': not a named constraint",
                spec.name, spec.field
            );
            return Ok(None);
        };

        let Some(strategy) = self.strategies.get(&name) else {
            debug!(
                "skipping rule '{}' on field '{}': no strategy for '{}'",
                spec.name, spec.field, name
            );
            return Ok(None);
        };

        let node = strategy.convert(&spec.field, &args)?;
        trace!("{}.{} -> {}", spec.field, spec.name, node);

        Ok(Some(TranslatedRule {
            rule: node.to_wire(),
            message: spec
                .message
                .clone()
                .unwrap_or_else(|| default_message(&spec.field, &spec.name)),
        }))
    }

    /// Translate every constraint of one field; `None` when none translated.
    pub fn translate_field(
        &self,
        field: &FieldConstraints,
    ) -> TranslateResult<Option<FieldRules>> {
        let mut rules = Vec::new();
        for spec in &field.constraints {
            if let Some(rule) = self.translate_constraint(spec)? {
                rules.push(rule);
            }
        }
        Ok((!rules.is_empty()).then_some(FieldRules { rules }))
    }

    /// Translate a whole table. The first failing constraint aborts the
    /// translation.
    pub fn translate(&self, table: &ConstraintTable) -> TranslateResult<TranslationResult> {
        let mut result = TranslationResult::default();
        for field in table.fields() {
            if let Some(rules) = self.translate_field(field)? {
                result.push(&field.field, rules);
            }
        }
        Ok(result)
    }

    /// Translate a table field by field, leaving out fields that fail and
    /// returning their errors alongside the partial result.
    pub fn translate_lenient(
        &self,
        table: &ConstraintTable,
    ) -> (TranslationResult, Vec<(String, TranslateError)>) {
        let mut result = TranslationResult::default();
        let mut failures = Vec::new();
        for field in table.fields() {
            match self.translate_field(field) {
                Ok(Some(rules)) => result.push(&field.field, rules),
                Ok(None) => {}
                Err(err) => failures.push((field.field.clone(), err)),
            }
        }
        (result, failures)
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}

fn default_message(field: &str, rule: &str) -> String {
    format!("The provided value for \"{}\" is invalid ({})", field, rule)
}
