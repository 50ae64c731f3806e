//! Translation of validator constraints into logic expressions.
//!
//! A `Translator` holds the table from constraint name to conversion
//! strategy. Each translated constraint becomes one wire expression plus a
//! message; unmapped constraints are dropped silently while mapped but
//! inexpressible ones fail.

pub mod constraint;
pub mod error;
pub mod strategy;
pub mod translator;

pub use constraint::{ConstraintSpec, ConstraintTable, FieldConstraints, RuleSpec};
pub use error::{TranslateError, TranslateResult};
pub use strategy::{BuiltinStrategy, Strategy, StrategyFn, DEFAULT_TABLE};
pub use translator::{FieldRules, TranslatedRule, TranslationResult, Translator};
