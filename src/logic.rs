//! Portable logic expression trees.
//!
//! This module provides:
//! - The expression node taxonomy, one variant per logic operator
//! - The operand union (nested node, list, literal) and its recursive resolution
//! - A stateless factory with sugared constructors (field comparisons, ranges)
//! - Local evaluation for the node kinds that can compute a result themselves
//!
//! Every node serializes to a single-key object `{ <operator>: <operands> }`,
//! the wire format consumed by an external logic evaluator.

pub mod error;
pub mod eval;
pub mod factory;
pub mod node;
pub mod operand;
pub mod operator;

pub use error::{LogicError, LogicResult};
pub use eval::{length_of, pattern_matches, LocalEvaluator, SelfEvaluating};
pub use factory::Logic;
pub use node::{Conditional, Expression, LengthCheck, PatternMatch, Variable};
pub use operand::Operand;
pub use operator::Operator;
