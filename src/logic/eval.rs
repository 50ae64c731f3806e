//! Local evaluation for the node kinds that do not need the external evaluator.
//!
//! Only `length` and `match` compute a result themselves. `LocalEvaluator`
//! resolves their operands (literals, lists and `var` lookups) against a data
//! context first, which is enough for previews and tests.

use log::debug;
use regex::{Regex, RegexBuilder};
use serde_json::Value;
use thiserror::Error;

use crate::logic::node::{Expression, LengthCheck, PatternMatch, Variable};
use crate::logic::{LogicError, LogicResult, Operand};

/// Node kinds that compute a result from already-resolved operand values
pub trait SelfEvaluating {
    fn evaluate(&self, operands: &Value, data: &Value) -> Value;
}

impl SelfEvaluating for LengthCheck {
    fn evaluate(&self, operands: &Value, _data: &Value) -> Value {
        Value::from(length_of(operands))
    }
}

impl SelfEvaluating for PatternMatch {
    fn evaluate(&self, operands: &Value, _data: &Value) -> Value {
        let args = match operands {
            Value::Array(items) => items.as_slice(),
            other => std::slice::from_ref(other),
        };
        Value::Bool(pattern_matches(args))
    }
}

/// Length of a resolved value.
///
/// A single-element list is unwrapped first. Strings count characters, lists
/// and objects count elements, `null` is 0 and other scalars are measured as
/// their string form.
pub fn length_of(value: &Value) -> usize {
    let value = match value {
        Value::Array(items) if items.len() == 1 => &items[0],
        other => other,
    };
    match value {
        Value::String(s) => s.chars().count(),
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        Value::Null => 0,
        other => to_text(other).chars().count(),
    }
}

/// Match resolved `[subject, pattern, flags?]`; absent entries are empty strings.
///
/// An empty pattern never matches. Engine errors (bad syntax, unknown flags)
/// are reported as `false`.
pub fn pattern_matches(operands: &[Value]) -> bool {
    let text_at = |i: usize| operands.get(i).map(to_text).unwrap_or_default();
    let (subject, pattern, flags) = (text_at(0), text_at(1), text_at(2));

    if pattern.is_empty() {
        return false;
    }

    let normalized = normalize_pattern(&pattern, &flags);
    match compile(&normalized) {
        Ok(regex) => regex.is_match(&subject),
        Err(err) => {
            debug!("pattern {} failed to compile: {}", normalized, err);
            false
        }
    }
}

/// Bring a pattern into delimited `/body/flags` form.
///
/// Patterns that start with one of `/ # ~ { [` and end with the matching
/// closing delimiter (plus trailing flag letters) are kept as they are;
/// anything else is wrapped in `/…/` with literal slashes escaped. Extra
/// `flags` are appended after the closing delimiter.
pub fn normalize_pattern(pattern: &str, flags: &str) -> String {
    let mut normalized = if is_delimited(pattern) {
        pattern.to_string()
    } else {
        format!("/{}/", escape_delimiter(pattern, '/'))
    };
    normalized.push_str(flags);
    normalized
}

#[derive(Error, Debug)]
enum PatternError {
    #[error("pattern is not delimited")]
    NotDelimited,

    #[error("unknown modifier '{0}'")]
    UnknownFlag(char),

    #[error(transparent)]
    Regex(#[from] regex::Error),
}

struct Delimited<'a> {
    body: &'a str,
    open: char,
    flags: &'a str,
}

fn closing_delimiter(open: char) -> Option<char> {
    match open {
        '/' | '#' | '~' => Some(open),
        '{' => Some('}'),
        '[' => Some(']'),
        _ => None,
    }
}

fn is_delimited(pattern: &str) -> bool {
    let mut chars = pattern.chars();
    let Some(close) = chars.next().and_then(closing_delimiter) else {
        return false;
    };
    chars
        .as_str()
        .trim_end_matches(|c: char| c.is_ascii_alphabetic())
        .ends_with(close)
}

/// Split at the first unescaped closing delimiter; bracket delimiters nest.
/// Everything after it is the modifier suffix.
fn split_delimited(pattern: &str) -> Option<Delimited<'_>> {
    let open = pattern.chars().next()?;
    let close = closing_delimiter(open)?;
    let rest = &pattern[open.len_utf8()..];

    let mut depth = 0usize;
    let mut escaped = false;
    for (i, c) in rest.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == close {
            if depth == 0 {
                return Some(Delimited {
                    body: &rest[..i],
                    open,
                    flags: &rest[i + c.len_utf8()..],
                });
            }
            depth -= 1;
        } else if c == open {
            depth += 1;
        }
    }
    None
}

/// Escape every unescaped occurrence of `delimiter`.
fn escape_delimiter(body: &str, delimiter: char) -> String {
    let mut out = String::with_capacity(body.len() + 2);
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.push(c);
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            if c == delimiter {
                out.push('\\');
            }
            out.push(c);
        }
    }
    out
}

/// Drop the escaping of a delimiter that is plain text to the regex engine.
fn unescape_delimiter(body: &str, delimiter: char) -> String {
    if !matches!(delimiter, '/' | '#' | '~') {
        return body.to_string();
    }
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next) if next == delimiter => out.push(next),
                Some(next) => {
                    out.push(c);
                    out.push(next);
                }
                None => out.push(c),
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn compile(normalized: &str) -> Result<Regex, PatternError> {
    let delimited = split_delimited(normalized).ok_or(PatternError::NotDelimited)?;
    let mut builder = RegexBuilder::new(&unescape_delimiter(delimited.body, delimited.open));
    for flag in delimited.flags.chars() {
        match flag {
            'i' => builder.case_insensitive(true),
            'm' => builder.multi_line(true),
            's' => builder.dot_matches_new_line(true),
            'x' => builder.ignore_whitespace(true),
            'U' => builder.swap_greed(true),
            // unicode is always on; `D` has no counterpart
            'u' | 'D' => &mut builder,
            other => return Err(PatternError::UnknownFlag(other)),
        };
    }
    Ok(builder.build()?)
}

/// String form of a resolved scalar (`true` → "1", `false`/`null` → "").
fn to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => String::new(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => float_text(f),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// Whole floats print without a fraction (`1.0` → "1"); very large or very
/// small magnitudes use exponent form (`1e20` → "1.0E+20").
fn float_text(f: f64) -> String {
    if !f.is_finite() {
        return f.to_string();
    }
    let magnitude = f.abs();
    if f.fract() == 0.0 && magnitude < 1e15 {
        return format!("{}", f as i64);
    }
    if magnitude >= 1e15 || magnitude < 1e-4 {
        let formatted = format!("{:E}", f);
        if let Some((mantissa, exponent)) = formatted.split_once('E') {
            let mantissa = if mantissa.contains('.') {
                mantissa.to_string()
            } else {
                format!("{}.0", mantissa)
            };
            let sign = if exponent.starts_with('-') { "" } else { "+" };
            return format!("{}E{}{}", mantissa, sign, exponent);
        }
    }
    f.to_string()
}

/// Evaluator for the locally resolvable subset of the language
pub struct LocalEvaluator<'a> {
    /// Data context `var` paths are looked up in
    data: &'a Value,
}

impl<'a> LocalEvaluator<'a> {
    pub fn new(data: &'a Value) -> Self {
        Self { data }
    }

    /// Evaluate a node and return the result
    pub fn evaluate(&self, expr: &Expression) -> LogicResult<Value> {
        match expr {
            Expression::Var(variable) => self.evaluate_var(variable),

            Expression::Length(check) => {
                let resolved = match check.subject() {
                    Some(subject) => self.evaluate_operand(subject)?,
                    None => Value::Null,
                };
                Ok(check.evaluate(&resolved, self.data))
            }

            Expression::Match(pattern) => {
                let mut resolved = Vec::with_capacity(3);
                for operand in [pattern.subject(), pattern.pattern(), pattern.flags()] {
                    resolved.push(match operand {
                        Some(operand) => self.evaluate_operand(operand)?,
                        None => Value::Null,
                    });
                }
                Ok(pattern.evaluate(&Value::Array(resolved), self.data))
            }

            other => Err(LogicError::NotSelfEvaluating {
                operator: other.operator().as_str().to_string(),
            }),
        }
    }

    /// Resolve an operand to a concrete value
    pub fn evaluate_operand(&self, operand: &Operand) -> LogicResult<Value> {
        match operand {
            Operand::Node(node) => self.evaluate(node),
            Operand::List(items) => items
                .iter()
                .map(|item| self.evaluate_operand(item))
                .collect::<LogicResult<Vec<_>>>()
                .map(Value::Array),
            Operand::Literal(value) => Ok(value.clone()),
        }
    }

    fn evaluate_var(&self, variable: &Variable) -> LogicResult<Value> {
        let path = self.evaluate_operand(variable.path())?;
        match lookup(self.data, &path) {
            Some(found) if !found.is_null() => Ok(found.clone()),
            _ => match variable.default_value() {
                Some(default) => self.evaluate_operand(default),
                None => Ok(Value::Null),
            },
        }
    }
}

/// Dot-path lookup; numeric segments index into arrays. An empty path is the
/// whole context.
fn lookup<'v>(data: &'v Value, path: &Value) -> Option<&'v Value> {
    let segments: Vec<String> = match path {
        Value::Null => return Some(data),
        Value::String(s) if s.is_empty() => return Some(data),
        Value::String(s) => s.split('.').map(str::to_owned).collect(),
        Value::Number(n) => vec![n.to_string()],
        Value::Array(parts) => parts.iter().map(to_text).collect(),
        _ => return None,
    };

    segments
        .iter()
        .try_fold(data, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::Logic;
    use serde_json::json;

    #[test]
    fn test_length_of_values() {
        assert_eq!(length_of(&json!("hello")), 5);
        assert_eq!(length_of(&json!([1, 2, 3])), 3);
        assert_eq!(length_of(&json!(null)), 0);
        assert_eq!(length_of(&json!(42)), 2);
        assert_eq!(length_of(&json!(1.5)), 3);
        assert_eq!(length_of(&json!(1.0)), 1);
        assert_eq!(length_of(&json!(-2.0)), 2);
        assert_eq!(length_of(&json!(1e20)), 7);
        assert_eq!(length_of(&json!(true)), 1);
        assert_eq!(length_of(&json!(false)), 0);
        assert_eq!(length_of(&json!("héllo")), 5);
        assert_eq!(length_of(&json!({"a": 1, "b": 2})), 2);
        // single-element lists are unwrapped
        assert_eq!(length_of(&json!(["hello"])), 5);
        assert_eq!(length_of(&json!([[1, 2]])), 2);
        assert_eq!(length_of(&json!([])), 0);
    }

    #[test]
    fn test_length_self_evaluation() {
        let check = LengthCheck::new("ignored");
        let data = json!({});
        assert_eq!(check.evaluate(&json!("hello"), &data), json!(5));
        assert_eq!(check.evaluate(&json!([1, 2, 3]), &data), json!(3));
        assert_eq!(check.evaluate(&json!(null), &data), json!(0));
        assert_eq!(check.evaluate(&json!(42), &data), json!(2));
    }

    #[test]
    fn test_pattern_auto_delimited() {
        assert!(pattern_matches(&[json!("ABC"), json!("^[A-Z]+$")]));
        assert!(!pattern_matches(&[json!("abc"), json!("^[A-Z]+$")]));
        assert_eq!(normalize_pattern("^[A-Z]+$", ""), "/^[A-Z]+$/");
    }

    #[test]
    fn test_pattern_already_delimited() {
        assert_eq!(normalize_pattern("/foo/i", ""), "/foo/i");
        assert!(pattern_matches(&[json!("FOO"), json!("/foo/i")]));
        assert!(pattern_matches(&[json!("a#b"), json!("~a#b~")]));
        assert!(pattern_matches(&[json!("x"), json!("{^x$}")]));
        assert!(pattern_matches(&[json!("abc"), json!("#^abc$#")]));
    }

    #[test]
    fn test_float_text() {
        assert_eq!(float_text(1.0), "1");
        assert_eq!(float_text(0.0), "0");
        assert_eq!(float_text(2.5), "2.5");
        assert_eq!(float_text(1e20), "1.0E+20");
        assert_eq!(float_text(1.5e20), "1.5E+20");
        assert_eq!(float_text(0.00001), "1.0E-5");
    }

    #[test]
    fn test_pattern_ends_at_first_delimiter() {
        // `b/` after the closing slash is a modifier suffix, and `/` is not a modifier
        assert_eq!(normalize_pattern("/a/b/", ""), "/a/b/");
        assert!(!pattern_matches(&[json!("a/b"), json!("/a/b/")]));
        assert!(pattern_matches(&[json!("a/b"), json!("/a\\/b/")]));
        assert!(pattern_matches(&[json!("aa"), json!("{^a{2}$}")]));
        assert!(!pattern_matches(&[json!("abc"), json!("#abc#x#")]));
    }

    #[test]
    fn test_pattern_slashes_escaped() {
        assert_eq!(normalize_pattern("a/b", ""), r"/a\/b/");
        assert_eq!(normalize_pattern(r"a\/b", ""), r"/a\/b/");
        assert!(pattern_matches(&[json!("a/b"), json!("a/b")]));
        assert!(pattern_matches(&[json!("a/b"), json!("/a\\/b/")]));
    }

    #[test]
    fn test_pattern_flags() {
        assert_eq!(normalize_pattern("^abc$", "i"), "/^abc$/i");
        assert!(pattern_matches(&[json!("ABC"), json!("^abc$"), json!("i")]));
        assert!(!pattern_matches(&[json!("ABC"), json!("^abc$")]));
        assert!(pattern_matches(&[json!("a\nb"), json!("^b$"), json!("m")]));
        assert!(pattern_matches(&[json!("é"), json!("^.$"), json!("u")]));
        // unknown modifier is an engine error
        assert!(!pattern_matches(&[json!("abc"), json!("abc"), json!("q")]));
    }

    #[test]
    fn test_pattern_failures_are_false() {
        assert!(!pattern_matches(&[json!("anything"), json!("")]));
        assert!(!pattern_matches(&[json!("anything")]));
        assert!(!pattern_matches(&[]));
        assert!(!pattern_matches(&[json!("abc"), json!("(unclosed")]));
        assert!(!pattern_matches(&[json!("abc"), json!("/[a-/")]));
    }

    #[test]
    fn test_pattern_scalar_subjects() {
        assert!(pattern_matches(&[json!(12345), json!("^\\d{5}$")]));
        assert!(pattern_matches(&[json!(null), json!("^$")]));
    }

    #[test]
    fn test_match_self_evaluation() {
        let node = PatternMatch::deferred();
        let data = json!({});
        assert_eq!(node.evaluate(&json!(["ABC", "^[A-Z]+$"]), &data), json!(true));
        assert_eq!(node.evaluate(&json!(["ABC", ""]), &data), json!(false));
        assert_eq!(node.evaluate(&json!("ABC"), &data), json!(false));
    }

    #[test]
    fn test_local_evaluator_var_lookup() {
        let data = json!({"user": {"name": "Ada", "tags": ["a", "b"]}, "n": null});
        let evaluator = LocalEvaluator::new(&data);

        assert_eq!(evaluator.evaluate(&Logic::var("user.name")).unwrap(), json!("Ada"));
        assert_eq!(evaluator.evaluate(&Logic::var("user.tags.1")).unwrap(), json!("b"));
        assert_eq!(evaluator.evaluate(&Logic::var("user.age")).unwrap(), json!(null));
        assert_eq!(
            evaluator
                .evaluate(&Logic::var_with_default("user.age", 30))
                .unwrap(),
            json!(30)
        );
        assert_eq!(
            evaluator.evaluate(&Logic::var_with_default("n", "x")).unwrap(),
            json!("x")
        );
        assert_eq!(evaluator.evaluate(&Logic::var("")).unwrap(), data);
    }

    #[test]
    fn test_local_evaluator_length_and_match() {
        let data = json!({"name": "hello", "items": [1, 2, 3], "code": "ABC"});
        let evaluator = LocalEvaluator::new(&data);

        assert_eq!(
            evaluator.evaluate(&Logic::length(Logic::var("name"))).unwrap(),
            json!(5)
        );
        assert_eq!(
            evaluator.evaluate(&Logic::length(Logic::var("items"))).unwrap(),
            json!(3)
        );
        assert_eq!(
            evaluator.evaluate(&Logic::length(Logic::var("absent"))).unwrap(),
            json!(0)
        );
        assert_eq!(
            evaluator
                .evaluate(&Logic::matches(Logic::var("code"), "^[A-Z]+$"))
                .unwrap(),
            json!(true)
        );
        assert_eq!(
            evaluator
                .evaluate(&Logic::matches_with_flags(Logic::var("code"), "^abc$", "i"))
                .unwrap(),
            json!(true)
        );
        assert_eq!(
            evaluator
                .evaluate(&Expression::from(PatternMatch::deferred()))
                .unwrap(),
            json!(false)
        );
    }

    #[test]
    fn test_local_evaluator_rejects_other_nodes() {
        let data = json!({});
        let evaluator = LocalEvaluator::new(&data);
        let err = evaluator
            .evaluate(&Logic::and(vec![true, false]))
            .unwrap_err();
        assert_eq!(
            err,
            LogicError::NotSelfEvaluating {
                operator: "and".to_string()
            }
        );

        let nested = Logic::length(Logic::cat(vec!["a", "b"]));
        assert!(evaluator.evaluate(&nested).is_err());
    }
}
