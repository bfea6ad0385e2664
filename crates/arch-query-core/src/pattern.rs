//! Pattern string grammar.
//!
//! A pattern addresses code elements by structural coordinates. The same
//! meaning can be spelled several ways, and the parser resolves the
//! notation in a fixed order:
//!
//! 1. an optional file scope, `@<glob>:` or `path(<glob>) AND ...`;
//! 2. an optional trailing metric, `.cyclomatic`, `.parameters` (alias
//!    `.params`), `.returns` or `.lines`;
//! 3. the structural body: colon notation `pkg:Type:method:field`, dot
//!    shorthand `pkg.Type` (with `pkg.*` and `*.Type` abbreviations), or a
//!    single bare token classified by the token-shape decision table.
//!
//! `original` always keeps the raw input and is authoritative for display;
//! reconstruction via [`Pattern::render`] only happens for patterns built
//! programmatically.

use crate::element::CodeElement;
use crate::error::PatternError;
use crate::metric::Metric;
use crate::{pathglob, wildcard};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A parsed query matching zero or more code elements by structural and/or
/// file-path criteria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    /// Package (or folder) selector.
    pub package: String,
    /// Type selector.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Method selector.
    pub method: String,
    /// Field selector.
    pub field: String,
    /// File-path glob restricting where matches may live; empty means
    /// anywhere.
    #[serde(default)]
    pub file_path: String,
    /// Metric constrained by this pattern, when one was given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<Metric>,
    /// Whether the raw input contained a `*`.
    #[serde(default)]
    pub is_wildcard: bool,
    /// The raw input, verbatim; authoritative for display when non-empty.
    #[serde(default)]
    pub original: String,
}

impl Default for Pattern {
    fn default() -> Self {
        Self::any()
    }
}

impl Pattern {
    /// The pattern matching every element.
    #[must_use]
    pub fn any() -> Self {
        Self {
            package: "*".to_string(),
            type_name: "*".to_string(),
            method: "*".to_string(),
            field: "*".to_string(),
            file_path: String::new(),
            metric: None,
            is_wildcard: true,
            original: String::new(),
        }
    }

    /// Parses a pattern string.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] for empty input, an unterminated
    /// `path(...)` function, unexpected text after `path(...)`, or a
    /// segment count no notation produces.
    pub fn parse(input: &str) -> Result<Self, PatternError> {
        if input.is_empty() {
            return Err(PatternError::EmptyPattern);
        }
        let mut pattern = Self {
            is_wildcard: input.contains('*'),
            original: input.to_string(),
            ..Self::any()
        };
        let rest = parse_file_scope(input, &mut pattern)?;
        let rest = parse_metric_suffix(&rest, &mut pattern);
        if rest.is_empty() {
            return Err(PatternError::invalid(input, "no structural selector"));
        }
        let tokens = split_tokens(&rest);
        pattern.assign_tokens(&tokens, input)?;
        Ok(pattern)
    }

    /// Tests whether an element satisfies the structural selectors and the
    /// file scope. The metric, if any, is the condition evaluator's
    /// concern.
    #[must_use]
    pub fn matches(&self, element: &dyn CodeElement) -> bool {
        wildcard::matches(element.package(), &self.package)
            && wildcard::matches(element.type_name(), &self.type_name)
            && wildcard::matches(element.method(), &self.method)
            && wildcard::matches(element.field(), &self.field)
            && (self.file_path.is_empty()
                || pathglob::matches(element.file_path(), &self.file_path))
    }

    /// Reconstructs the canonical notation, ignoring `original`.
    ///
    /// Uses the parser's own notational precedence: `@glob:` file prefix,
    /// colon notation while field or method are constrained, dot shorthand
    /// for `pkg.Type`, the bare package otherwise, and a trailing
    /// `.metric`.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        if !self.file_path.is_empty() {
            out.push('@');
            out.push_str(&self.file_path);
            out.push(':');
        }
        if self.field != "*" {
            out.push_str(&format!(
                "{}:{}:{}:{}",
                self.package, self.type_name, self.method, self.field
            ));
        } else if self.method != "*" {
            out.push_str(&format!(
                "{}:{}:{}",
                self.package, self.type_name, self.method
            ));
        } else if self.type_name != "*" {
            out.push_str(&format!("{}.{}", self.package, self.type_name));
        } else {
            out.push_str(&self.package);
        }
        if let Some(metric) = self.metric {
            out.push('.');
            out.push_str(&metric.to_string());
        }
        out
    }

    fn assign_tokens(&mut self, tokens: &[String], input: &str) -> Result<(), PatternError> {
        match tokens {
            [single] => self.assign_single(single),
            [a, b] => {
                if classify(a) == TokenShape::Type && classify(b) == TokenShape::Method {
                    self.type_name = a.clone();
                    self.method = b.clone();
                } else {
                    self.package = a.clone();
                    self.type_name = b.clone();
                }
            }
            [package, type_name, method] => {
                self.package = package.clone();
                self.type_name = type_name.clone();
                self.method = method.clone();
            }
            [package, type_name, method, field] => {
                self.package = package.clone();
                self.type_name = type_name.clone();
                self.method = method.clone();
                self.field = field.clone();
            }
            _ => {
                return Err(PatternError::invalid(
                    input,
                    format!("{} segments, expected 1 to 4", tokens.len()),
                ));
            }
        }
        Ok(())
    }

    fn assign_single(&mut self, token: &str) {
        if token == "*" {
            return; // full wildcard, every selector stays `*`
        }
        match classify(token) {
            TokenShape::Package => self.package = token.to_string(),
            TokenShape::Type => self.type_name = token.to_string(),
            TokenShape::Method => self.method = token.to_string(),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.original.is_empty() {
            f.write_str(&self.render())
        } else {
            f.write_str(&self.original)
        }
    }
}

/// How a bare token reads when nothing else disambiguates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenShape {
    /// A package or folder name.
    Package,
    /// A type name.
    Type,
    /// A method name.
    Method,
}

/// Type-name suffixes (table row 2).
const TYPE_SUFFIXES: &[&str] = &[
    "Service",
    "Controller",
    "Repository",
    "Handler",
    "Manager",
    "Factory",
    "Provider",
    "Client",
    "Server",
    "Impl",
];

/// Method verb prefixes (table row 3). Lowercase only: `GetUser` is a
/// Type, not a method.
const METHOD_VERBS: &[&str] = &[
    "get", "set", "is", "has", "new", "create", "delete", "update", "find", "handle", "parse",
    "read", "write",
];

/// Classifies a bare token. All single- and two-token disambiguation is
/// driven by this one table; the first matching row wins. Wildcard tokens
/// are classified by their literal part (`*Service` reads as a type).
///
/// | # | token shape                               | reading |
/// |---|-------------------------------------------|---------|
/// | 1 | contains `/`                              | Package |
/// | 2 | ends with a [`TYPE_SUFFIXES`] entry       | Type    |
/// | 3 | [`METHOD_VERBS`] prefix + uppercase next  | Method  |
/// | 4 | starts with an uppercase letter           | Type    |
/// | 5 | no uppercase letter at all                | Package |
/// | 6 | anything else (camelCase etc.)            | Method  |
pub(crate) fn classify(token: &str) -> TokenShape {
    if token.contains('/') {
        return TokenShape::Package;
    }
    let literal = token.trim_matches('*');
    if TYPE_SUFFIXES.iter().any(|suffix| literal.ends_with(suffix)) {
        return TokenShape::Type;
    }
    if METHOD_VERBS.iter().any(|verb| {
        literal
            .strip_prefix(verb)
            .and_then(|rest| rest.chars().next())
            .is_some_and(char::is_uppercase)
    }) {
        return TokenShape::Method;
    }
    if literal.chars().next().is_some_and(char::is_uppercase) {
        return TokenShape::Type;
    }
    if !literal.chars().any(char::is_uppercase) {
        return TokenShape::Package;
    }
    TokenShape::Method
}

/// Strips a leading `@<glob>:` or `path(<glob>) AND ` file scope, returning
/// the structural remainder (`*` when the scope stood alone).
fn parse_file_scope(input: &str, pattern: &mut Pattern) -> Result<String, PatternError> {
    if let Some(rest) = input.strip_prefix('@') {
        let (glob, tail) = match rest.split_once(':') {
            Some((glob, tail)) => (glob, tail.to_string()),
            None => (rest, "*".to_string()),
        };
        if glob.is_empty() {
            return Err(PatternError::invalid(input, "empty file glob"));
        }
        pattern.file_path = glob.to_string();
        return Ok(tail);
    }
    if let Some(rest) = input.strip_prefix("path(") {
        let Some(close) = rest.find(')') else {
            return Err(PatternError::UnterminatedGlobFunction {
                input: input.to_string(),
            });
        };
        if close == 0 {
            return Err(PatternError::invalid(input, "empty file glob"));
        }
        pattern.file_path = rest[..close].to_string();
        let tail = &rest[close + 1..];
        if tail.is_empty() {
            return Ok("*".to_string());
        }
        if let Some(tail) = tail.strip_prefix(" AND ") {
            return Ok(tail.to_string());
        }
        return Err(PatternError::invalid(
            input,
            format!("unexpected text after `)`: `{tail}`"),
        ));
    }
    Ok(input.to_string())
}

/// Strips a trailing metric segment. Only a `.`-separated final segment
/// counts; a bare metric name with no preceding dot is an ordinary
/// identifier.
fn parse_metric_suffix(input: &str, pattern: &mut Pattern) -> String {
    if let Some((prefix, last)) = input.rsplit_once('.') {
        if let Some(metric) = Metric::from_name(last) {
            pattern.metric = Some(metric);
            return prefix.to_string();
        }
    }
    input.to_string()
}

/// Splits the structural body into tokens: on `:` when present (pre-
/// splitting a dotted prefix so `pkg.Type:method` reads as three tokens),
/// else on `.`, else the whole body is one token.
fn split_tokens(input: &str) -> Vec<String> {
    if input.contains(':') {
        let mut tokens = Vec::new();
        let mut parts = input.split(':');
        if let Some(head) = parts.next() {
            if head.contains('.') {
                tokens.extend(head.split('.').map(str::to_string));
            } else {
                tokens.push(head.to_string());
            }
        }
        tokens.extend(parts.map(str::to_string));
        tokens
    } else if input.contains('.') {
        input.split('.').map(str::to_string).collect()
    } else {
        vec![input.to_string()]
    }
}
