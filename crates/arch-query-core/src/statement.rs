//! AQL statements and rules.
//!
//! An AQL source is line-oriented: `#` comments and blank lines are
//! skipped, `RULE <name>:` opens a named rule and each following line is
//! one statement attached to it:
//!
//! ```text
//! # service layer constraints
//! RULE user-service:
//!   LIMIT app.UserService.cyclomatic > 10
//!   FORBID app/* -> vendor/legacy
//!   REQUIRE app/handlers -> app/service
//! ```
//!
//! `LIMIT` carries a metric condition whose truth signals a violation.
//! `FORBID`/`REQUIRE`/`ALLOW` constrain either a single pattern or a
//! directed `from -> to` relationship between two patterns.

use crate::condition::{ComparisonOp, Condition};
use crate::element::{element_path, CodeElement};
use crate::error::{EvalError, PatternError};
use crate::pattern::Pattern;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// What a relational statement constrains: one pattern standing alone, or
/// a directed relationship between two.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Target {
    /// A single pattern.
    Single(Pattern),
    /// A directed `from -> to` relationship.
    Relation {
        /// Source side of the relationship.
        from: Pattern,
        /// Target side of the relationship.
        to: Pattern,
    },
}

impl Target {
    /// Parses a statement payload: `<pattern>` or `<pattern> -> <pattern>`.
    ///
    /// # Errors
    ///
    /// Propagates pattern parse errors from either side.
    pub fn parse(text: &str) -> Result<Self, PatternError> {
        match text.split_once("->") {
            Some((from, to)) => Ok(Self::Relation {
                from: Pattern::parse(from.trim())?,
                to: Pattern::parse(to.trim())?,
            }),
            None => Ok(Self::Single(Pattern::parse(text.trim())?)),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(pattern) => write!(f, "{pattern}"),
            Self::Relation { from, to } => write!(f, "{from} -> {to}"),
        }
    }
}

/// One AQL statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Statement {
    /// A metric threshold; the condition being true signals a violation.
    Limit(Condition),
    /// The target must not occur.
    Forbid(Target),
    /// The target must occur.
    Require(Target),
    /// The target is explicitly permitted.
    Allow(Target),
}

impl Statement {
    /// Parses one statement line.
    ///
    /// # Errors
    ///
    /// [`PatternError::UnknownStatement`] for an unrecognized keyword,
    /// [`PatternError::InvalidFormat`] for a malformed payload, and any
    /// pattern error from the payload's patterns.
    pub fn parse(line: &str) -> Result<Self, PatternError> {
        let trimmed = line.trim();
        let Some((keyword, payload)) = trimmed.split_once(char::is_whitespace) else {
            return Err(PatternError::invalid(trimmed, "expected `<keyword> <payload>`"));
        };
        let payload = payload.trim();
        match keyword.to_ascii_uppercase().as_str() {
            "LIMIT" => Ok(Self::Limit(parse_condition(payload)?)),
            "FORBID" => Ok(Self::Forbid(Target::parse(payload)?)),
            "REQUIRE" => Ok(Self::Require(Target::parse(payload)?)),
            "ALLOW" => Ok(Self::Allow(Target::parse(payload)?)),
            _ => Err(PatternError::UnknownStatement {
                keyword: keyword.to_string(),
            }),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Limit(condition) => write!(f, "LIMIT {condition}"),
            Self::Forbid(target) => write!(f, "FORBID {target}"),
            Self::Require(target) => write!(f, "REQUIRE {target}"),
            Self::Allow(target) => write!(f, "ALLOW {target}"),
        }
    }
}

/// Parses a `LIMIT` payload: `<pattern> <op> <value>`.
fn parse_condition(text: &str) -> Result<Condition, PatternError> {
    let mut parts = text.split_whitespace();
    let (Some(pattern), Some(op), Some(value), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(PatternError::invalid(text, "expected `<pattern> <op> <value>`"));
    };
    let pattern = Pattern::parse(pattern)?;
    let op = ComparisonOp::from_symbol(op)
        .ok_or_else(|| PatternError::invalid(text, format!("unknown operator `{op}`")))?;
    Ok(Condition::new(pattern, op, value))
}

/// A named, ordered list of statements from one AQL source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AqlRule {
    /// Rule name.
    pub name: String,
    /// Statements in declaration order.
    pub statements: Vec<Statement>,
    /// File the rule was parsed from; empty for programmatic rules.
    #[serde(default)]
    pub source_file: PathBuf,
    /// 1-based line of the rule header; 0 for programmatic rules.
    #[serde(default)]
    pub line_number: usize,
}

impl AqlRule {
    /// Creates an empty programmatic rule.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            statements: Vec::new(),
            source_file: PathBuf::new(),
            line_number: 0,
        }
    }

    /// Appends a statement.
    #[must_use]
    pub fn with_statement(mut self, statement: Statement) -> Self {
        self.statements.push(statement);
        self
    }

    /// Evaluates the element-level statements against one element:
    /// `LIMIT` conditions that hold and single-pattern `FORBID`s that
    /// match each yield a violation.
    ///
    /// # Errors
    ///
    /// Propagates the first [`EvalError`] from a `LIMIT` condition.
    pub fn evaluate(&self, element: &dyn CodeElement) -> Result<Vec<AqlViolation>, EvalError> {
        let mut violations = Vec::new();
        for statement in &self.statements {
            match statement {
                Statement::Limit(condition) => {
                    if condition.evaluate(element)? {
                        violations.push(self.violation(statement, element_path(element)));
                    }
                }
                Statement::Forbid(Target::Single(pattern)) => {
                    if pattern.matches(element) {
                        violations.push(self.violation(statement, element_path(element)));
                    }
                }
                _ => {}
            }
        }
        Ok(violations)
    }

    /// Evaluates the relational statements against one directed reference:
    /// a `FORBID from -> to` with both ends matching, or a `REQUIRE
    /// from -> to` whose source matches but whose target does not, each
    /// yield a violation. `ALLOW` never does; it only feeds the caller's
    /// precedence resolution.
    #[must_use]
    pub fn evaluate_reference(
        &self,
        from: &dyn CodeElement,
        to: &dyn CodeElement,
    ) -> Vec<AqlViolation> {
        let subject = || format!("{} -> {}", element_path(from), element_path(to));
        let mut violations = Vec::new();
        for statement in &self.statements {
            match statement {
                Statement::Forbid(Target::Relation { from: fp, to: tp }) => {
                    if fp.matches(from) && tp.matches(to) {
                        violations.push(self.violation(statement, subject()));
                    }
                }
                Statement::Require(Target::Relation { from: fp, to: tp }) => {
                    if fp.matches(from) && !tp.matches(to) {
                        violations.push(self.violation(statement, subject()));
                    }
                }
                _ => {}
            }
        }
        violations
    }

    fn violation(&self, statement: &Statement, subject: String) -> AqlViolation {
        AqlViolation {
            rule: self.name.clone(),
            statement: statement.to_string(),
            subject,
            source_file: self.source_file.clone(),
            line_number: self.line_number,
        }
    }
}

/// A violation record produced by AQL evaluation, consumed by external
/// reporters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AqlViolation {
    /// Name of the violated rule.
    pub rule: String,
    /// The violated statement, rendered canonically.
    pub statement: String,
    /// What violated it: an element path or a `from -> to` reference.
    pub subject: String,
    /// AQL source file of the rule.
    pub source_file: PathBuf,
    /// 1-based line of the rule header.
    pub line_number: usize,
}

impl fmt::Display for AqlViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} violates `{}` ({})",
            self.subject, self.statement, self.rule
        )?;
        if !self.source_file.as_os_str().is_empty() {
            write!(
                f,
                " at {}:{}",
                self.source_file.display(),
                self.line_number
            )?;
        }
        Ok(())
    }
}

/// Parses an AQL source into named rules.
///
/// # Errors
///
/// Returns the first statement or pattern error; a statement before any
/// `RULE` header is [`PatternError::InvalidFormat`].
pub fn parse_rules(
    content: &str,
    source_file: impl Into<PathBuf>,
) -> Result<Vec<AqlRule>, PatternError> {
    let source_file = source_file.into();
    let mut rules: Vec<AqlRule> = Vec::new();
    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(name) = rule_header(line) {
            rules.push(AqlRule {
                name: name.to_string(),
                statements: Vec::new(),
                source_file: source_file.clone(),
                line_number: idx + 1,
            });
            continue;
        }
        let statement = Statement::parse(line)?;
        let Some(rule) = rules.last_mut() else {
            return Err(PatternError::invalid(line, "statement outside a RULE block"));
        };
        rule.statements.push(statement);
    }
    Ok(rules)
}

/// Recognizes a `RULE <name>:` header.
fn rule_header(line: &str) -> Option<&str> {
    let rest = line.strip_suffix(':')?;
    let (keyword, name) = rest.split_once(char::is_whitespace)?;
    if !keyword.eq_ignore_ascii_case("rule") {
        return None;
    }
    let name = name.trim();
    (!name.is_empty()).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::SourceElement;

    // -- statement parsing --

    #[test]
    fn parses_limit() {
        let statement = Statement::parse("LIMIT *.cyclomatic > 10").unwrap();
        let Statement::Limit(condition) = &statement else {
            panic!("expected LIMIT, got {statement}");
        };
        assert_eq!(condition.op, ComparisonOp::Gt);
        assert_eq!(condition.value, "10");
        assert_eq!(statement.to_string(), "LIMIT *.cyclomatic > 10");
    }

    #[test]
    fn parses_forbid_relation() {
        let statement = Statement::parse("FORBID app/* -> vendor/legacy").unwrap();
        let Statement::Forbid(Target::Relation { from, to }) = &statement else {
            panic!("expected FORBID relation");
        };
        assert_eq!(from.package, "app/*");
        assert_eq!(to.package, "vendor/legacy");
    }

    #[test]
    fn parses_single_target_and_keyword_case() {
        let statement = Statement::parse("forbid vendor/legacy").unwrap();
        assert!(matches!(statement, Statement::Forbid(Target::Single(_))));
        let statement = Statement::parse("Allow app/*").unwrap();
        assert!(matches!(statement, Statement::Allow(Target::Single(_))));
    }

    #[test]
    fn unknown_keyword_is_an_error() {
        let err = Statement::parse("PERMIT app/*").unwrap_err();
        assert!(matches!(err, PatternError::UnknownStatement { .. }));
    }

    #[test]
    fn malformed_limit_payload_is_an_error() {
        assert!(Statement::parse("LIMIT *.cyclomatic >").is_err());
        assert!(Statement::parse("LIMIT *.cyclomatic ~ 10").is_err());
        assert!(Statement::parse("LIMIT *.cyclomatic > 10 extra").is_err());
    }

    #[test]
    fn statement_round_trips_through_display() {
        for line in [
            "LIMIT *.cyclomatic > 10",
            "FORBID app/* -> vendor/legacy",
            "REQUIRE app/handlers -> app/service",
            "ALLOW internal/api",
        ] {
            let statement = Statement::parse(line).unwrap();
            assert_eq!(Statement::parse(&statement.to_string()).unwrap(), statement);
        }
    }

    // -- rule files --

    const SOURCE: &str = "\
# service constraints
RULE user-service:
  LIMIT app.UserService.cyclomatic > 10
  FORBID app/* -> vendor/legacy

RULE handlers:
  REQUIRE app/handlers -> app/service
";

    #[test]
    fn parses_named_rules_with_line_numbers() {
        let rules = parse_rules(SOURCE, "arch.aql").unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].name, "user-service");
        assert_eq!(rules[0].line_number, 2);
        assert_eq!(rules[0].statements.len(), 2);
        assert_eq!(rules[1].name, "handlers");
        assert_eq!(rules[1].line_number, 6);
        assert_eq!(rules[1].source_file, PathBuf::from("arch.aql"));
    }

    #[test]
    fn statement_before_header_is_an_error() {
        let err = parse_rules("LIMIT *.lines > 100\n", "arch.aql").unwrap_err();
        assert!(matches!(err, PatternError::InvalidFormat { .. }));
    }

    // -- evaluation --

    #[test]
    fn limit_violation_carries_rule_context() {
        let rules = parse_rules(SOURCE, "arch.aql").unwrap();
        let element = SourceElement::new("app")
            .with_type("UserService")
            .with_method("resolve")
            .with_complexity(12);
        let violations = rules[0].evaluate(&element).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule, "user-service");
        assert_eq!(
            violations[0].statement,
            "LIMIT app.UserService.cyclomatic > 10"
        );
        assert_eq!(violations[0].line_number, 2);
    }

    #[test]
    fn limit_respected_yields_nothing() {
        let rules = parse_rules(SOURCE, "arch.aql").unwrap();
        let element = SourceElement::new("app")
            .with_type("UserService")
            .with_complexity(5);
        assert!(rules[0].evaluate(&element).unwrap().is_empty());
    }

    #[test]
    fn forbidden_reference_is_reported() {
        let rules = parse_rules(SOURCE, "arch.aql").unwrap();
        let from = SourceElement::new("app/service");
        let to = SourceElement::new("vendor/legacy");
        let violations = rules[0].evaluate_reference(&from, &to);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].subject, "app/service -> vendor/legacy");
    }

    #[test]
    fn required_reference_flags_the_wrong_target() {
        let rule = AqlRule::new("handlers").with_statement(
            Statement::parse("REQUIRE app/handlers -> app/service").unwrap(),
        );
        let from = SourceElement::new("app/handlers");
        let good = SourceElement::new("app/service");
        let bad = SourceElement::new("app/db");
        assert!(rule.evaluate_reference(&from, &good).is_empty());
        assert_eq!(rule.evaluate_reference(&from, &bad).len(), 1);
    }

    #[test]
    fn allow_never_yields_violations() {
        let rule =
            AqlRule::new("open").with_statement(Statement::parse("ALLOW vendor/*").unwrap());
        let from = SourceElement::new("app");
        let to = SourceElement::new("vendor/legacy");
        assert!(rule.evaluate_reference(&from, &to).is_empty());
        assert!(rule.evaluate(&to).unwrap().is_empty());
    }

    #[test]
    fn single_forbid_matches_standing_alone() {
        let rule = AqlRule::new("no-legacy")
            .with_statement(Statement::parse("FORBID vendor/legacy").unwrap());
        let element = SourceElement::new("vendor/legacy");
        assert_eq!(rule.evaluate(&element).unwrap().len(), 1);
    }
}
