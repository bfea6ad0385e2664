//! Metric conditions over matched elements.

use crate::element::CodeElement;
use crate::error::EvalError;
use crate::metric::Metric;
use crate::pattern::Pattern;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operator of a metric condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonOp {
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `>=`
    Gte,
    /// `<=`
    Lte,
    /// `==`
    Eq,
    /// `!=`
    Ne,
}

impl ComparisonOp {
    /// Parses an operator token. `=` is accepted as an alias of `==`.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            ">" => Some(Self::Gt),
            "<" => Some(Self::Lt),
            ">=" => Some(Self::Gte),
            "<=" => Some(Self::Lte),
            "==" | "=" => Some(Self::Eq),
            "!=" => Some(Self::Ne),
            _ => None,
        }
    }

    /// Applies the operator to two values.
    #[must_use]
    pub fn compare(self, left: i64, right: i64) -> bool {
        match self {
            Self::Gt => left > right,
            Self::Lt => left < right,
            Self::Gte => left >= right,
            Self::Lte => left <= right,
            Self::Eq => left == right,
            Self::Ne => left != right,
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Gte => ">=",
            Self::Lte => "<=",
            Self::Eq => "==",
            Self::Ne => "!=",
        };
        f.write_str(symbol)
    }
}

/// A metric threshold applying to the elements a pattern matches.
///
/// The operand is kept verbatim; evaluation owns the numeric coercion so a
/// bad operand surfaces as a typed error, not a parse-time guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Elements this condition applies to.
    pub pattern: Pattern,
    /// Comparison operator.
    pub op: ComparisonOp,
    /// Comparison operand as written.
    pub value: String,
    /// Legacy metric name, consulted when `pattern.metric` is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
}

impl Condition {
    /// Creates a condition over a pattern.
    #[must_use]
    pub fn new(pattern: Pattern, op: ComparisonOp, value: impl Into<String>) -> Self {
        Self {
            pattern,
            op,
            value: value.into(),
            property: None,
        }
    }

    /// Sets the legacy metric-name fallback.
    #[must_use]
    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }

    /// Evaluates the condition against one element.
    ///
    /// `Ok(false)` covers both "the pattern did not match, so the condition
    /// does not apply" and a false comparison; callers must not read either
    /// as a failure.
    ///
    /// # Errors
    ///
    /// [`EvalError::MissingMetric`] when neither the pattern nor the legacy
    /// property names a metric, [`EvalError::UnknownMetric`] when the
    /// property names one outside the closed set, and
    /// [`EvalError::NonNumericOperand`] when the operand is not an integer.
    pub fn evaluate(&self, element: &dyn CodeElement) -> Result<bool, EvalError> {
        if !self.pattern.matches(element) {
            return Ok(false);
        }
        let metric = self.metric()?;
        let expected: i64 =
            self.value
                .trim()
                .parse()
                .map_err(|_| EvalError::NonNumericOperand {
                    value: self.value.clone(),
                })?;
        let actual = i64::try_from(metric.value_of(element)).unwrap_or(i64::MAX);
        Ok(self.op.compare(actual, expected))
    }

    /// Resolves the effective metric.
    fn metric(&self) -> Result<Metric, EvalError> {
        if let Some(metric) = self.pattern.metric {
            return Ok(metric);
        }
        match &self.property {
            Some(name) => Metric::from_name(name).ok_or_else(|| EvalError::UnknownMetric {
                name: name.clone(),
            }),
            None => Err(EvalError::MissingMetric),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.pattern, self.op, self.value)
    }
}
