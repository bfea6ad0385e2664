//! Error types for the pattern grammar and condition evaluation.
//!
//! Parse errors carry the offending literal text and are returned, never
//! panicked. Evaluation keeps "did not apply" (`Ok(false)`) strictly apart
//! from the typed errors here.

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while parsing pattern or statement strings.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum PatternError {
    /// The input was empty.
    #[error("empty pattern")]
    #[diagnostic(code(arch_query::pattern::empty))]
    EmptyPattern,

    /// A `path(...)` file-glob function was never closed.
    #[error("unterminated file-glob function in `{input}`")]
    #[diagnostic(code(arch_query::pattern::unterminated_glob))]
    UnterminatedGlobFunction {
        /// The offending input.
        input: String,
    },

    /// The text does not fit any recognized notation.
    #[error("invalid pattern format `{pattern}`: {reason}")]
    #[diagnostic(code(arch_query::pattern::invalid_format))]
    InvalidFormat {
        /// The offending text.
        pattern: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A statement line does not begin with a known keyword.
    #[error("unknown statement keyword `{keyword}`")]
    #[diagnostic(code(arch_query::statement::unknown_keyword))]
    UnknownStatement {
        /// The offending keyword.
        keyword: String,
    },
}

impl PatternError {
    /// Shorthand for [`PatternError::InvalidFormat`].
    pub(crate) fn invalid(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while evaluating a condition against an element.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// The named metric is not in the closed metric set.
    #[error("unknown metric `{name}`")]
    UnknownMetric {
        /// The unrecognized name.
        name: String,
    },

    /// The condition has neither a parsed metric nor a legacy property.
    #[error("condition requires a metric")]
    MissingMetric,

    /// The comparison operand is not an integer.
    #[error("non-numeric comparison operand `{value}`")]
    NonNumericOperand {
        /// The operand as written.
        value: String,
    },
}
