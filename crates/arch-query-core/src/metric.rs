//! Size and complexity metrics.

use crate::element::CodeElement;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A size or complexity metric a pattern can constrain.
///
/// The set is closed; [`Metric::from_name`] is the only way a name enters
/// the system, so an unknown metric is caught at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Cyclomatic complexity of a method body.
    Cyclomatic,
    /// Number of declared parameters.
    Parameters,
    /// Number of declared return values.
    Returns,
    /// Line count of the element.
    Lines,
}

impl Metric {
    /// Parses a metric name. `params` is accepted as an alias of
    /// `parameters`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "cyclomatic" => Some(Self::Cyclomatic),
            "parameters" | "params" => Some(Self::Parameters),
            "returns" => Some(Self::Returns),
            "lines" => Some(Self::Lines),
            _ => None,
        }
    }

    /// Extracts this metric's value from an element.
    ///
    /// Parameter and return counts win over the corresponding list lengths
    /// when both are present and the count is nonzero.
    #[must_use]
    pub fn value_of(self, element: &dyn CodeElement) -> usize {
        match self {
            Self::Cyclomatic => element.cyclomatic_complexity(),
            Self::Parameters => {
                nonzero_or(element.parameter_count(), element.parameters().len())
            }
            Self::Returns => nonzero_or(element.return_count(), element.returns().len()),
            Self::Lines => element.line_count(),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cyclomatic => write!(f, "cyclomatic"),
            Self::Parameters => write!(f, "parameters"),
            Self::Returns => write!(f, "returns"),
            Self::Lines => write!(f, "lines"),
        }
    }
}

fn nonzero_or(count: usize, fallback: usize) -> usize {
    if count > 0 {
        count
    } else {
        fallback
    }
}
