//! Ordered rule sets and the precedence resolver.

use crate::rule::{Rule, RuleKind};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of resolving a query against a rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision<'a> {
    /// Whether the reference is allowed.
    pub allowed: bool,
    /// The deny rule responsible, when the reference is denied.
    pub cause: Option<&'a Rule>,
}

impl Decision<'_> {
    const ALLOWED: Self = Self {
        allowed: true,
        cause: None,
    };
}

/// An ordered collection of rules scoped to one directory.
///
/// Declaration order is precedence order: resolution folds over the rules
/// top to bottom and the last applicable rule wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Directory owning this rule set.
    pub path: PathBuf,
    /// Rules in declaration order.
    pub rules: Vec<Rule>,
}

impl RuleSet {
    /// Creates an empty rule set owned by `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            rules: Vec::new(),
        }
    }

    /// Resolves a package/method reference with no file context.
    ///
    /// File-scoped rules never apply here; use
    /// [`RuleSet::is_allowed_for_file`] when the referencing file is known.
    #[must_use]
    pub fn is_allowed(&self, package: &str, method: &str) -> Decision<'_> {
        self.is_allowed_for_file(package, method, "")
    }

    /// Resolves a package/method reference made from `file_path`.
    ///
    /// A pure left-fold over the ordered rules: each applicable `Deny`
    /// flips the decision to denied and records itself as the cause, each
    /// applicable `Allow` or `Override` flips it back and clears the
    /// cause. Zero applicable rules means allowed.
    #[must_use]
    pub fn is_allowed_for_file(
        &self,
        package: &str,
        method: &str,
        file_path: &str,
    ) -> Decision<'_> {
        self.rules
            .iter()
            .filter(|rule| rule.applies_to(package, method) && rule.applies_to_file(file_path))
            .fold(Decision::ALLOWED, |_, rule| match rule.kind {
                RuleKind::Deny => Decision {
                    allowed: false,
                    cause: Some(rule),
                },
                RuleKind::Allow | RuleKind::Override => Decision::ALLOWED,
            })
    }

    /// Appends another set's rules after this set's, preserving both
    /// declaration orders.
    pub fn merge(&mut self, other: RuleSet) {
        self.rules.extend(other.rules);
    }
}
