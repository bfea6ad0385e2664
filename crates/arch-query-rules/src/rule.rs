//! Legacy `.ARCHUNIT` rule model and line grammar.
//!
//! One rule per line:
//!
//! ```text
//! # comment
//! fmt:Println            # allow fmt.Println
//! !os:Exit               # deny os.Exit
//! [cmd/**]+os:Exit       # ...but override the deny under cmd/
//! internal               # allow the internal folder
//! !vendor/legacy         # deny a folder pattern
//! ```
//!
//! A leading `[glob]` scopes the rule to referencing files matching the
//! glob; `+` marks an override, `!` a deny. A `pkg:method` body selects an
//! import, anything else is a package/folder pattern.

use arch_query_core::{pathglob, wildcard};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Effect of a rule on matching references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// Permits the reference.
    Allow,
    /// Forbids the reference.
    Deny,
    /// Permits the reference, overriding an earlier deny.
    Override,
}

/// What a rule selects: one import or a folder pattern. The two are
/// mutually exclusive by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleTarget {
    /// A `pkg:method` import selector.
    Import {
        /// Package selector.
        package: String,
        /// Method selector.
        method: String,
    },
    /// A package/folder pattern with no method constraint.
    Pattern(String),
}

/// One parsed `.ARCHUNIT` rule.
///
/// Immutable once published; the diagnostics fields (`source_file`,
/// `line_number`, `scope`, `original_line`) exist so a denial can be traced
/// back to the exact line that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Allow, deny or override.
    pub kind: RuleKind,
    /// Import or folder-pattern selector.
    pub target: RuleTarget,
    /// File glob restricting which referencing files the rule governs;
    /// empty means every file.
    #[serde(default)]
    pub file_pattern: String,
    /// Rule file this came from, relative to the scan root when derivable.
    #[serde(default)]
    pub source_file: PathBuf,
    /// 1-based line number within `source_file`.
    #[serde(default)]
    pub line_number: usize,
    /// Directory whose subtree the owning rule set governs.
    #[serde(default)]
    pub scope: PathBuf,
    /// The raw line, verbatim.
    #[serde(default)]
    pub original_line: String,
}

/// Errors in a single `.ARCHUNIT` line. The loader logs these and moves
/// on; a bad line never blocks the rest of the file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// `[` with no closing `]`.
    #[error("unterminated file pattern in `{line}`")]
    UnterminatedFilePattern {
        /// The offending line.
        line: String,
    },

    /// `[]` with nothing inside.
    #[error("empty file pattern in `{line}`")]
    EmptyFilePattern {
        /// The offending line.
        line: String,
    },

    /// Nothing left once the affixes are stripped.
    #[error("empty rule in `{line}`")]
    EmptyRule {
        /// The offending line.
        line: String,
    },
}

impl Rule {
    /// Parses one non-comment line of a `.ARCHUNIT` file.
    ///
    /// The caller attaches source diagnostics afterwards via
    /// [`Rule::with_source`] and [`Rule::with_scope`].
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] for an unterminated or empty `[glob]` prefix
    /// or a line with no rule body.
    pub fn parse_line(line: &str) -> Result<Self, RuleError> {
        let original_line = line.to_string();
        let mut rest = line.trim();

        let mut file_pattern = String::new();
        if let Some(after) = rest.strip_prefix('[') {
            let Some(close) = after.find(']') else {
                return Err(RuleError::UnterminatedFilePattern {
                    line: original_line,
                });
            };
            if close == 0 {
                return Err(RuleError::EmptyFilePattern {
                    line: original_line,
                });
            }
            file_pattern = after[..close].to_string();
            rest = after[close + 1..].trim();
            if rest.is_empty() {
                return Err(RuleError::EmptyRule {
                    line: original_line,
                });
            }
        }

        let mut kind = RuleKind::Allow;
        if let Some(after) = rest.strip_prefix('+') {
            kind = RuleKind::Override;
            rest = after;
        } else if let Some(after) = rest.strip_prefix('!') {
            kind = RuleKind::Deny;
            rest = after;
        }
        if rest.is_empty() {
            return Err(RuleError::EmptyRule {
                line: original_line,
            });
        }

        let target = match rest.split_once(':') {
            Some((package, method_spec)) => {
                // `pkg:!method` is an alternative deny spelling; it only
                // promotes a plain allow, never demotes an override.
                let method = match method_spec.strip_prefix('!') {
                    Some(method) => {
                        if kind == RuleKind::Allow {
                            kind = RuleKind::Deny;
                        }
                        method
                    }
                    None => method_spec,
                };
                RuleTarget::Import {
                    package: package.to_string(),
                    method: method.to_string(),
                }
            }
            None => RuleTarget::Pattern(rest.to_string()),
        };

        Ok(Self {
            kind,
            target,
            file_pattern,
            source_file: PathBuf::new(),
            line_number: 0,
            scope: PathBuf::new(),
            original_line,
        })
    }

    /// Attaches the originating file and line.
    #[must_use]
    pub fn with_source(mut self, source_file: impl Into<PathBuf>, line_number: usize) -> Self {
        self.source_file = source_file.into();
        self.line_number = line_number;
        self
    }

    /// Attaches the owning directory.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<PathBuf>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Tests whether this rule speaks about a `(package, method)` query.
    ///
    /// Import selectors must accept both coordinates; folder patterns
    /// accept the package alone (any method) — exactly, by wildcard, or as
    /// a `/`-bounded folder prefix.
    #[must_use]
    pub fn applies_to(&self, package: &str, method: &str) -> bool {
        match &self.target {
            RuleTarget::Import {
                package: pkg,
                method: m,
            } => wildcard::matches(package, pkg) && wildcard::matches(method, m),
            RuleTarget::Pattern(pattern) => folder_matches(package, pattern),
        }
    }

    /// Tests whether this rule governs references made from `file_path`.
    /// An empty `file_pattern` governs every file.
    #[must_use]
    pub fn applies_to_file(&self, file_path: &str) -> bool {
        self.file_pattern.is_empty() || pathglob::matches(file_path, &self.file_pattern)
    }

    /// Renders this rule as a YAML-config import string: `!`/`+` kind
    /// prefix, then `pkg:method` (an empty package defaults to `*`) or the
    /// bare folder pattern. The `[glob]` scope is not part of an import
    /// string; the surrounding mapping's glob key carries it.
    #[must_use]
    pub fn to_import_string(&self) -> String {
        let prefix = match self.kind {
            RuleKind::Allow => "",
            RuleKind::Deny => "!",
            RuleKind::Override => "+",
        };
        match &self.target {
            RuleTarget::Import { package, method } => {
                let package = if package.is_empty() { "*" } else { package };
                format!("{prefix}{package}:{method}")
            }
            RuleTarget::Pattern(pattern) => format!("{prefix}{pattern}"),
        }
    }

    /// Parses an import string back into a rule.
    ///
    /// # Errors
    ///
    /// Same as [`Rule::parse_line`]; import strings share the line grammar
    /// minus the `[glob]` prefix.
    pub fn from_import_string(import: &str) -> Result<Self, RuleError> {
        Self::parse_line(import)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.original_line.is_empty() {
            f.write_str(&self.to_import_string())
        } else {
            f.write_str(&self.original_line)
        }
    }
}

/// A folder pattern matches a package when the wildcard matcher accepts it
/// or the package sits under the pattern with a `/` boundary.
fn folder_matches(package: &str, pattern: &str) -> bool {
    if wildcard::matches(package, pattern) {
        return true;
    }
    let trimmed = pattern.trim_end_matches('/');
    package.starts_with(trimmed)
        && package
            .as_bytes()
            .get(trimmed.len())
            .is_some_and(|&b| b == b'/')
}
