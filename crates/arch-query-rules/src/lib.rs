//! # arch-query-rules
//!
//! Legacy `.ARCHUNIT` rule support: the line grammar, the directory-walk
//! loader, the precedence resolver and import-string interop with external
//! rule configs.
//!
//! Rule sets are built once by the loader and then only read; declaration
//! order is precedence order and the last applicable rule wins:
//!
//! ```
//! use arch_query_rules::{Rule, RuleSet};
//!
//! let mut set = RuleSet::new("proj");
//! set.rules.push(Rule::parse_line("!internal")?);
//! set.rules.push(Rule::parse_line("+internal/api")?);
//!
//! assert!(set.is_allowed("internal/api", "").allowed);
//! assert!(!set.is_allowed("internal/other", "").allowed);
//! # Ok::<(), arch_query_rules::RuleError>(())
//! ```
//!
//! Only the two matchers are shared with the AQL side
//! ([`arch_query_core::wildcard`] and [`arch_query_core::pathglob`]); the
//! resolver never sees the statement model.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod interop;
mod loader;
mod rule;
mod ruleset;

pub use interop::{group_imports, rules_from_config, ImportGroup, RulesConfig, DEFAULT_GLOB};
pub use loader::{load_rule_sets, parse_rule_file, RULE_FILE_NAME};
pub use rule::{Rule, RuleError, RuleKind, RuleTarget};
pub use ruleset::{Decision, RuleSet};
