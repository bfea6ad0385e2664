//! # arch-query-core
//!
//! Core engine for architecture constraints: a pattern grammar over
//! package/type/method/field coordinates, two wildcard matchers, metric
//! extraction, and the AQL statement model
//! (`LIMIT`/`FORBID`/`REQUIRE`/`ALLOW`).
//!
//! The crate is pure: no filesystem or network I/O, and every parsed
//! structure is immutable after construction, so concurrent readers need
//! no synchronization. Code elements are supplied by external exporters
//! through the [`CodeElement`] trait and are only borrowed per call.
//!
//! ## Example
//!
//! ```
//! use arch_query_core::{parse_rules, SourceElement};
//!
//! let rules = parse_rules(
//!     "RULE complexity:\n  LIMIT *.cyclomatic > 10\n",
//!     "arch.aql",
//! )?;
//! let element = SourceElement::new("app").with_complexity(12);
//! let violations = rules[0].evaluate(&element)?;
//! assert_eq!(violations.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod condition;
mod element;
mod error;
mod metric;
mod pattern;
mod statement;

/// Multi-segment path glob matching.
pub mod pathglob;
/// Identifier wildcard matching.
pub mod wildcard;

pub use condition::{ComparisonOp, Condition};
pub use element::{element_path, CodeElement, SourceElement};
pub use error::{EvalError, PatternError};
pub use metric::Metric;
pub use pattern::Pattern;
pub use statement::{parse_rules, AqlRule, AqlViolation, Statement, Target};
