//! Rule ⇄ import-string interop with external rule configs.
//!
//! Rule configs embed the legacy import syntax under
//! `rules.<glob>.imports`. The YAML loader itself lives outside this
//! crate; it hands the parsed mapping over as [`RulesConfig`] and takes it
//! back for serialization.

use crate::rule::Rule;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Glob used for rules that carry no file pattern of their own.
pub const DEFAULT_GLOB: &str = "**";

/// Import lists keyed by file glob, as found under `rules.<glob>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Mapping of file glob to import list.
    #[serde(default)]
    pub rules: BTreeMap<String, ImportGroup>,
}

/// The import list of one glob scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportGroup {
    /// Import strings in declaration order.
    #[serde(default)]
    pub imports: Vec<String>,
}

impl RulesConfig {
    /// Appends import groups per glob. Duplicates are deliberately kept:
    /// declaration order is precedence order and a repeated import can be
    /// a meaningful re-assertion after an earlier deny.
    pub fn merge_imports(&mut self, groups: BTreeMap<String, Vec<String>>) {
        for (glob, imports) in groups {
            self.rules.entry(glob).or_default().imports.extend(imports);
        }
    }

    /// Folds a whole rule list into this config.
    pub fn merge_rules(&mut self, rules: &[Rule]) {
        self.merge_imports(group_imports(rules));
    }
}

/// Groups rules into `glob -> [import strings]`, defaulting the glob of
/// unscoped rules to [`DEFAULT_GLOB`].
#[must_use]
pub fn group_imports(rules: &[Rule]) -> BTreeMap<String, Vec<String>> {
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for rule in rules {
        let glob = if rule.file_pattern.is_empty() {
            DEFAULT_GLOB.to_string()
        } else {
            rule.file_pattern.clone()
        };
        groups.entry(glob).or_default().push(rule.to_import_string());
    }
    groups
}

/// Parses every import in a config back into rules, restoring each glob
/// scope. Bad imports are skipped with a warning.
#[must_use]
pub fn rules_from_config(config: &RulesConfig) -> Vec<Rule> {
    let mut rules = Vec::new();
    for (glob, group) in &config.rules {
        for import in &group.imports {
            match Rule::from_import_string(import) {
                Ok(mut rule) => {
                    if glob != DEFAULT_GLOB {
                        rule.file_pattern = glob.clone();
                    }
                    rules.push(rule);
                }
                Err(err) => warn!("skipping import `{import}`: {err}"),
            }
        }
    }
    rules
}
