//! Discovery and parsing of `.ARCHUNIT` files.
//!
//! A project may carry one `.ARCHUNIT` per directory; each file becomes
//! its own [`RuleSet`] scoped to that directory. Every failure short of a
//! broken walk is recoverable: bad lines and unreadable files are logged
//! and skipped so a single malformed rule never hides the rest of a scan.

use crate::rule::Rule;
use crate::ruleset::RuleSet;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// File name the loader looks for, literally.
pub const RULE_FILE_NAME: &str = ".ARCHUNIT";

/// Parses the contents of one `.ARCHUNIT` file into a rule set.
///
/// `path` is the rule file itself; the returned set is owned by its
/// containing directory and its rules carry `root`-relative source paths
/// when derivable.
#[must_use]
pub fn parse_rule_file(content: &str, path: &Path, root: &Path) -> RuleSet {
    let scope = path.parent().unwrap_or_else(|| Path::new("")).to_path_buf();
    let source_file = path.strip_prefix(root).unwrap_or(path).to_path_buf();
    let mut set = RuleSet::new(scope.clone());
    for (idx, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match Rule::parse_line(line) {
            Ok(rule) => set.rules.push(
                rule.with_source(source_file.clone(), idx + 1)
                    .with_scope(scope.clone()),
            ),
            Err(err) => warn!(
                "{}:{}: skipping rule: {}",
                source_file.display(),
                idx + 1,
                err
            ),
        }
    }
    set
}

/// Walks `root` and parses every `.ARCHUNIT` file into its own rule set.
///
/// Unreadable files are skipped with a warning; the walk always completes.
#[must_use]
pub fn load_rule_sets(root: &Path) -> Vec<RuleSet> {
    let mut sets = Vec::new();
    for entry in WalkDir::new(root).into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() || entry.file_name() != RULE_FILE_NAME {
            continue;
        }
        debug!("found rule file: {}", entry.path().display());
        match std::fs::read_to_string(entry.path()) {
            Ok(content) => sets.push(parse_rule_file(&content, entry.path(), root)),
            Err(err) => warn!("skipping unreadable {}: {}", entry.path().display(), err),
        }
    }
    info!("loaded {} rule set(s) under {}", sets.len(), root.display());
    sets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleKind;

    #[test]
    fn parses_lines_with_source_diagnostics() {
        let content = "# header\n\n!fmt:Println\n[cmd/**]+os:Exit\n";
        let set = parse_rule_file(
            content,
            Path::new("proj/internal/.ARCHUNIT"),
            Path::new("proj"),
        );
        assert_eq!(set.path, Path::new("proj/internal"));
        assert_eq!(set.rules.len(), 2);
        assert_eq!(set.rules[0].line_number, 3);
        assert_eq!(set.rules[0].source_file, Path::new("internal/.ARCHUNIT"));
        assert_eq!(set.rules[0].scope, Path::new("proj/internal"));
        assert_eq!(set.rules[1].kind, RuleKind::Override);
        assert_eq!(set.rules[1].line_number, 4);
    }

    #[test]
    fn bad_lines_are_skipped_not_fatal() {
        let content = "[unterminated\n!fmt:Println\n[]x\n";
        let set = parse_rule_file(content, Path::new(".ARCHUNIT"), Path::new(""));
        assert_eq!(set.rules.len(), 1);
        assert_eq!(set.rules[0].original_line, "!fmt:Println");
    }
}
