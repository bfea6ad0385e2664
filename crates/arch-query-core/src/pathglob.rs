//! Multi-segment path glob matching.
//!
//! Matches whole file paths against globs such as `cmd/**` or
//! `*_service.go`. Identifier wildcards are a separate concern, see
//! [`crate::wildcard`].

use std::path::Path;

/// Tests whether `path` matches a multi-segment `glob`.
///
/// `*` alone matches everything. Otherwise the glob is applied to the full
/// path (with `**` spanning any number of directories); when that fails the
/// basename is retried so absolute and relative spellings of the same file
/// agree. Invalid glob syntax never matches.
#[must_use]
pub fn matches(path: &str, glob: &str) -> bool {
    if glob == "*" {
        return true;
    }
    let Ok(compiled) = glob::Pattern::new(glob) else {
        tracing::debug!("invalid path glob `{glob}`");
        return false;
    };
    if compiled.matches(path) {
        return true;
    }
    // `dir/**` must cover everything under dir even where the glob engine
    // disagrees about the boundary.
    if let Some(prefix) = glob.strip_suffix("/**") {
        let normalized = prefix.trim_end_matches('/');
        if path.starts_with(normalized)
            && path
                .as_bytes()
                .get(normalized.len())
                .is_some_and(|&b| b == b'/')
        {
            return true;
        }
    }
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| compiled.matches(name))
}

#[cfg(test)]
mod tests {
    use super::matches;

    #[test]
    fn star_matches_everything() {
        assert!(matches("any/path/file.go", "*"));
        assert!(matches("", "*"));
    }

    #[test]
    fn literal_path_matches_itself() {
        assert!(matches("cmd/main.go", "cmd/main.go"));
        assert!(!matches("cmd/main.go", "cmd/other.go"));
    }

    #[test]
    fn globstar_spans_directories() {
        assert!(matches("cmd/app/main.go", "cmd/**"));
        assert!(matches("cmd/deep/nested/main.go", "cmd/**"));
        assert!(!matches("pkg/app/main.go", "cmd/**"));
    }

    #[test]
    fn suffix_glob_matches_by_name() {
        assert!(matches("user_service.go", "*_service.go"));
        assert!(matches("app/internal/user_service.go", "*_service.go"));
        assert!(!matches("user_test.go", "*_service.go"));
    }

    #[test]
    fn basename_fallback_tolerates_absolute_paths() {
        assert!(matches("/work/repo/app/user_service.go", "user_service.go"));
        assert!(!matches("/work/repo/app/user_test.go", "user_service.go"));
    }

    #[test]
    fn invalid_glob_never_matches() {
        assert!(!matches("anything", "[unclosed"));
    }

    #[test]
    fn empty_path_does_not_match_nonempty_glob() {
        assert!(!matches("", "*_service.go"));
    }
}
