//! Shared name validation for the catalogue's named entities.
//!
//! Subjects, semesters, groups, and tags all share the platform's naming
//! rules: names are compared trimmed and lower-cased, a fixed reserved-word
//! list is rejected outright, and a pattern blacklist blocks names matching
//! a single leading- or trailing-`*` glob.

use thiserror::Error;

/// Route segments and special names no entity may claim.
const RESERVED_NAMES: &[&str] = &[
    "debug", "raw", "install", "api", "avatar", "user", "org", "help", "stars", "issues", "pulls",
    "commits", "repo", "template", "admin", "new", ".", "..",
];

/// Blacklisted globs; a single `*` at either end marks a prefix/suffix match.
const RESERVED_PATTERNS: &[&str] = &["*.keys"];

/// Rejection reasons emitted by [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    /// The name is empty once trimmed of whitespace.
    #[error("name must not be empty")]
    Empty,
    /// The name collides with a reserved word.
    #[error("name \"{name}\" is reserved")]
    Reserved {
        /// The reserved word that was claimed.
        name: String,
    },
    /// The name matches a blacklisted glob pattern.
    #[error("name pattern \"{pattern}\" is not allowed")]
    PatternNotAllowed {
        /// The blacklisted pattern that matched.
        pattern: String,
    },
}

fn matches_glob(name: &str, pattern: &str) -> bool {
    if let Some(suffix) = pattern.strip_prefix('*') {
        if name.ends_with(suffix) {
            return true;
        }
    }
    if let Some(prefix) = pattern.strip_suffix('*') {
        if name.starts_with(prefix) {
            return true;
        }
    }
    false
}

/// Validate a candidate entity name against the platform naming rules.
///
/// The comparison form is the trimmed, lower-cased name; the stored name
/// keeps the caller's casing. Pure; performs no I/O.
pub fn validate(name: &str) -> Result<(), NameError> {
    let name = name.trim().to_lowercase();
    if name.is_empty() {
        return Err(NameError::Empty);
    }

    if RESERVED_NAMES.contains(&name.as_str()) {
        return Err(NameError::Reserved { name });
    }

    for pattern in RESERVED_PATTERNS {
        if matches_glob(&name, pattern) {
            return Err(NameError::PatternNotAllowed {
                pattern: (*pattern).to_owned(),
            });
        }
    }

    Ok(())
}
