//! Tool version parsing and comparison.
//!
//! Tools report versions that are not always valid semver (`3.10`,
//! `3.22.1-g37088a8`, `3.10.2.4`). Only the leading dotted-numeric part is
//! kept, parsed into a [`semver::Version`], so comparison is component-wise
//! and a vendor or rc suffix never ranks a build below its release.

use semver::Version;

/// Parse a version string, allowing for incomplete or decorated versions.
pub fn parse_version_lenient(s: &str) -> Option<Version> {
    let s = s.trim();

    // Keep the leading dotted-numeric part
    let end = s
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(s.len());
    let numeric = s[..end].trim_end_matches('.');
    if numeric.is_empty() {
        return None;
    }

    let mut parts = numeric.split('.').map(|p| p.parse::<u64>());
    let major = parts.next()?.ok()?;
    let minor = parts.next().transpose().ok()?.unwrap_or(0);
    let patch = parts.next().transpose().ok()?.unwrap_or(0);

    Some(Version::new(major, minor, patch))
}

/// Comparison operators accepted in a version requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    GreaterEq,
    Greater,
    LessEq,
    Less,
    Eq,
    NotEq,
}

/// Split a requirement into its operator and version.
///
/// A bare version means "at least this version".
fn split_requirement(req: &str) -> (Op, &str) {
    let req = req.trim();
    // Two-character operators must be tried before their one-character prefixes
    let ops = [
        (">=", Op::GreaterEq),
        ("<=", Op::LessEq),
        ("==", Op::Eq),
        ("!=", Op::NotEq),
        (">", Op::Greater),
        ("<", Op::Less),
        ("=", Op::Eq),
    ];

    for (prefix, op) in ops {
        if let Some(rest) = req.strip_prefix(prefix) {
            return (op, rest.trim());
        }
    }

    (Op::GreaterEq, req)
}

/// Check whether `version` satisfies `requirement`.
///
/// Unparseable versions or requirements never match.
pub fn version_compare(version: &str, requirement: &str) -> bool {
    let (op, wanted) = split_requirement(requirement);

    let (Some(have), Some(want)) = (parse_version_lenient(version), parse_version_lenient(wanted))
    else {
        return false;
    };

    match op {
        Op::GreaterEq => have >= want,
        Op::Greater => have > want,
        Op::LessEq => have <= want,
        Op::Less => have < want,
        Op::Eq => have == want,
        Op::NotEq => have != want,
    }
}
