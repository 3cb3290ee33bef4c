//! Semantic version comparator (component E, §4.5). Only the three-integer
//! triple is in scope — build metadata and pre-release tags are stripped,
//! never compared.

/// A parsed `major.minor.patch` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

/// Strip an optional leading `v`/`V`, then truncate at the first `-` or `+`,
/// then require exactly three dot-separated base-10 non-negative integers.
pub fn parse_version(s: &str) -> Option<Version> {
    let s = s.strip_prefix(['v', 'V']).unwrap_or(s);
    let s = s
        .split(['-', '+'])
        .next()
        .expect("split always yields at least one item");

    let mut parts = s.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    let patch = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None; // more than three components
    }

    Some(Version { major, minor, patch })
}

/// -1, 0 or +1 on the lexicographic ordering of (major, minor, patch).
/// Panics-free: callers that need parse failures surfaced should call
/// [`parse_version`] directly, since this comparator only operates on
/// already-parsed triples.
pub fn compare_versions(a: &Version, b: &Version) -> std::cmp::Ordering {
    a.cmp(b)
}

/// Parse both sides and compare; `None` if either fails to parse.
pub fn compare_version_strings(a: &str, b: &str) -> Option<std::cmp::Ordering> {
    Some(compare_versions(&parse_version(a)?, &parse_version(b)?))
}

/// True iff both sides parse and compare equal. Parse failure on either
/// side yields `false`, never an error — per §4.5 and §7's carve-out.
pub fn versions_match(a: &str, b: &str) -> bool {
    match (parse_version(a), parse_version(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// `"vM.m.p"`.
pub fn format_version(major: u64, minor: u64, patch: u64) -> String {
    format!("v{major}.{minor}.{patch}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    #[test]
    fn s1_scenario() {
        assert_eq!(
            parse_version("v0.6.5-beta"),
            Some(Version {
                major: 0,
                minor: 6,
                patch: 5
            })
        );
        assert_eq!(
            compare_version_strings("0.6.4", "0.6.5"),
            Some(Ordering::Less)
        );
        assert!(versions_match("V0.6.5", "v0.6.5"));
        assert_eq!(format_version(10, 20, 30), "v10.20.30");
    }

    #[test]
    fn suffix_is_ignored_for_equality() {
        assert!(versions_match("0.6.5-beta", "0.6.5"));
        assert!(versions_match("0.6.5+build.7", "0.6.5"));
    }

    #[test]
    fn rejects_malformed_shapes() {
        assert_eq!(parse_version(""), None);
        assert_eq!(parse_version("1.2"), None);
        assert_eq!(parse_version("1.2.3.4"), None);
        assert_eq!(parse_version("1.2.x"), None);
        assert_eq!(parse_version("a.b.c"), None);
    }

    #[test]
    fn versions_match_never_propagates_parse_errors() {
        assert!(!versions_match("garbage", "1.0.0"));
        assert!(!versions_match("1.0.0", "garbage"));
        assert!(!versions_match("garbage", "also-garbage"));
    }

    #[test]
    fn versions_match_is_symmetric() {
        let pairs = [
            ("1.0.0", "1.0.0"),
            ("1.0.0", "1.0.1"),
            ("garbage", "1.0.0"),
            ("garbage", "garbage"),
        ];
        for (a, b) in pairs {
            assert_eq!(versions_match(a, b), versions_match(b, a));
        }
    }

    #[test]
    fn compare_is_reflexive_for_any_valid_version() {
        for s in ["0.0.0", "1.2.3", "v9.9.9-rc1", "v1.0.0+build"] {
            assert_eq!(compare_version_strings(s, s), Some(Ordering::Equal));
        }
    }

    #[test]
    fn ordering_respects_each_component() {
        assert_eq!(
            compare_version_strings("1.0.0", "2.0.0"),
            Some(Ordering::Less)
        );
        assert_eq!(
            compare_version_strings("1.9.0", "1.10.0"),
            Some(Ordering::Less)
        );
        assert_eq!(
            compare_version_strings("1.2.9", "1.2.10"),
            Some(Ordering::Less)
        );
    }
}
