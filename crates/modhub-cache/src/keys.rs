//! Cache key builders for every ModHub cache entry.
//!
//! Keys are `op|param|param|...|u=N`. Free-form parameters are written as
//! `{byte_len}:{value}` so no choice of ids can make two parameter lists
//! render to the same key. Query keys always end with the visibility flag.

/// Filter marker used when a list or count is issued without a descriptor.
pub const NO_FILTER: &str = "nofilter";

#[derive(Debug)]
struct KeyBuilder {
    key: String,
}

impl KeyBuilder {
    fn new(op: &str) -> Self {
        Self { key: op.to_string() }
    }

    /// Length-prefixed free-form value.
    fn value(mut self, value: &str) -> Self {
        self.key.push_str(&format!("|{}:{value}", value.len()));
        self
    }

    /// Length-prefixed list, itself prefixed with its element count.
    fn list(mut self, values: &[String]) -> Self {
        self.key.push_str(&format!("|{}", values.len()));
        for value in values {
            self.key.push_str(&format!(":{}:{value}", value.len()));
        }
        self
    }

    /// Filter hash, or [`NO_FILTER`]. Hashes are fixed-width hex.
    fn filter(mut self, hash: Option<&str>) -> Self {
        self.key.push_str("|f=");
        self.key.push_str(hash.unwrap_or(NO_FILTER));
        self
    }

    fn visibility(mut self, unapproved: bool) -> String {
        self.key.push_str(if unapproved { "|u=1" } else { "|u=0" });
        self.key
    }

    fn build(self) -> String {
        self.key
    }
}

// ── Single-row lookups ─────────────────────────────────────
//
// These return a row regardless of moderation state, so the flag is fixed.

/// Key for a version by id.
pub fn version(id: &str) -> String {
    KeyBuilder::new("GetVersion").value(id).visibility(false)
}

/// Key for a version scoped to its mod.
pub fn mod_version(mod_id: &str, version_id: &str) -> String {
    KeyBuilder::new("GetModVersion")
        .value(mod_id)
        .value(version_id)
        .visibility(false)
}

/// Key for a version looked up by its version string.
pub fn version_by_name(mod_id: &str, name: &str) -> String {
    KeyBuilder::new("GetModVersionByName")
        .value(mod_id)
        .value(name)
        .visibility(false)
}

/// Key for a batch lookup by ids. Order of ids is significant.
pub fn versions_by_ids(ids: &[String]) -> String {
    KeyBuilder::new("GetVersionsByID").list(ids).visibility(false)
}

// ── Listings ───────────────────────────────────────────────

/// Key for the latest version per stability of one mod.
pub fn mod_latest_versions(mod_id: &str, unapproved: bool) -> String {
    KeyBuilder::new("GetModLatestVersions")
        .value(mod_id)
        .visibility(unapproved)
}

/// Key for the latest version per stability of several mods. Callers pass
/// the ids sorted and de-duplicated.
pub fn mods_latest_versions(mod_ids: &[String], unapproved: bool) -> String {
    KeyBuilder::new("GetModsLatestVersions")
        .list(mod_ids)
        .visibility(unapproved)
}

/// Key for a filtered listing of one mod's versions.
pub fn mod_versions(mod_id: &str, filter_hash: Option<&str>, unapproved: bool) -> String {
    KeyBuilder::new("GetModVersions")
        .value(mod_id)
        .filter(filter_hash)
        .visibility(unapproved)
}

/// Key for a filtered listing across all mods.
pub fn versions(filter_hash: Option<&str>, unapproved: bool) -> String {
    KeyBuilder::new("GetVersions")
        .filter(filter_hash)
        .visibility(unapproved)
}

/// Key for a filtered count across all mods.
pub fn version_count(filter_hash: Option<&str>, unapproved: bool) -> String {
    KeyBuilder::new("GetVersionCount")
        .filter(filter_hash)
        .visibility(unapproved)
}

// ── Rate limiting ──────────────────────────────────────────

/// Key for a short-window admission of `identity` to `scope`.
pub fn rate_limit(scope: &str, identity: &str) -> String {
    KeyBuilder::new("rate").value(scope).value(identity).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_key() {
        assert_eq!(version("abc"), "GetVersion|3:abc|u=0");
    }

    #[test]
    fn test_parent_prefix_does_not_collide() {
        assert_ne!(
            mod_versions("A", None, false),
            mod_versions("AB", None, false)
        );
        assert_ne!(
            version_by_name("A", "B|1"),
            version_by_name("AB", "1")
        );
        assert_ne!(
            mod_version("a:1", "2"),
            mod_version("a", "1:2")
        );
    }

    #[test]
    fn test_id_lists_do_not_collide() {
        let split = vec!["a".to_string(), "b".to_string()];
        let joined = vec!["a:1:b".to_string()];
        assert_ne!(versions_by_ids(&split), versions_by_ids(&joined));
        assert_ne!(versions_by_ids(&[]), versions_by_ids(&["".to_string()]));
    }

    #[test]
    fn test_visibility_is_part_of_every_query_key() {
        assert_ne!(versions(None, false), versions(None, true));
        assert_ne!(version_count(None, false), version_count(None, true));
        assert_ne!(
            mod_latest_versions("m", false),
            mod_latest_versions("m", true)
        );
        assert!(version("x").ends_with("|u=0"));
        assert!(versions_by_ids(&["x".to_string()]).ends_with("|u=0"));
    }

    #[test]
    fn test_absent_filter_is_distinct() {
        let hash = "0".repeat(64);
        assert_ne!(versions(None, false), versions(Some(&hash), false));
        assert_eq!(versions(None, false), "GetVersions|f=nofilter|u=0");
    }

    #[test]
    fn test_operations_are_namespaced() {
        assert_ne!(versions(None, false), version_count(None, false));
    }

    #[test]
    fn test_rate_limit_key() {
        assert_eq!(
            rate_limit("download:v1", "10.0.0.1"),
            "rate|11:download:v1|8:10.0.0.1"
        );
    }
}
