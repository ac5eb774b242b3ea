//! Version query filter and its cache hash.
//!
//! A [`VersionFilter`] is what callers send: every field optional. It is
//! resolved into a [`ResolvedFilter`] where every field carries its logical
//! value (defaults applied, limits clamped, lists sorted). Hashing always
//! goes through the resolved form, so an absent field and a field set to its
//! default produce the same hash.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::AppError;
use crate::result::AppResult;
use crate::types::sorting::SortDirection;

/// Default page size.
pub const DEFAULT_LIMIT: u32 = 10;
/// Maximum page size.
pub const MAX_LIMIT: u32 = 100;

/// Version fields a caller may project a listing down to.
pub const PROJECTABLE_FIELDS: &[&str] = &[
    "id",
    "mod_id",
    "version",
    "game_version",
    "changelog",
    "downloads",
    "stability",
    "approved",
    "denied",
    "hash",
    "size",
    "metadata",
    "created_at",
    "updated_at",
];

/// Columns a version listing may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VersionOrderField {
    /// Creation time.
    #[default]
    CreatedAt,
    /// Last update time.
    UpdatedAt,
    /// Download counter.
    Downloads,
}

impl VersionOrderField {
    /// Column name; safe to splice into SQL because the set is closed.
    pub fn as_column(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Downloads => "downloads",
        }
    }
}

/// Caller-supplied query shape for version listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionFilter {
    /// Page size (1..=100, default 10).
    #[serde(default)]
    pub limit: Option<u32>,
    /// Rows to skip (default 0).
    #[serde(default)]
    pub offset: Option<u32>,
    /// Ordering column (default `created_at`).
    #[serde(default)]
    pub order_by: Option<VersionOrderField>,
    /// Ordering direction (default descending).
    #[serde(default)]
    pub order: Option<SortDirection>,
    /// Full-text search over the version string.
    #[serde(default)]
    pub search: Option<String>,
    /// Field projection applied to each returned row.
    #[serde(default)]
    pub fields: Option<Vec<String>>,
}

impl VersionFilter {
    /// Create an empty filter (all defaults).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the offset.
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Set the ordering.
    pub fn with_order(mut self, order_by: VersionOrderField, order: SortDirection) -> Self {
        self.order_by = Some(order_by);
        self.order = Some(order);
        self
    }

    /// Set the search text.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Set the field projection.
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Reject projections naming unknown fields.
    pub fn validate(&self) -> AppResult<()> {
        if let Some(fields) = &self.fields {
            if let Some(unknown) = fields
                .iter()
                .find(|f| !PROJECTABLE_FIELDS.contains(&f.as_str()))
            {
                return Err(AppError::validation(format!(
                    "Unknown field in projection: '{unknown}'"
                )));
            }
        }
        Ok(())
    }

    /// Resolve every field to its logical value.
    pub fn resolve(&self) -> ResolvedFilter {
        let search = self
            .search
            .as_deref()
            .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|s| !s.is_empty());

        let mut fields: Vec<String> = self.fields.clone().unwrap_or_default();
        fields.sort();
        fields.dedup();

        ResolvedFilter {
            limit: self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
            offset: self.offset.unwrap_or(0),
            order_by: self.order_by.unwrap_or_default(),
            order: self.order.unwrap_or_default(),
            search,
            fields,
        }
    }

    /// Stable content hash of the filter's logical value.
    pub fn hash(&self) -> Result<String, serde_json::Error> {
        self.resolve().hash()
    }
}

/// A filter with every field resolved. Field order here fixes the hash input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedFilter {
    /// Page size.
    pub limit: u32,
    /// Rows to skip.
    pub offset: u32,
    /// Ordering column.
    pub order_by: VersionOrderField,
    /// Ordering direction.
    pub order: SortDirection,
    /// Search text with whitespace runs collapsed.
    pub search: Option<String>,
    /// Sorted, de-duplicated projection; empty means all fields.
    pub fields: Vec<String>,
}

impl ResolvedFilter {
    /// SHA-256 of the canonical JSON encoding, hex encoded.
    pub fn hash(&self) -> Result<String, serde_json::Error> {
        let canonical = serde_json::to_vec(self)?;
        Ok(hex::encode(Sha256::digest(&canonical)))
    }

    /// The search text as a Postgres `to_tsquery` expression.
    pub fn ts_query(&self) -> Option<String> {
        self.search.as_deref().and_then(to_ts_query)
    }
}

impl Default for ResolvedFilter {
    fn default() -> Self {
        VersionFilter::default().resolve()
    }
}

/// Join whitespace-separated terms with `&` for `to_tsquery`.
///
/// Characters with operator meaning in tsquery syntax are stripped from each
/// term. Returns `None` when nothing searchable remains.
pub fn to_ts_query(search: &str) -> Option<String> {
    let terms: Vec<String> = search
        .split_whitespace()
        .map(|term| {
            term.chars()
                .filter(|c| !matches!(c, '&' | '|' | '!' | '(' | ')' | ':' | '*' | '\'' | '\\' | '<' | '>'))
                .collect::<String>()
        })
        .filter(|term| !term.is_empty())
        .collect();

    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" & "))
    }
}
