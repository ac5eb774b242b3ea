//! Query string parameters for version listings.

use serde::{Deserialize, Serialize};

use modhub_core::types::{SortDirection, VersionFilter, VersionOrderField};

/// Query parameters accepted by listing and count endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterParams {
    /// Page size.
    pub limit: Option<u32>,
    /// Rows to skip.
    pub offset: Option<u32>,
    /// Ordering column.
    pub order_by: Option<VersionOrderField>,
    /// Ordering direction.
    pub order: Option<SortDirection>,
    /// Search text.
    pub search: Option<String>,
    /// Comma-separated field projection.
    pub fields: Option<String>,
    /// Request the moderation queue (moderators only).
    #[serde(default)]
    pub unapproved: bool,
}

impl FilterParams {
    /// Build the filter. Missing parameters fall back to the defaults, so
    /// an HTTP listing is always paginated.
    pub fn to_filter(&self) -> VersionFilter {
        VersionFilter {
            limit: self.limit,
            offset: self.offset,
            order_by: self.order_by,
            order: self.order,
            search: self.search.clone(),
            fields: self.fields.as_deref().map(split_list),
        }
    }

    /// Requested projection, empty for full rows.
    pub fn projection(&self) -> Vec<String> {
        self.fields.as_deref().map(split_list).unwrap_or_default()
    }
}

/// `?ids=a,b,c`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdsParams {
    /// Comma-separated ids.
    #[serde(default)]
    pub ids: String,
    /// Request the moderation queue (moderators only).
    #[serde(default)]
    pub unapproved: bool,
}

impl IdsParams {
    /// Parsed id list, in request order.
    pub fn ids(&self) -> Vec<String> {
        split_list(&self.ids)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
