//! Release stability classifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How stable a published version claims to be.
///
/// The latest-version listing returns one row per stability class.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    sqlx::Type,
)]
#[sqlx(type_name = "version_stability", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Stability {
    /// Production release.
    #[default]
    Release,
    /// Feature complete, may contain bugs.
    Beta,
    /// Experimental build.
    Alpha,
}

impl Stability {
    /// All stability classes in declaration order.
    pub const ALL: [Stability; 3] = [Self::Release, Self::Beta, Self::Alpha];

    /// Return the stability as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Release => "release",
            Self::Beta => "beta",
            Self::Alpha => "alpha",
        }
    }
}

impl fmt::Display for Stability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Stability {
    type Err = modhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "release" => Ok(Self::Release),
            "beta" => Ok(Self::Beta),
            "alpha" => Ok(Self::Alpha),
            _ => Err(modhub_core::AppError::validation(format!(
                "Invalid stability: '{s}'. Expected one of: release, beta, alpha"
            ))),
        }
    }
}
