//! Storage seam supplying loyalty programs and visit counts.
//!
//! The engine never reaches into storage itself; a [`BusinessDirectory`]
//! implementation (hosted database, in-memory fixture) hands it a ladder
//! snapshot and a qualifying-visit count that are consistent as of a single
//! point in time.

use super::domain::TierLadder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BusinessId(pub String);

impl fmt::Display for BusinessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatronId(pub String);

impl fmt::Display for PatronId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything the engine needs to know about one business's program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessProgram {
    pub business_id: BusinessId,
    pub name: String,
    /// Short discovery-feed blurb; display only.
    #[serde(default)]
    pub locality: Option<String>,
    pub ladder: TierLadder,
    /// Per-business bound on any single receipt's payout, in cents.
    #[serde(default)]
    pub per_visit_cap_cents: Option<u64>,
    /// Rolling window, in days, over which qualifying visits are counted.
    pub window_days: u32,
}

/// Read-side seam over whatever stores businesses and their visit history.
pub trait BusinessDirectory: Send + Sync {
    /// Fetch the loyalty program configured for a business, if any.
    fn program_for(&self, business: &BusinessId) -> Result<Option<BusinessProgram>, DirectoryError>;

    /// Count a patron's qualifying visits inside the business's rolling
    /// window, as of `as_of`. Excludes any in-flight receipt.
    fn qualifying_visits(
        &self,
        business: &BusinessId,
        patron: &PatronId,
        as_of: DateTime<Utc>,
    ) -> Result<u32, DirectoryError>;
}

/// Error raised by a [`BusinessDirectory`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("directory backend unavailable: {0}")]
    Unavailable(String),
}
