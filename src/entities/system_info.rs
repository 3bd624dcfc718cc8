//! Document metadata entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata block carried inside the document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    /// Application version that produced the document.
    pub version: String,
    /// When the document was first created.
    pub created: DateTime<Utc>,
    /// Rewritten by the persistence engine on every successful save.
    pub last_updated: DateTime<Utc>,
    /// Display currency code.
    pub currency: String,
}
