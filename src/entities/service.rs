//! Service catalog entity.
//!
//! Services are created at seed time and never added or removed afterwards;
//! only their prices change, through the catalog operations.

use serde::{Deserialize, Serialize};

/// A priced catalog entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Unique identifier, stable for the lifetime of the document.
    pub id: i64,
    /// Display category ("X-Ray", "Ultrasound", "Lab Test").
    pub category: String,
    /// Human-readable service name.
    pub name: String,
    /// Unit price in the document currency, always non-negative.
    pub price: f64,
}
