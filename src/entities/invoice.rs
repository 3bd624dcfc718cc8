//! Invoice entity.
//!
//! Invoices embed price snapshots of the services they bill, so later catalog
//! price changes never alter a past invoice. Records are created once, never
//! mutated, and removed only by the age-based purge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A service's id, name, and price captured at invoice-creation time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceLine {
    /// Catalog id of the billed service.
    pub id: i64,
    /// Service name at creation time.
    pub name: String,
    /// Price at creation time.
    pub price: f64,
}

/// An issued invoice.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Unique identifier derived from the creation timestamp.
    pub id: i64,
    /// Display number, `INV-` followed by the id.
    pub invoice_number: String,
    /// Patient name, never empty.
    pub patient_name: String,
    /// Contact phone, if given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_phone: Option<String>,
    /// Age, if given. Kept as free text ("3 months" is valid input).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_age: Option<String>,
    /// Gender, if given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_gender: Option<String>,
    /// Address, if given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_address: Option<String>,
    /// Price snapshots of the billed services, in selection order.
    pub services: Vec<ServiceLine>,
    /// Sum of the snapshot prices, fixed at creation.
    pub total_amount: f64,
    /// Username of the account that issued the invoice.
    pub created_by: String,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
}
