//! Invoice table export as CSV.
//!
//! Produces the spreadsheet hand-off of the full invoice history. Output is
//! plain comma-separated text with a fixed header row; fields that would
//! break the column structure (embedded commas, quotes, newlines) are quoted
//! per RFC 4180. Amounts are fixed to two decimals and dates to `YYYY-MM-DD`
//! so the file reads the same regardless of locale.

use chrono::{DateTime, Utc};

use crate::entities::Invoice;

/// Header row, matching the invoice table column for column.
pub const CSV_HEADER: &str =
    "Invoice Number,Patient Name,Phone,Age,Gender,Address,Amount (PKR),Created By,Date";

/// A rendered export ready to be written somewhere.
#[derive(Clone, Debug)]
pub struct ExportArtifact {
    /// Suggested file name, carrying the export date.
    pub file_name: String,
    /// CSV payload, newline-separated rows.
    pub contents: String,
}

/// Quotes a field only when it needs it.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Renders the invoice history as a CSV artifact.
///
/// `now` only affects the suggested file name. Callers should check for an
/// empty history first and warn instead of producing an empty table.
#[must_use]
pub fn invoices_csv(invoices: &[Invoice], now: DateTime<Utc>) -> ExportArtifact {
    let mut rows = Vec::with_capacity(invoices.len() + 1);
    rows.push(CSV_HEADER.to_string());

    for invoice in invoices {
        let fields = [
            csv_field(&invoice.invoice_number),
            csv_field(&invoice.patient_name),
            csv_field(invoice.patient_phone.as_deref().unwrap_or("")),
            csv_field(invoice.patient_age.as_deref().unwrap_or("")),
            csv_field(invoice.patient_gender.as_deref().unwrap_or("")),
            csv_field(invoice.patient_address.as_deref().unwrap_or("")),
            format!("{:.2}", invoice.total_amount),
            csv_field(&invoice.created_by),
            invoice.created_at.format("%Y-%m-%d").to_string(),
        ];
        rows.push(fields.join(","));
    }

    ExportArtifact {
        file_name: format!("clinic_invoices_{}.csv", now.format("%Y-%m-%d")),
        contents: rows.join("\n"),
    }
}
