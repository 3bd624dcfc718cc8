//! Invoice business logic - drafting, creation, and retention.
//!
//! This module accumulates a service selection into a draft, turns a draft
//! plus patient details into a persisted invoice, and handles the one-year
//! retention purge. An invoice snapshots the selected services by value, so
//! later catalog repricing never changes what a patient was billed.
//! Purging is irreversible and therefore two-phase: propose counts the
//! affected invoices for the confirmation prompt, apply does the deletion.

use chrono::{DateTime, Utc};

use crate::context::ClinicContext;
use crate::entities::{Invoice, Service, ServiceLine};
use crate::errors::{Error, Result};

/// An in-progress service selection for one invoice.
///
/// Selection is id-keyed; selecting an already-selected service is a no-op.
/// Each selected service is captured as a [`ServiceLine`] with the price at
/// selection time.
#[derive(Clone, Debug, Default)]
pub struct InvoiceDraft {
    lines: Vec<ServiceLine>,
}

impl InvoiceDraft {
    /// Creates an empty draft.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Adds a service to the selection. Duplicate ids are ignored.
    pub fn select(&mut self, service: &Service) {
        if !self.is_selected(service.id) {
            self.lines.push(ServiceLine {
                id: service.id,
                name: service.name.clone(),
                price: service.price,
            });
        }
    }

    /// Removes a service from the selection if present.
    pub fn deselect(&mut self, service_id: i64) {
        self.lines.retain(|line| line.id != service_id);
    }

    /// Flips a service's membership. Returns whether it is selected now.
    pub fn toggle(&mut self, service: &Service) -> bool {
        if self.is_selected(service.id) {
            self.deselect(service.id);
            false
        } else {
            self.select(service);
            true
        }
    }

    /// Whether the given service id is currently selected.
    #[must_use]
    pub fn is_selected(&self, service_id: i64) -> bool {
        self.lines.iter().any(|line| line.id == service_id)
    }

    /// Running total of the selection.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.lines.iter().map(|line| line.price).sum()
    }

    /// The captured service lines, in selection order.
    #[must_use]
    pub fn lines(&self) -> &[ServiceLine] {
        &self.lines
    }

    /// Number of selected services.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Drops the whole selection.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

/// Patient details entered on the invoice form. Only the name is required.
#[derive(Clone, Debug, Default)]
pub struct PatientInfo {
    /// Patient name, required.
    pub name: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Age as entered, free-form.
    pub age: Option<String>,
    /// Gender as entered.
    pub gender: Option<String>,
    /// Address.
    pub address: Option<String>,
}

fn clean(field: Option<String>) -> Option<String> {
    field
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Millisecond timestamps collide when invoices are created back to back,
/// so the candidate id is bumped until it is free.
fn next_invoice_id(invoices: &[Invoice], mut candidate: i64) -> i64 {
    while invoices.iter().any(|invoice| invoice.id == candidate) {
        candidate += 1;
    }
    candidate
}

/// Creates an invoice from a draft and appends it to the document.
///
/// The patient name is trimmed and must be non-empty, and at least one
/// service must be selected. The invoice id derives from the creation
/// timestamp in milliseconds, and the invoice number is `INV-{id}`.
/// Appending to the store schedules the debounced save, which is what the
/// success message refers to.
///
/// # Errors
/// Returns [`Error::Validation`] when the name is blank or the selection is
/// empty.
pub async fn create_invoice(
    ctx: &ClinicContext,
    patient: PatientInfo,
    draft: &InvoiceDraft,
    created_by: &str,
) -> Result<Invoice> {
    let patient_name = patient.name.trim().to_string();
    if patient_name.is_empty() {
        ctx.notify.error("Please enter patient name");
        return Err(Error::Validation {
            message: "patient name is required".to_string(),
        });
    }
    if draft.is_empty() {
        ctx.notify.error("Please select at least one service");
        return Err(Error::Validation {
            message: "no services selected".to_string(),
        });
    }

    let now = Utc::now();
    let mut invoices = ctx.store.invoices().await;
    let id = next_invoice_id(&invoices, now.timestamp_millis());

    let invoice = Invoice {
        id,
        invoice_number: format!("INV-{id}"),
        patient_name,
        patient_phone: clean(patient.phone),
        patient_age: clean(patient.age),
        patient_gender: clean(patient.gender),
        patient_address: clean(patient.address),
        services: draft.lines().to_vec(),
        total_amount: draft.total(),
        created_by: created_by.to_string(),
        created_at: now,
    };

    invoices.push(invoice.clone());
    ctx.store.set_invoices(invoices).await;

    ctx.notify
        .success("Invoice created and auto-saved successfully!");
    Ok(invoice)
}

/// A counted retention purge, ready to be confirmed and applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PurgeProposal {
    /// Invoices created strictly before this instant are removed.
    pub cutoff: DateTime<Utc>,
    /// How many invoices the purge would remove right now.
    pub affected: usize,
}

/// Counts the invoices a purge at `cutoff` would remove.
///
/// An invoice created exactly at the cutoff survives.
pub async fn propose_purge(ctx: &ClinicContext, cutoff: DateTime<Utc>) -> PurgeProposal {
    let affected = ctx
        .store
        .invoices()
        .await
        .iter()
        .filter(|invoice| invoice.created_at < cutoff)
        .count();
    PurgeProposal { cutoff, affected }
}

/// Applies a confirmed purge and reports how many invoices were removed.
///
/// The count is recomputed against the live document, so an invoice created
/// between propose and apply is handled correctly.
pub async fn apply_purge(ctx: &ClinicContext, proposal: &PurgeProposal) -> usize {
    let mut invoices = ctx.store.invoices().await;
    let before = invoices.len();
    invoices.retain(|invoice| invoice.created_at >= proposal.cutoff);
    let removed = before - invoices.len();
    ctx.store.set_invoices(invoices).await;

    ctx.notify
        .success(format!("Removed {removed} old invoices. Database optimized!"));
    removed
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::notify::Severity;
    use crate::test_utils::*;
    use chrono::Duration;

    fn find_service(services: &[Service], id: i64) -> Service {
        services.iter().find(|s| s.id == id).unwrap().clone()
    }

    #[tokio::test]
    async fn test_create_invoice_snapshots_selection() -> crate::errors::Result<()> {
        let (ctx, mut events) = setup_context().await;
        let services = ctx.store.services().await;

        let mut draft = InvoiceDraft::new();
        draft.select(&find_service(&services, 1)); // X ray, 500.00
        draft.select(&find_service(&services, 22)); // USG ABDOMEN, 800.00

        let patient = PatientInfo {
            name: "Ali".to_string(),
            ..PatientInfo::default()
        };
        let invoice = create_invoice(&ctx, patient, &draft, "moavia").await?;

        assert_eq!(invoice.total_amount, 1300.0);
        assert_eq!(invoice.services.len(), 2);
        assert_eq!(invoice.invoice_number, format!("INV-{}", invoice.id));
        assert_eq!(invoice.created_by, "moavia");

        let stored = ctx.store.invoices().await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].patient_name, "Ali");

        let notifications = drain(&mut events);
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].severity, Severity::Success);
        assert_eq!(
            notifications[0].message,
            "Invoice created and auto-saved successfully!"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_create_invoice_total_survives_repricing() -> crate::errors::Result<()> {
        let (ctx, _events) = setup_context().await;
        let services = ctx.store.services().await;

        let mut draft = InvoiceDraft::new();
        draft.select(&find_service(&services, 1));
        let patient = PatientInfo {
            name: "Sana".to_string(),
            ..PatientInfo::default()
        };
        let invoice = create_invoice(&ctx, patient, &draft, "moavia").await?;
        assert_eq!(invoice.total_amount, 500.0);

        // Doubling the catalog price must not touch the issued invoice.
        crate::core::catalog::update_price(&ctx, 1, 1000.0).await?;
        let stored = ctx.store.invoices().await;
        assert_eq!(stored[0].total_amount, 500.0);
        assert_eq!(stored[0].services[0].price, 500.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_invoice_requires_patient_name() {
        let (ctx, mut events) = setup_context().await;
        let services = ctx.store.services().await;

        let mut draft = InvoiceDraft::new();
        draft.select(&find_service(&services, 1));

        let patient = PatientInfo {
            name: "   ".to_string(),
            ..PatientInfo::default()
        };
        let result = create_invoice(&ctx, patient, &draft, "moavia").await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        assert!(ctx.store.invoices().await.is_empty());
        let notifications = drain(&mut events);
        assert_eq!(notifications[0].message, "Please enter patient name");
    }

    #[tokio::test]
    async fn test_create_invoice_requires_selection() {
        let (ctx, mut events) = setup_context().await;

        let patient = PatientInfo {
            name: "Ali".to_string(),
            ..PatientInfo::default()
        };
        let result = create_invoice(&ctx, patient, &InvoiceDraft::new(), "moavia").await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let notifications = drain(&mut events);
        assert_eq!(
            notifications[0].message,
            "Please select at least one service"
        );
    }

    #[tokio::test]
    async fn test_create_invoice_cleans_patient_fields() -> crate::errors::Result<()> {
        let (ctx, _events) = setup_context().await;
        let services = ctx.store.services().await;

        let mut draft = InvoiceDraft::new();
        draft.select(&find_service(&services, 48));

        let patient = PatientInfo {
            name: "  Ali  ".to_string(),
            phone: Some("   ".to_string()),
            age: None,
            gender: Some("male".to_string()),
            address: Some(" Multan ".to_string()),
        };
        let invoice = create_invoice(&ctx, patient, &draft, "admin").await?;

        assert_eq!(invoice.patient_name, "Ali");
        assert_eq!(invoice.patient_phone, None);
        assert_eq!(invoice.patient_gender, Some("male".to_string()));
        assert_eq!(invoice.patient_address, Some("Multan".to_string()));
        Ok(())
    }

    #[test]
    fn test_next_invoice_id_skips_collisions() {
        let now = Utc::now();
        let invoices = vec![
            make_invoice(100, "A", 500.0, now),
            make_invoice(101, "B", 500.0, now),
        ];

        assert_eq!(next_invoice_id(&invoices, 100), 102);
        assert_eq!(next_invoice_id(&invoices, 99), 99);
        assert_eq!(next_invoice_id(&[], 100), 100);
    }

    #[tokio::test]
    async fn test_back_to_back_invoices_get_distinct_ids() -> crate::errors::Result<()> {
        let (ctx, _events) = setup_context().await;
        let services = ctx.store.services().await;

        let mut draft = InvoiceDraft::new();
        draft.select(&find_service(&services, 1));
        let patient = || PatientInfo {
            name: "Ali".to_string(),
            ..PatientInfo::default()
        };

        let first = create_invoice(&ctx, patient(), &draft, "moavia").await?;
        let second = create_invoice(&ctx, patient(), &draft, "moavia").await?;
        assert_ne!(first.id, second.id);
        assert_ne!(first.invoice_number, second.invoice_number);
        Ok(())
    }

    #[test]
    fn test_draft_selection_rules() {
        let service = Service {
            id: 13,
            category: "X-Ray".to_string(),
            name: "PELVIS".to_string(),
            price: 500.0,
        };
        let other = Service {
            id: 14,
            category: "X-Ray".to_string(),
            name: "FEMUR AP/LAT".to_string(),
            price: 500.0,
        };

        let mut draft = InvoiceDraft::new();
        draft.select(&service);
        draft.select(&service); // duplicate, ignored
        assert_eq!(draft.len(), 1);
        assert_eq!(draft.total(), 500.0);

        assert!(draft.toggle(&other));
        assert_eq!(draft.total(), 1000.0);
        assert!(!draft.toggle(&other));
        assert_eq!(draft.len(), 1);

        draft.deselect(13);
        assert!(draft.is_empty());
        assert_eq!(draft.total(), 0.0);
    }

    #[tokio::test]
    async fn test_purge_removes_only_strictly_older() {
        let (ctx, mut events) = setup_context().await;

        let now = Utc::now();
        let cutoff = now - Duration::days(365);
        ctx.store
            .set_invoices(vec![
                make_invoice(1, "A", 500.0, now - Duration::days(400)),
                make_invoice(2, "B", 500.0, now - Duration::days(370)),
                make_invoice(3, "C", 500.0, now - Duration::days(300)),
                make_invoice(4, "D", 500.0, now - Duration::days(10)),
                make_invoice(5, "E", 500.0, now),
            ])
            .await;

        let proposal = propose_purge(&ctx, cutoff).await;
        assert_eq!(proposal.affected, 2);

        let removed = apply_purge(&ctx, &proposal).await;
        assert_eq!(removed, 2);

        let remaining = ctx.store.invoices().await;
        assert_eq!(remaining.len(), 3);
        assert!(remaining.iter().all(|inv| inv.created_at >= cutoff));

        let notifications = drain(&mut events);
        assert_eq!(
            notifications[0].message,
            "Removed 2 old invoices. Database optimized!"
        );
    }

    #[tokio::test]
    async fn test_purge_keeps_invoice_exactly_at_cutoff() {
        let (ctx, _events) = setup_context().await;

        let cutoff = Utc::now() - Duration::days(365);
        ctx.store
            .set_invoices(vec![make_invoice(1, "A", 500.0, cutoff)])
            .await;

        let proposal = propose_purge(&ctx, cutoff).await;
        assert_eq!(proposal.affected, 0);

        let removed = apply_purge(&ctx, &proposal).await;
        assert_eq!(removed, 0);
        assert_eq!(ctx.store.invoices().await.len(), 1);
    }
}
