//! Catalog business logic - price updates and read-side projections.
//!
//! This module covers the service price list: single-price updates, bulk
//! percentage repricing, and the category/text filters the view renders
//! from. The catalog itself is fixed at seed time; ids never change, only
//! prices do. Bulk repricing is irreversible, so it is split into a propose
//! step (validate, describe the effect) and an apply step the caller runs
//! after the user confirms.

use crate::context::ClinicContext;
use crate::entities::Service;
use crate::errors::{Error, Result};

/// Rounds to two decimal places, half away from zero.
///
/// Prices are stored in whole rupees and paise; keeping every mutation at
/// cent precision stops drift from accumulating over repeated repricings.
#[must_use]
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Replaces one service's price.
///
/// The price must be a finite number ≥ 0; anything else is rejected with no
/// mutation. An unknown service id is rejected the same way.
///
/// # Errors
/// Returns [`Error::InvalidPrice`] for a non-finite or negative price and
/// [`Error::ServiceNotFound`] for an unknown id.
pub async fn update_price(ctx: &ClinicContext, service_id: i64, new_price: f64) -> Result<()> {
    if !new_price.is_finite() || new_price < 0.0 {
        ctx.notify.error("Please enter a valid price");
        return Err(Error::InvalidPrice { price: new_price });
    }

    let mut services = ctx.store.services().await;
    let Some(service) = services.iter_mut().find(|s| s.id == service_id) else {
        ctx.notify.error("Service not found");
        return Err(Error::ServiceNotFound { id: service_id });
    };

    service.price = new_price;
    ctx.store.set_services(services).await;
    ctx.notify.success("Price updated successfully!");
    Ok(())
}

/// A validated bulk repricing, ready to be confirmed and applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RepriceProposal {
    /// Percentage change to apply (10 means +10%).
    pub percentage: f64,
    /// Number of services the change will touch.
    pub service_count: usize,
}

/// Validates a bulk percentage change and describes its effect.
///
/// The percentage must be finite and above −100; a change of −100 or below
/// would zero or negate every price. The returned proposal is what
/// [`apply_bulk_reprice`] accepts, so an unvalidated percentage can never
/// reach the catalog.
///
/// # Errors
/// Returns [`Error::InvalidPercentage`] for a non-finite percentage or one
/// at or below −100.
pub async fn propose_bulk_reprice(
    ctx: &ClinicContext,
    percentage: f64,
) -> Result<RepriceProposal> {
    if !percentage.is_finite() || percentage <= -100.0 {
        ctx.notify.error("Please enter a valid percentage");
        return Err(Error::InvalidPercentage { percentage });
    }

    Ok(RepriceProposal {
        percentage,
        service_count: ctx.store.services().await.len(),
    })
}

/// Applies a confirmed bulk repricing to every service.
///
/// Each price becomes `round_to_cents(price × (1 + percentage/100))`.
/// Returns the number of services touched.
pub async fn apply_bulk_reprice(ctx: &ClinicContext, proposal: &RepriceProposal) -> usize {
    let factor = 1.0 + proposal.percentage / 100.0;

    let mut services = ctx.store.services().await;
    for service in &mut services {
        service.price = round_to_cents(service.price * factor);
    }
    let count = services.len();
    ctx.store.set_services(services).await;

    ctx.notify
        .success(format!("All prices updated by {}%!", proposal.percentage));
    count
}

/// Filters the catalog to one category. `"all"` and the empty string mean
/// no filter.
#[must_use]
pub fn filter_by_category<'a>(services: &'a [Service], category: &str) -> Vec<&'a Service> {
    services
        .iter()
        .filter(|s| category.is_empty() || category == "all" || s.category == category)
        .collect()
}

/// Filters the catalog by a case-insensitive name substring.
#[must_use]
pub fn filter_by_text<'a>(services: &'a [Service], query: &str) -> Vec<&'a Service> {
    let needle = query.to_lowercase();
    services
        .iter()
        .filter(|s| s.name.to_lowercase().contains(&needle))
        .collect()
}

/// Groups the catalog by category, preserving first-encountered order of
/// both categories and services.
#[must_use]
pub fn services_by_category(services: &[Service]) -> Vec<(String, Vec<&Service>)> {
    let mut groups: Vec<(String, Vec<&Service>)> = Vec::new();
    for service in services {
        match groups.iter_mut().find(|(name, _)| *name == service.category) {
            Some((_, members)) => members.push(service),
            None => groups.push((service.category.clone(), vec![service])),
        }
    }
    groups
}
