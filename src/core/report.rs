//! Revenue reporting business logic.
//!
//! This module provides pure aggregation functions over the invoice history:
//! day/month/all-time revenue totals, per-service usage ranking, and the
//! role-scoped invoice listing. All functions take the invoice slice and an
//! explicit `now`, so every calculation is deterministic and testable.
//! Calendar boundaries are evaluated in UTC.

use chrono::{DateTime, Datelike, Utc};

use crate::entities::{Invoice, Role};

/// Reporting window for [`aggregate`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Period {
    /// Invoices created on the same calendar date as `now`.
    Day,
    /// Invoices created in the same month and year as `now`.
    Month,
    /// Every invoice on record.
    All,
}

/// Invoice count and revenue for one reporting window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AggregateTotals {
    /// Number of invoices in the window.
    pub count: usize,
    /// Sum of their totals.
    pub revenue: f64,
}

/// Sums invoice count and revenue over the given window.
#[must_use]
pub fn aggregate(invoices: &[Invoice], period: Period, now: DateTime<Utc>) -> AggregateTotals {
    let in_window = |invoice: &&Invoice| match period {
        Period::Day => invoice.created_at.date_naive() == now.date_naive(),
        Period::Month => {
            invoice.created_at.month() == now.month() && invoice.created_at.year() == now.year()
        }
        Period::All => true,
    };

    let mut count = 0;
    let mut revenue = 0.0;
    for invoice in invoices.iter().filter(in_window) {
        count += 1;
        revenue += invoice.total_amount;
    }
    AggregateTotals { count, revenue }
}

/// Usage statistics for one service, keyed by name.
#[derive(Clone, Debug, PartialEq)]
pub struct ServiceUsage {
    /// Service name as billed.
    pub name: String,
    /// How many invoice lines carried it.
    pub count: usize,
    /// Revenue from those lines.
    pub revenue: f64,
}

/// Ranks services by how often they were billed, most used first.
///
/// Lines are grouped by service name across all invoices. The sort is
/// stable, so services with equal counts stay in first-billed order. At most
/// `limit` entries are returned.
#[must_use]
pub fn top_services(invoices: &[Invoice], limit: usize) -> Vec<ServiceUsage> {
    let mut stats: Vec<ServiceUsage> = Vec::new();
    for invoice in invoices {
        for line in &invoice.services {
            match stats.iter_mut().find(|usage| usage.name == line.name) {
                Some(usage) => {
                    usage.count += 1;
                    usage.revenue += line.price;
                }
                None => stats.push(ServiceUsage {
                    name: line.name.clone(),
                    count: 1,
                    revenue: line.price,
                }),
            }
        }
    }

    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats.truncate(limit);
    stats
}

/// The headline numbers for the admin dashboard.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevenueSummary {
    /// Total invoices on record.
    pub invoice_count: usize,
    /// All-time revenue.
    pub total: f64,
    /// Revenue from invoices created today.
    pub today: f64,
    /// Revenue from invoices created this month.
    pub month: f64,
}

/// Computes the dashboard summary in one pass over the windows.
#[must_use]
pub fn revenue_summary(invoices: &[Invoice], now: DateTime<Utc>) -> RevenueSummary {
    RevenueSummary {
        invoice_count: invoices.len(),
        total: aggregate(invoices, Period::All, now).revenue,
        today: aggregate(invoices, Period::Day, now).revenue,
        month: aggregate(invoices, Period::Month, now).revenue,
    }
}

/// Scopes the invoice listing to what the given user may see.
///
/// Admins see everything; other users only the invoices they created.
#[must_use]
pub fn invoices_for_user<'a>(
    invoices: &'a [Invoice],
    username: &str,
    role: Role,
) -> Vec<&'a Invoice> {
    invoices
        .iter()
        .filter(|invoice| role == Role::Admin || invoice.created_by == username)
        .collect()
}
