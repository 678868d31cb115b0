//! Summary metrics and monthly buckets over records and sales.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::models::{Farm, ProductionRecord, Sale};

/// Number of monthly buckets the dashboard shows.
pub const DASHBOARD_MONTHS: usize = 6;

/// Round to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Share of birds that died among those that left the flock, in percent.
///
/// Zero when no bird died or was sold.
pub fn mortality_rate(birds_died: u64, birds_sold: u64) -> f64 {
    let total = birds_died.saturating_add(birds_sold);
    if total == 0 {
        return 0.0;
    }
    round2(birds_died as f64 / total as f64 * 100.0)
}

/// Net profit as a percentage of revenue; zero without revenue.
pub fn profit_margin(revenue: f64, expenses: f64) -> f64 {
    if revenue > 0.0 {
        (revenue - expenses) / revenue * 100.0
    } else {
        0.0
    }
}

/// Counts come straight from server JSON; clamp instead of overflowing.
fn saturating_sum(values: impl Iterator<Item = u64>) -> u64 {
    values.fold(0, u64::saturating_add)
}

/// Aggregate figures across all farms.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_farms: usize,
    pub active_farms: usize,
    pub total_revenue: f64,
    pub total_eggs: u64,
    pub total_feed_kg: f64,
    pub total_expenses: f64,
    pub birds_died: u64,
    pub birds_sold: u64,
    pub mortality_rate: f64,
    pub net_profit: f64,
    pub profit_margin: f64,
    /// Eggs collected per kilogram of feed
    pub eggs_per_kg: f64,
}

impl DashboardMetrics {
    pub fn compute(farms: &[Farm], records: &[ProductionRecord], sales: &[Sale]) -> Self {
        let total_revenue: f64 = sales.iter().map(Sale::revenue_or_derived).sum();
        let total_eggs = saturating_sum(records.iter().map(|r| r.eggs_collected));
        let total_feed_kg: f64 = records.iter().map(|r| r.feed_used_kg).sum();
        let total_expenses: f64 = records.iter().map(|r| r.expenses).sum();
        let birds_died = saturating_sum(records.iter().map(|r| r.birds_died));
        let birds_sold = saturating_sum(records.iter().map(|r| r.birds_sold));

        let eggs_per_kg = if total_feed_kg > 0.0 {
            total_eggs as f64 / total_feed_kg
        } else {
            0.0
        };

        Self {
            total_farms: farms.len(),
            active_farms: farms.iter().filter(|f| f.is_active).count(),
            total_revenue,
            total_eggs,
            total_feed_kg,
            total_expenses,
            birds_died,
            birds_sold,
            mortality_rate: mortality_rate(birds_died, birds_sold),
            net_profit: total_revenue - total_expenses,
            profit_margin: profit_margin(total_revenue, total_expenses),
            eggs_per_kg,
        }
    }
}

/// Revenue and expenses of one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBucket {
    pub year: i32,
    pub month: u32,
    pub revenue: f64,
    pub expenses: f64,
}

impl MonthlyBucket {
    fn empty(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            revenue: 0.0,
            expenses: 0.0,
        }
    }

    pub fn profit(&self) -> f64 {
        self.revenue - self.expenses
    }

    /// Sortable `YYYY-MM` key.
    pub fn key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// Short label such as `Mar 2024`.
    pub fn label(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%b %Y").to_string())
            .unwrap_or_else(|| self.key())
    }
}

/// Bucket sales revenue and record expenses by calendar month, most recent
/// first, keeping at most `limit` months when given. Entries without a date
/// are skipped.
pub fn monthly_buckets(
    records: &[ProductionRecord],
    sales: &[Sale],
    limit: Option<usize>,
) -> Vec<MonthlyBucket> {
    let mut months: BTreeMap<(i32, u32), MonthlyBucket> = BTreeMap::new();

    for sale in sales {
        let Some(date) = sale.date else { continue };
        months
            .entry((date.year(), date.month()))
            .or_insert_with(|| MonthlyBucket::empty(date.year(), date.month()))
            .revenue += sale.revenue_or_derived();
    }

    for record in records {
        let Some(date) = record.date else { continue };
        months
            .entry((date.year(), date.month()))
            .or_insert_with(|| MonthlyBucket::empty(date.year(), date.month()))
            .expenses += record.expenses;
    }

    let newest_first = months.into_values().rev();
    match limit {
        Some(limit) => newest_first.take(limit).collect(),
        None => newest_first.collect(),
    }
}
