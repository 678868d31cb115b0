//! Per-farm financial summary over an optional date range.

use chrono::NaiveDate;
use serde::Serialize;

use crate::client::ApiClient;
use crate::dashboard::{monthly_buckets, profit_margin, MonthlyBucket};
use crate::errors::ClientResult;
use crate::models::{ProductionRecord, Sale};

/// Inclusive calendar range; an open end is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub farm_id: String,
    pub income: f64,
    pub expenses: f64,
    pub net_profit: f64,
    pub profit_margin: f64,
    pub sales_count: usize,
    pub records_count: usize,
    /// Every month in range, most recent first
    pub monthly: Vec<MonthlyBucket>,
}

impl FinancialSummary {
    /// Summarise entries dated inside `range`; undated entries are ignored.
    pub fn compute(farm_id: &str, records: &[ProductionRecord], sales: &[Sale], range: DateRange) -> Self {
        let in_range = |date: Option<NaiveDate>| date.is_some_and(|d| range.contains(d));

        let sales: Vec<Sale> = sales.iter().filter(|s| in_range(s.date)).cloned().collect();
        let records: Vec<ProductionRecord> =
            records.iter().filter(|r| in_range(r.date)).cloned().collect();

        let income: f64 = sales.iter().map(Sale::revenue_or_derived).sum();
        let expenses: f64 = records.iter().map(|r| r.expenses).sum();

        Self {
            farm_id: farm_id.to_string(),
            income,
            expenses,
            net_profit: income - expenses,
            profit_margin: profit_margin(income, expenses),
            sales_count: sales.len(),
            records_count: records.len(),
            monthly: monthly_buckets(&records, &sales, None),
        }
    }

    /// Fetch a farm's sales and records together and summarise them. Either
    /// request failing fails the summary.
    pub async fn load(client: &ApiClient, farm_id: &str, range: DateRange) -> ClientResult<Self> {
        let (sales, records) = tokio::try_join!(client.list_sales(farm_id), client.list_records(farm_id))?;
        Ok(Self::compute(farm_id, &records, &sales, range))
    }
}
