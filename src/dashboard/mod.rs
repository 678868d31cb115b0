//! Dashboard aggregation.
//!
//! Loads the farm list, then every farm's records and sales concurrently.
//! Each per-farm fetch settles into a [`FarmFetch`]; a 404 counts as "no
//! data", any other failure becomes a [`Notice`] while the remaining farms
//! still contribute. Results are merged in farm-list order.

mod metrics;

pub use metrics::*;

use serde::Serialize;
use tokio::task::JoinSet;

use crate::api::messages;
use crate::client::ApiClient;
use crate::errors::{ClientError, ClientResult};
use crate::models::{Farm, ProductionRecord, Sale};

/// Outcome of one per-farm list request.
#[derive(Debug)]
pub enum FarmFetch<T> {
    Loaded(Vec<T>),
    /// The server answered 404: the farm has no such collection yet.
    Missing,
    Failed(ClientError),
}

impl<T> FarmFetch<T> {
    pub fn from_result(result: ClientResult<Vec<T>>) -> Self {
        match result {
            Ok(items) => FarmFetch::Loaded(items),
            Err(e) if e.is_not_found() => FarmFetch::Missing,
            Err(e) => FarmFetch::Failed(e),
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            FarmFetch::Loaded(items) => items,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&ClientError> {
        match self {
            FarmFetch::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// A user-visible message produced by a non-fatal failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farm_id: Option<String>,
    pub message: String,
}

/// Records and sales of one farm.
#[derive(Debug)]
pub struct FarmData {
    pub farm_id: String,
    pub records: FarmFetch<ProductionRecord>,
    pub sales: FarmFetch<Sale>,
}

/// Everything the dashboard view renders.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub farms: Vec<Farm>,
    pub records: Vec<ProductionRecord>,
    pub sales: Vec<Sale>,
    pub metrics: DashboardMetrics,
    pub monthly: Vec<MonthlyBucket>,
    pub notices: Vec<Notice>,
}

impl Dashboard {
    /// Assemble the dashboard from the farm list and settled per-farm fetches.
    pub fn from_parts(farms: Vec<Farm>, per_farm: Vec<FarmData>, mut notices: Vec<Notice>) -> Self {
        let mut records = Vec::new();
        let mut sales = Vec::new();

        for data in per_farm {
            for (what, error) in [("records", data.records.error()), ("sales", data.sales.error())] {
                if let Some(e) = error {
                    tracing::warn!("{} fetch failed for farm {}: {}", what, data.farm_id, e);
                    notices.push(Notice {
                        farm_id: Some(data.farm_id.clone()),
                        message: e.user_message(messages::FETCH_DASHBOARD),
                    });
                }
            }
            if let FarmFetch::Loaded(items) = data.records {
                records.extend(items);
            }
            if let FarmFetch::Loaded(items) = data.sales {
                sales.extend(items);
            }
        }

        let metrics = DashboardMetrics::compute(&farms, &records, &sales);
        let monthly = monthly_buckets(&records, &sales, Some(DASHBOARD_MONTHS));

        Self {
            farms,
            records,
            sales,
            metrics,
            monthly,
            notices,
        }
    }

    /// Load the dashboard for the signed-in user. Fails only when nobody is
    /// signed in; fetch failures degrade into notices.
    pub async fn load(client: &ApiClient) -> ClientResult<Self> {
        if client.session().user().await.is_none() {
            return Err(ClientError::Unauthorized("Not signed in".to_string()));
        }

        let mut notices = Vec::new();
        let farms = match client.list_farms().await {
            Ok(farms) => farms,
            Err(e) if e.is_not_found() => Vec::new(),
            Err(e) => {
                tracing::warn!("Farms fetch failed: {}", e);
                notices.push(Notice {
                    farm_id: None,
                    message: e.user_message(messages::FETCH_DASHBOARD),
                });
                Vec::new()
            }
        };

        let farm_ids: Vec<String> = farms
            .iter()
            .map(|f| f.id().to_string())
            .filter(|id| !id.is_empty())
            .collect();
        let per_farm = fetch_farm_data(client, &farm_ids).await;

        let dashboard = Self::from_parts(farms, per_farm, notices);
        tracing::info!(
            "Dashboard loaded: {} farms, {} records, {} sales, {} notices",
            dashboard.farms.len(),
            dashboard.records.len(),
            dashboard.sales.len(),
            dashboard.notices.len()
        );
        Ok(dashboard)
    }
}

fn unfinished<T>() -> FarmFetch<T> {
    FarmFetch::Failed(ClientError::Network("Request did not complete".to_string()))
}

enum Fetched {
    Records(FarmFetch<ProductionRecord>),
    Sales(FarmFetch<Sale>),
}

/// Fetch records and sales of every farm concurrently, all requests settling
/// independently. The result is in the order of `farm_ids`.
pub async fn fetch_farm_data(client: &ApiClient, farm_ids: &[String]) -> Vec<FarmData> {
    let mut tasks = JoinSet::new();
    for (index, farm_id) in farm_ids.iter().enumerate() {
        let c = client.clone();
        let id = farm_id.clone();
        tasks.spawn(async move {
            (index, Fetched::Records(FarmFetch::from_result(c.list_records(&id).await)))
        });

        let c = client.clone();
        let id = farm_id.clone();
        tasks.spawn(async move {
            (index, Fetched::Sales(FarmFetch::from_result(c.list_sales(&id).await)))
        });
    }

    let mut records: Vec<Option<FarmFetch<ProductionRecord>>> =
        (0..farm_ids.len()).map(|_| None).collect();
    let mut sales: Vec<Option<FarmFetch<Sale>>> = (0..farm_ids.len()).map(|_| None).collect();

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, Fetched::Records(fetch))) => records[index] = Some(fetch),
            Ok((index, Fetched::Sales(fetch))) => sales[index] = Some(fetch),
            Err(e) => tracing::error!("Farm fetch task failed: {}", e),
        }
    }

    farm_ids
        .iter()
        .zip(records.into_iter().zip(sales))
        .map(|(farm_id, (records, sales))| FarmData {
            farm_id: farm_id.clone(),
            records: records.unwrap_or_else(unfinished),
            sales: sales.unwrap_or_else(unfinished),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(farm: &str, eggs: u64) -> ProductionRecord {
        serde_json::from_value(serde_json::json!({
            "id": format!("{}-r", farm), "farmId": farm, "date": "2024-04-02", "eggsCollected": eggs
        }))
        .unwrap()
    }

    #[test]
    fn test_from_result_classifies() {
        assert!(matches!(
            FarmFetch::<u8>::from_result(Ok(vec![1])),
            FarmFetch::Loaded(_)
        ));
        assert!(matches!(
            FarmFetch::<u8>::from_result(Err(ClientError::NotFound("none".into()))),
            FarmFetch::Missing
        ));
        let failed = FarmFetch::<u8>::from_result(Err(ClientError::Api {
            status: 500,
            message: "boom".into(),
        }));
        assert_eq!(failed.error().and_then(|e| e.status()), Some(500));
        assert!(failed.items().is_empty());
    }

    #[test]
    fn test_from_parts_merges_and_reports() {
        let per_farm = vec![
            FarmData {
                farm_id: "a".into(),
                records: FarmFetch::Loaded(vec![record("a", 10)]),
                sales: FarmFetch::Missing,
            },
            FarmData {
                farm_id: "b".into(),
                records: FarmFetch::Failed(ClientError::Api {
                    status: 503,
                    message: "Service unavailable".into(),
                }),
                sales: FarmFetch::Loaded(Vec::new()),
            },
            FarmData {
                farm_id: "c".into(),
                records: FarmFetch::Loaded(vec![record("c", 5)]),
                sales: FarmFetch::Loaded(Vec::new()),
            },
        ];

        let dashboard = Dashboard::from_parts(Vec::new(), per_farm, Vec::new());
        let farms_in_order: Vec<_> = dashboard.records.iter().map(|r| r.farm_id.as_str()).collect();
        assert_eq!(farms_in_order, vec!["a", "c"]);
        assert_eq!(dashboard.metrics.total_eggs, 15);
        assert_eq!(
            dashboard.notices,
            vec![Notice {
                farm_id: Some("b".into()),
                message: "Service unavailable".into(),
            }]
        );
        assert_eq!(dashboard.monthly.len(), 1);
    }
}
