//! Production record endpoints.

use reqwest::Method;

use super::{farm_child_item_path, farm_child_path};
use crate::client::ApiClient;
use crate::errors::ClientResult;
use crate::models::{ensure_valid, ProductionRecord, RecordList, RecordRequest};

const RECORDS: &str = "records";

impl ApiClient {
    /// GET /api/farms/:id/records - List a farm's records.
    pub async fn list_records(&self, farm_id: &str) -> ClientResult<Vec<ProductionRecord>> {
        let list: RecordList = self.get(&farm_child_path(farm_id, RECORDS)).await?;
        Ok(list.records)
    }

    /// POST /api/farms/:id/records - Create a record for the request's farm.
    pub async fn create_record(&self, request: &RecordRequest) -> ClientResult<()> {
        let request = request.clone().normalized();
        ensure_valid(request.validate())?;
        self.request_empty(
            Method::POST,
            &farm_child_path(&request.farm_id, RECORDS),
            Some(&request),
        )
        .await
    }

    /// PUT /api/farms/:id/records/:recordId - Replace a record.
    pub async fn update_record(&self, record_id: &str, request: &RecordRequest) -> ClientResult<()> {
        let request = request.clone().normalized();
        ensure_valid(request.validate())?;
        self.request_empty(
            Method::PUT,
            &farm_child_item_path(&request.farm_id, RECORDS, record_id),
            Some(&request),
        )
        .await
    }

    /// DELETE /api/farms/:id/records/:recordId - Delete a record.
    pub async fn delete_record(&self, farm_id: &str, record_id: &str) -> ClientResult<()> {
        self.delete(&farm_child_item_path(farm_id, RECORDS, record_id))
            .await
    }
}
