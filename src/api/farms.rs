//! Farm endpoints.

use reqwest::Method;
use serde_json::Value;

use super::{farm_path, farms_path};
use crate::client::ApiClient;
use crate::errors::ClientResult;
use crate::models::{ensure_valid, CreateFarmRequest, Farm, FarmEnvelope, FarmList, UpdateFarmRequest};

impl ApiClient {
    /// GET /api/farms - List all farms of the signed-in user.
    pub async fn list_farms(&self) -> ClientResult<Vec<Farm>> {
        let list: FarmList = self.get(&farms_path()).await?;
        Ok(list.farms)
    }

    /// Farms that have not been deactivated.
    pub async fn list_active_farms(&self) -> ClientResult<Vec<Farm>> {
        let farms = self.list_farms().await?;
        Ok(farms.into_iter().filter(|f| f.is_active).collect())
    }

    /// GET /api/farms/:id - Get a single farm.
    pub async fn get_farm(&self, farm_id: &str) -> ClientResult<Farm> {
        let envelope: FarmEnvelope = self.get(&farm_path(farm_id)).await?;
        Ok(envelope.farm)
    }

    /// POST /api/farms - Create a new farm.
    pub async fn create_farm(&self, request: &CreateFarmRequest) -> ClientResult<()> {
        ensure_valid(request.validate())?;
        self.request_empty(Method::POST, &farms_path(), Some(request))
            .await?;
        tracing::info!("Created farm {}", request.farm_name);
        Ok(())
    }

    /// PUT /api/farms/:id - Update a farm.
    pub async fn update_farm(&self, farm_id: &str, request: &UpdateFarmRequest) -> ClientResult<()> {
        ensure_valid(request.validate())?;
        self.request_empty(Method::PUT, &farm_path(farm_id), Some(request))
            .await
    }

    /// PATCH /api/farms/:id - Soft-deactivate a farm.
    pub async fn deactivate_farm(&self, farm_id: &str) -> ClientResult<()> {
        self.request_empty::<Value>(Method::PATCH, &farm_path(farm_id), None)
            .await?;
        tracing::info!("Deactivated farm {}", farm_id);
        Ok(())
    }

    /// DELETE /api/farms/:id - Delete a farm.
    pub async fn delete_farm(&self, farm_id: &str) -> ClientResult<()> {
        self.delete(&farm_path(farm_id)).await
    }
}
