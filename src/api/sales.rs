//! Sale endpoints.

use reqwest::Method;

use super::{farm_child_item_path, farm_child_path};
use crate::client::ApiClient;
use crate::errors::ClientResult;
use crate::models::{ensure_valid, Sale, SaleList, SaleRequest};

const SALES: &str = "sales";

impl ApiClient {
    /// GET /api/farms/:id/sales - List a farm's sales.
    pub async fn list_sales(&self, farm_id: &str) -> ClientResult<Vec<Sale>> {
        let list: SaleList = self.get(&farm_child_path(farm_id, SALES)).await?;
        Ok(list.data)
    }

    /// POST /api/farms/:id/sales - Record a sale.
    pub async fn create_sale(&self, farm_id: &str, request: &SaleRequest) -> ClientResult<()> {
        let request = request.clone().normalized();
        ensure_valid(request.validate())?;
        self.request_empty(Method::POST, &farm_child_path(farm_id, SALES), Some(&request))
            .await
    }

    /// PATCH /api/farms/:id/sales/:saleId - Update a sale.
    pub async fn update_sale(&self, farm_id: &str, sale_id: &str, request: &SaleRequest) -> ClientResult<()> {
        let request = request.clone().normalized();
        ensure_valid(request.validate())?;
        self.request_empty(
            Method::PATCH,
            &farm_child_item_path(farm_id, SALES, sale_id),
            Some(&request),
        )
        .await
    }

    /// DELETE /api/farms/:id/sales/:saleId - Delete a sale.
    pub async fn delete_sale(&self, farm_id: &str, sale_id: &str) -> ClientResult<()> {
        self.delete(&farm_child_item_path(farm_id, SALES, sale_id))
            .await
    }
}
