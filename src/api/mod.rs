//! FarmTrack REST endpoints.
//!
//! Each submodule adds typed methods to [`ApiClient`](crate::client::ApiClient)
//! for one resource. List responses are decoded through one envelope type per
//! resource; a body that matches no envelope is a decode error, not a guess.

mod auth;
mod farms;
mod records;
mod reminders;
mod sales;

/// Generic messages shown when the server gives no usable error text.
pub mod messages {
    pub const FETCH_FARMS: &str = "Failed to fetch farms";
    pub const SAVE_FARM: &str = "Failed to update farm";
    pub const DEACTIVATE_FARM: &str = "Failed to deactivate farm";
    pub const DELETE_FARM: &str = "Failed to delete farm";
    pub const FETCH_RECORDS: &str = "Failed to fetch records";
    pub const SAVE_RECORD: &str = "Failed to save record";
    pub const DELETE_RECORD: &str = "Failed to delete record";
    pub const FETCH_SALES: &str = "Failed to fetch sales";
    pub const SAVE_SALE: &str = "Failed to save sale";
    pub const DELETE_SALE: &str = "Failed to delete sale";
    pub const FETCH_REMINDERS: &str = "Failed to fetch reminders";
    pub const SAVE_REMINDER: &str = "Failed to save reminder";
    pub const DELETE_REMINDER: &str = "Failed to delete reminder";
    pub const FETCH_DASHBOARD: &str = "Failed to load dashboard data";
    pub const FETCH_FINANCIALS: &str = "Failed to fetch financial data";
}

pub(crate) fn farms_path() -> String {
    "/api/farms".to_string()
}

pub(crate) fn farm_path(farm_id: &str) -> String {
    format!("/api/farms/{}", farm_id)
}

pub(crate) fn farm_child_path(farm_id: &str, collection: &str) -> String {
    format!("/api/farms/{}/{}", farm_id, collection)
}

pub(crate) fn farm_child_item_path(farm_id: &str, collection: &str, item_id: &str) -> String {
    format!("/api/farms/{}/{}/{}", farm_id, collection, item_id)
}
