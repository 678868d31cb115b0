//! FarmTrack client
//!
//! A typed client for the FarmTrack poultry-farm REST API: authenticated
//! requests with a single refresh-and-retry on 401, persisted sessions,
//! per-entity CRUD endpoints, and dashboard and financial aggregation.

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod financials;
pub mod models;
pub mod session;

pub use client::ApiClient;
pub use config::Config;
pub use errors::{ClientError, ClientResult};
pub use session::{Session, SessionHandle, SessionStore};
