//! Data models for the FarmTrack API.
//!
//! These mirror the JSON the API speaks (camelCase) and carry the presence and
//! range checks that run before a request is sent.

pub mod date;
mod farm;
mod record;
mod reminder;
mod sale;
mod user;

pub use farm::*;
pub use record::*;
pub use reminder::*;
pub use sale::*;
pub use user::*;

use crate::errors::{ClientError, FieldError};

/// Entity id from the `id` key, else the Mongo `_id` key; blank counts as absent.
pub(crate) fn resolve_id<'a>(id: &'a Option<String>, mongo_id: &'a Option<String>) -> &'a str {
    let present = |v: &'a Option<String>| v.as_deref().map(str::trim).filter(|s| !s.is_empty());
    present(id).or_else(|| present(mongo_id)).unwrap_or("")
}

/// Turn collected field errors into a `Validation` error.
pub(crate) fn ensure_valid(errors: Vec<FieldError>) -> Result<(), ClientError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ClientError::Validation(errors))
    }
}
