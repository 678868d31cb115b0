//! Production record model: a dated operational log entry for a farm.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::date::calendar_date;
use crate::errors::FieldError;

/// A dated operational log entry (feed, eggs, mortality, expenses).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, rename = "_id", skip_serializing_if = "Option::is_none")]
    mongo_id: Option<String>,
    #[serde(default)]
    pub farm_id: String,
    #[serde(default, with = "calendar_date")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub feed_used_kg: f64,
    #[serde(default)]
    pub eggs_collected: u64,
    #[serde(default)]
    pub birds_died: u64,
    #[serde(default)]
    pub birds_sold: u64,
    #[serde(default)]
    pub expenses: f64,
    /// The API spells this field `mortialityCause`.
    #[serde(
        rename = "mortialityCause",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub mortality_cause: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_info: Option<String>,
}

impl ProductionRecord {
    /// Server id of the record; empty when the server sent neither `id` nor `_id`.
    pub fn id(&self) -> &str {
        super::resolve_id(&self.id, &self.mongo_id)
    }
}

/// Request body for creating (POST) or replacing (PUT) a record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordRequest {
    pub farm_id: String,
    #[serde(with = "calendar_date")]
    pub date: Option<NaiveDate>,
    pub feed_used_kg: f64,
    pub eggs_collected: u64,
    pub birds_died: u64,
    pub birds_sold: u64,
    pub expenses: f64,
    #[serde(rename = "mortialityCause")]
    pub mortality_cause: Option<String>,
    pub photos: Vec<String>,
    pub notes: Option<String>,
    pub weather_info: Option<String>,
}

impl RecordRequest {
    /// An empty request for the given farm and day.
    pub fn new(farm_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            farm_id: farm_id.into(),
            date: Some(date),
            feed_used_kg: 0.0,
            eggs_collected: 0,
            birds_died: 0,
            birds_sold: 0,
            expenses: 0.0,
            mortality_cause: None,
            photos: Vec::new(),
            notes: None,
            weather_info: None,
        }
    }

    /// Blank optional text becomes `None`, photo URLs are trimmed and empties dropped.
    pub fn normalized(mut self) -> Self {
        self.mortality_cause = non_blank(self.mortality_cause);
        self.notes = non_blank(self.notes);
        self.weather_info = non_blank(self.weather_info);
        self.photos = self
            .photos
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        self
    }

    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.farm_id.trim().is_empty() {
            errors.push(FieldError::new("farmId", "Farm is required"));
        }
        if self.date.is_none() {
            errors.push(FieldError::new("date", "Date is required"));
        }
        if !self.feed_used_kg.is_finite() || self.feed_used_kg < 0.0 {
            errors.push(FieldError::new(
                "feedUsedKg",
                "Feed used must be a non-negative number",
            ));
        }
        if !self.expenses.is_finite() || self.expenses < 0.0 {
            errors.push(FieldError::new(
                "expenses",
                "Expenses must be a non-negative number",
            ));
        }
        errors
    }
}

impl From<&ProductionRecord> for RecordRequest {
    fn from(record: &ProductionRecord) -> Self {
        Self {
            farm_id: record.farm_id.clone(),
            date: record.date,
            feed_used_kg: record.feed_used_kg,
            eggs_collected: record.eggs_collected,
            birds_died: record.birds_died,
            birds_sold: record.birds_sold,
            expenses: record.expenses,
            mortality_cause: record.mortality_cause.clone(),
            photos: record.photos.clone(),
            notes: record.notes.clone(),
            weather_info: record.weather_info.clone(),
        }
    }
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Record list envelope: `{"records": [...]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordList {
    #[serde(alias = "data")]
    pub records: Vec<ProductionRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_decodes_wire_names() {
        let record: ProductionRecord = serde_json::from_str(
            r#"{
                "id": "r1",
                "farmId": "f1",
                "date": "2024-03-09T00:00:00.000Z",
                "feedUsedKg": 12.5,
                "eggsCollected": 340,
                "birdsDied": 2,
                "birdsSold": 10,
                "expenses": 45.0,
                "mortialityCause": "heat",
                "photos": ["a.jpg"]
            }"#,
        )
        .unwrap();
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 3, 9));
        assert_eq!(record.mortality_cause.as_deref(), Some("heat"));
        assert_eq!(record.eggs_collected, 340);
        assert_eq!(record.notes, None);
    }

    #[test]
    fn test_request_serializes_day_and_nulls() {
        let request = RecordRequest {
            notes: Some("   ".into()),
            photos: vec![" a.jpg ".into(), "".into()],
            ..RecordRequest::new("f1", NaiveDate::from_ymd_opt(2024, 3, 9).unwrap())
        }
        .normalized();
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["date"], "2024-03-09");
        assert_eq!(value["notes"], serde_json::Value::Null);
        assert_eq!(value["photos"], serde_json::json!(["a.jpg"]));
        assert!(value.get("mortialityCause").is_some());
    }

    #[test]
    fn test_record_validation() {
        let mut request = RecordRequest::new("", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        request.date = None;
        request.feed_used_kg = -1.0;
        request.expenses = f64::NAN;
        let fields: Vec<_> = request.validate().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["farmId", "date", "feedUsedKg", "expenses"]);
    }
}
