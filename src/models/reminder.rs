//! Reminder model: a scheduled task entry tied to a farm.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::date::timestamp;
use crate::errors::FieldError;

/// Reminder category. Unknown server values are preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReminderType {
    #[default]
    General,
    Feeding,
    Health,
    Cleaning,
    Procurement,
    Other(String),
}

impl ReminderType {
    pub fn as_str(&self) -> &str {
        match self {
            ReminderType::General => "General",
            ReminderType::Feeding => "Feeding",
            ReminderType::Health => "Health",
            ReminderType::Cleaning => "Cleaning",
            ReminderType::Procurement => "Procurement",
            ReminderType::Other(s) => s,
        }
    }
}

impl From<String> for ReminderType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "General" => ReminderType::General,
            "Feeding" => ReminderType::Feeding,
            "Health" => ReminderType::Health,
            "Cleaning" => ReminderType::Cleaning,
            "Procurement" => ReminderType::Procurement,
            _ => ReminderType::Other(s),
        }
    }
}

impl From<ReminderType> for String {
    fn from(t: ReminderType) -> Self {
        t.as_str().to_string()
    }
}

impl std::str::FromStr for ReminderType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ReminderType::from(s.to_string()))
    }
}

/// A scheduled task entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, rename = "_id", skip_serializing_if = "Option::is_none")]
    mongo_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farm_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub reminder_type: ReminderType,
    #[serde(default, with = "timestamp")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_completed: bool,
}

impl Reminder {
    /// Server id of the reminder; empty when the server sent neither `id` nor `_id`.
    pub fn id(&self) -> &str {
        super::resolve_id(&self.id, &self.mongo_id)
    }

    /// Whether the reminder is still open and its due time has passed.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.is_completed && self.due_date.is_some_and(|due| due < now)
    }
}

/// Request body for creating (POST) or updating (PATCH) a reminder.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderRequest {
    pub title: String,
    #[serde(rename = "type")]
    pub reminder_type: ReminderType,
    #[serde(serialize_with = "serialize_day")]
    pub date: Option<NaiveDate>,
    #[serde(serialize_with = "serialize_time")]
    pub time: Option<NaiveTime>,
    pub is_completed: bool,
}

fn serialize_day<S: serde::Serializer>(v: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
    match v {
        Some(d) => s.serialize_str(&d.format("%Y-%m-%d").to_string()),
        None => s.serialize_str(""),
    }
}

fn serialize_time<S: serde::Serializer>(v: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
    match v {
        Some(t) => s.serialize_str(&t.format("%H:%M").to_string()),
        None => s.serialize_str(""),
    }
}

impl ReminderRequest {
    /// Parse the `HH:MM` time field used by the API.
    pub fn parse_time(raw: &str) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(raw.trim(), "%H:%M").ok()
    }

    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push(FieldError::new("title", "Title is required"));
        }
        if self.date.is_none() {
            errors.push(FieldError::new("date", "Date is required"));
        }
        if self.time.is_none() {
            errors.push(FieldError::new("time", "Time is required"));
        }
        errors
    }
}

impl From<&Reminder> for ReminderRequest {
    fn from(reminder: &Reminder) -> Self {
        Self {
            title: reminder.title.clone(),
            reminder_type: reminder.reminder_type.clone(),
            date: reminder.due_date.map(|d| d.date_naive()),
            time: reminder.due_date.map(|d| d.time()),
            is_completed: reminder.is_completed,
        }
    }
}

/// Reminder list envelope: `{"data": [...]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReminderList {
    #[serde(alias = "reminders")]
    pub data: Vec<Reminder>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reminder_type_round_trips_unknown() {
        let reminder: Reminder = serde_json::from_str(
            r#"{"id":"m1","title":"Vaccinate","type":"Vet","dueDate":"2024-07-01T08:00:00.000Z"}"#,
        )
        .unwrap();
        assert_eq!(reminder.reminder_type, ReminderType::Other("Vet".into()));
        assert!(!reminder.is_completed);
        assert_eq!(serde_json::to_value(&reminder).unwrap()["type"], "Vet");
    }

    #[test]
    fn test_reminder_id_from_either_key() {
        let both: Reminder = serde_json::from_str(r#"{"_id":"m1","id":"m1","title":"Feed"}"#).unwrap();
        assert_eq!(both.id(), "m1");
        let mongo: Reminder = serde_json::from_str(r#"{"_id":"m2","title":"Feed"}"#).unwrap();
        assert_eq!(mongo.id(), "m2");
    }

    #[test]
    fn test_overdue() {
        let reminder: Reminder = serde_json::from_str(
            r#"{"id":"m1","title":"Feed","type":"Feeding","dueDate":"2024-07-01T08:00:00Z"}"#,
        )
        .unwrap();
        let later = "2024-07-02T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert!(reminder.is_overdue(later));

        let done = Reminder {
            is_completed: true,
            ..reminder
        };
        assert!(!done.is_overdue(later));
    }

    #[test]
    fn test_request_from_reminder_splits_due_date() {
        let reminder: Reminder = serde_json::from_str(
            r#"{"id":"m1","title":"Clean coop","type":"Cleaning","dueDate":"2024-07-01T08:30:00Z","isCompleted":true}"#,
        )
        .unwrap();
        let value = serde_json::to_value(ReminderRequest::from(&reminder)).unwrap();
        assert_eq!(value["date"], "2024-07-01");
        assert_eq!(value["time"], "08:30");
        assert_eq!(value["type"], "Cleaning");
        assert_eq!(value["isCompleted"], true);
    }

    #[test]
    fn test_validation_and_time_parse() {
        assert_eq!(
            ReminderRequest::parse_time("07:05"),
            NaiveTime::from_hms_opt(7, 5, 0)
        );
        assert_eq!(ReminderRequest::parse_time("7am"), None);

        let request = ReminderRequest {
            title: " ".into(),
            reminder_type: ReminderType::General,
            date: None,
            time: None,
            is_completed: false,
        };
        let fields: Vec<_> = request.validate().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["title", "date", "time"]);
    }
}
