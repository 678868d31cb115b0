//! Farm model matching the FarmTrack API farm resource.

use serde::{Deserialize, Serialize};

use crate::errors::FieldError;

/// A managed poultry production unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Farm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, rename = "_id", skip_serializing_if = "Option::is_none")]
    mongo_id: Option<String>,
    #[serde(alias = "name", default)]
    pub farm_name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farm_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

impl Farm {
    /// Server id of the farm; empty when the server sent neither `id` nor `_id`.
    pub fn id(&self) -> &str {
        super::resolve_id(&self.id, &self.mongo_id)
    }
}

/// Request body for creating a new farm.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFarmRequest {
    pub farm_name: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farm_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request body for updating a farm (PUT replaces the editable fields).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFarmRequest {
    pub farm_name: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farm_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&Farm> for UpdateFarmRequest {
    fn from(farm: &Farm) -> Self {
        Self {
            farm_name: farm.farm_name.clone(),
            location: farm.location.clone(),
            size: farm.size,
            farm_type: farm.farm_type.clone(),
            description: farm.description.clone(),
        }
    }
}

fn check_farm_fields(name: &str, location: &str, size: Option<f64>) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if name.trim().is_empty() {
        errors.push(FieldError::new("farmName", "Farm name is required"));
    }
    if location.trim().is_empty() {
        errors.push(FieldError::new("location", "Location is required"));
    }
    if let Some(size) = size {
        if !size.is_finite() || size < 0.0 {
            errors.push(FieldError::new("size", "Size must be a non-negative number"));
        }
    }
    errors
}

impl CreateFarmRequest {
    pub fn validate(&self) -> Vec<FieldError> {
        check_farm_fields(&self.farm_name, &self.location, self.size)
    }
}

impl UpdateFarmRequest {
    pub fn validate(&self) -> Vec<FieldError> {
        check_farm_fields(&self.farm_name, &self.location, self.size)
    }
}

/// Farm list envelope: `{"farms": [...]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct FarmList {
    #[serde(alias = "data")]
    pub farms: Vec<Farm>,
}

/// Single farm envelope: `{"farm": {...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct FarmEnvelope {
    #[serde(alias = "data")]
    pub farm: Farm,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_farm_accepts_mongo_id_and_name_alias() {
        let farm: Farm = serde_json::from_str(
            r#"{"_id":"f1","name":"Sunrise","location":"Nakuru","isActive":true}"#,
        )
        .unwrap();
        assert_eq!(farm.id(), "f1");
        assert_eq!(farm.farm_name, "Sunrise");
        assert!(farm.is_active);
        assert_eq!(farm.size, None);
    }

    #[test]
    fn test_farm_with_both_id_keys() {
        let list: FarmList = serde_json::from_str(
            r#"{"farms":[{"_id":"m1","id":"v1","farmName":"A","location":"X"},{"farmName":"B"},{"id":" ","_id":"m3"}]}"#,
        )
        .unwrap();
        let ids: Vec<_> = list.farms.iter().map(Farm::id).collect();
        assert_eq!(ids, vec!["v1", "", "m3"]);
    }

    #[test]
    fn test_farm_list_envelope() {
        let list: FarmList = serde_json::from_str(
            r#"{"farms":[{"id":"a","farmName":"A","location":"X","isActive":false}]}"#,
        )
        .unwrap();
        assert_eq!(list.farms.len(), 1);
        assert!(!list.farms[0].is_active);

        let bare = serde_json::from_str::<FarmList>(r#"[{"id":"a"}]"#);
        assert!(bare.is_err());
    }

    #[test]
    fn test_create_farm_validation() {
        let request = CreateFarmRequest {
            farm_name: "  ".into(),
            location: "Eldoret".into(),
            size: Some(-2.0),
            farm_type: None,
            description: None,
        };
        let errors = request.validate();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["farmName", "size"]);
    }
}
