//! Sale model: a dated transaction of farm output.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::date::calendar_date;
use super::record::non_blank;
use crate::errors::FieldError;

/// A dated sale with quantity, unit price and (usually) server-computed revenue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, rename = "_id", skip_serializing_if = "Option::is_none")]
    mongo_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farm_id: Option<String>,
    #[serde(default, with = "calendar_date")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Sale {
    /// Server id of the sale; empty when the server sent neither `id` nor `_id`.
    pub fn id(&self) -> &str {
        super::resolve_id(&self.id, &self.mongo_id)
    }

    /// Revenue as reported, or quantity × unit price when the server omitted it.
    pub fn revenue_or_derived(&self) -> f64 {
        self.revenue.unwrap_or(self.quantity * self.unit_price)
    }
}

/// Request body for creating (POST) or updating (PATCH) a sale.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRequest {
    pub product: String,
    pub quantity: u64,
    pub unit_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_name: Option<String>,
    #[serde(with = "calendar_date")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl SaleRequest {
    pub fn normalized(mut self) -> Self {
        self.buyer_name = non_blank(self.buyer_name);
        self.notes = non_blank(self.notes);
        self
    }

    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.product.trim().is_empty() {
            errors.push(FieldError::new("product", "Product is required"));
        }
        if self.quantity == 0 {
            errors.push(FieldError::new(
                "quantity",
                "Quantity must be a positive integer",
            ));
        }
        if !self.unit_price.is_finite() || self.unit_price < 0.0 {
            errors.push(FieldError::new(
                "unitPrice",
                "Unit price must be a non-negative number",
            ));
        }
        if self.date.is_none() {
            errors.push(FieldError::new("date", "Date is required"));
        }
        errors
    }
}

/// Sale list envelope: `{"data": [...]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct SaleList {
    #[serde(alias = "sales")]
    pub data: Vec<Sale>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sale(revenue: Option<f64>) -> Sale {
        Sale {
            id: Some("s1".into()),
            mongo_id: None,
            farm_id: None,
            date: None,
            product: "Eggs (tray)".into(),
            quantity: 4.0,
            unit_price: 2.5,
            revenue,
            buyer_name: None,
            notes: None,
        }
    }

    #[test]
    fn test_revenue_fallback() {
        assert_eq!(sale(Some(12.0)).revenue_or_derived(), 12.0);
        assert_eq!(sale(None).revenue_or_derived(), 10.0);
    }

    #[test]
    fn test_sale_list_accepts_both_keys() {
        let a: SaleList = serde_json::from_str(r#"{"data":[{"id":"1"}]}"#).unwrap();
        let b: SaleList = serde_json::from_str(r#"{"sales":[{"id":"2"}]}"#).unwrap();
        assert_eq!(a.data[0].id(), "1");
        assert_eq!(b.data[0].id(), "2");
    }

    #[test]
    fn test_sale_validation() {
        let request = SaleRequest {
            product: "".into(),
            quantity: 0,
            unit_price: -1.0,
            buyer_name: Some("  ".into()),
            date: None,
            notes: None,
        };
        let fields: Vec<_> = request.validate().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["product", "quantity", "unitPrice", "date"]);
        assert_eq!(request.normalized().buyer_name, None);
    }
}
