use std::num::ParseFloatError;

use serde::{Deserialize, Serialize};

/// One row of the inventory table.
///
/// Everything but `id` falls back to a default when the stored row lacks it, so
/// rows written by older tooling still decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub created_dt: String,
    #[serde(default)]
    pub last_updated_dt: String,
}

/// Filters of the default listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dt_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dt_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Filters of the extended listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdditionalInventoryFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dt_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dt_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<ItemFilters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Empty, or exactly `[low, high]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<Vec<NumberInput>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<NumberInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<NumberInput>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SortRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
}

/// A number as it arrives from a form or JSON body: either a number or text
/// that should hold one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    Number(f64),
    Text(String),
}

impl NumberInput {
    /// `Ok(None)` for blank text.
    pub fn value(&self) -> Result<Option<f64>, ParseFloatError> {
        match self {
            NumberInput::Number(value) => Ok(Some(*value)),
            NumberInput::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return Ok(None);
                }
                text.parse::<f64>().map(Some)
            }
        }
    }
}

impl From<f64> for NumberInput {
    fn from(value: f64) -> Self {
        NumberInput::Number(value)
    }
}

impl From<i64> for NumberInput {
    fn from(value: i64) -> Self {
        NumberInput::Number(value as f64)
    }
}

impl From<&str> for NumberInput {
    fn from(value: &str) -> Self {
        NumberInput::Text(value.to_string())
    }
}

/// Partial update of an item. Only the fields that are set are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_dt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated_dt: Option<String>,
}

impl ItemChanges {
    pub fn is_empty(&self) -> bool {
        self == &ItemChanges::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryData {
    pub items: Vec<InventoryItem>,
    /// Sum of `price` over `items` only.
    pub total_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Result of a bulk clear or populate run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkSummary {
    pub processed: usize,
}

/// Envelope every action returns: an HTTP-style status, a short message and an
/// optional payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ActionResponse<T> {
    pub status: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ActionResponse<T> {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_input_accepts_numbers_and_numeric_text() {
        assert_eq!(NumberInput::from(3.5).value(), Ok(Some(3.5)));
        assert_eq!(NumberInput::from(" 10 ").value(), Ok(Some(10.0)));
        assert_eq!(NumberInput::from("").value(), Ok(None));
        assert!(NumberInput::from("ten").value().is_err());
    }

    #[test]
    fn filters_deserialize_from_wire_shape() {
        let filters: AdditionalInventoryFilters = serde_json::from_value(serde_json::json!({
            "dt_from": "2024-01-01",
            "filters": { "name": "Fake", "price_range": [1, "3"] },
            "pagination": { "page": "", "limit": 10 },
            "sort": { "field": "price", "order": "desc" }
        }))
        .unwrap();

        let item_filters = filters.filters.unwrap();
        assert_eq!(
            item_filters.price_range,
            Some(vec![NumberInput::Number(1.0), NumberInput::Text("3".into())])
        );
        let pagination = filters.pagination.unwrap();
        assert_eq!(pagination.page, Some(NumberInput::Text(String::new())));
        assert_eq!(pagination.limit, Some(NumberInput::Number(10.0)));
    }

    #[test]
    fn response_omits_missing_data() {
        let response: ActionResponse<InventoryItem> = ActionResponse {
            status: 404,
            message: "[get_item] Not Found".to_string(),
            data: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("data").is_none());
        assert!(!response.is_success());
    }

    #[test]
    fn item_changes_serialize_only_set_fields() {
        let changes = ItemChanges {
            price: Some(4.0),
            ..ItemChanges::default()
        };
        let json = serde_json::to_value(&changes).unwrap();
        assert_eq!(json, serde_json::json!({ "price": 4.0 }));
        assert!(ItemChanges::default().is_empty());
        assert!(!changes.is_empty());
    }
}
