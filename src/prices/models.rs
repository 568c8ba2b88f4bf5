use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A price record as stored
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Price {
    pub id: Uuid,
    pub schedule_id: String,
    pub price_value: Decimal,
    pub price_currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for POST /prices and PUT /prices/{id}
///
/// Timestamps are optional; the service fills in defaults.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceRequest {
    #[validate(length(min = 1, max = 64, message = "Schedule id must be between 1 and 64 characters"))]
    #[schema(example = "s1")]
    pub schedule_id: String,
    #[serde(deserialize_with = "decimal_from_json_number")]
    #[validate(custom = "crate::validation::validate_price_value")]
    #[schema(value_type = f64, example = 10.5)]
    pub price_value: Decimal,
    #[validate(custom = "crate::validation::validate_currency_code")]
    #[schema(example = "USD")]
    pub price_currency: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Reads a JSON number into a `Decimal`; strings such as `"10"` are rejected
fn decimal_from_json_number<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    let text = number.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| de::Error::custom(format!("price value {} is out of range", text)))
}

/// The mutable fields of a price, as handed to the service
#[derive(Debug, Clone, PartialEq)]
pub struct PriceFields {
    pub schedule_id: String,
    pub price_value: Decimal,
    pub price_currency: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<PriceRequest> for PriceFields {
    fn from(request: PriceRequest) -> Self {
        Self {
            schedule_id: request.schedule_id,
            price_value: request.price_value,
            price_currency: request.price_currency,
            created_at: request.created_at,
            updated_at: request.updated_at,
        }
    }
}

/// Full replacement of a stored price's fields
///
/// An absent `created_at` keeps the stored value.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceUpdate {
    pub id: Uuid,
    pub fields: PriceFields,
}

/// Public JSON shape of a price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceResponse {
    pub id: Uuid,
    #[schema(example = "s1")]
    pub schedule_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 10.5)]
    pub price_value: Decimal,
    #[schema(example = "USD")]
    pub price_currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Price> for PriceResponse {
    fn from(price: Price) -> Self {
        Self {
            id: price.id,
            schedule_id: price.schedule_id,
            price_value: price.price_value,
            price_currency: price.price_currency,
            created_at: price.created_at,
            updated_at: price.updated_at,
        }
    }
}

/// Body of the DELETE acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "PRICE_DELETED")]
    pub code: String,
    #[schema(example = "The PRICE has been deleted")]
    pub msg: String,
}

impl MessageResponse {
    pub fn deleted() -> Self {
        Self {
            code: "PRICE_DELETED".to_string(),
            msg: "The PRICE has been deleted".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_price() -> Price {
        let now = Utc::now();
        Price {
            id: Uuid::new_v4(),
            schedule_id: "s1".to_string(),
            price_value: dec!(10.5),
            price_currency: "USD".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_price_response_uses_camel_case_and_numeric_value() {
        let price = sample_price();
        let id = price.id;

        let json = serde_json::to_value(PriceResponse::from(price))
            .expect("Failed to serialize PriceResponse");

        assert_eq!(json["id"], serde_json::json!(id.to_string()));
        assert_eq!(json["scheduleId"], "s1");
        assert_eq!(json["priceValue"], serde_json::json!(10.5));
        assert_eq!(json["priceCurrency"], "USD");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("schedule_id").is_none());
    }

    #[test]
    fn test_price_request_deserialization() {
        let json = r#"{
            "scheduleId": "s1",
            "priceValue": 10,
            "priceCurrency": "USD",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        }"#;

        let request: PriceRequest =
            serde_json::from_str(json).expect("Failed to deserialize PriceRequest");

        assert_eq!(request.schedule_id, "s1");
        assert_eq!(request.price_value, dec!(10));
        assert_eq!(request.price_currency, "USD");
        assert!(request.created_at.is_some());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_price_request_timestamps_are_optional() {
        let json = r#"{"scheduleId": "s1", "priceValue": 3.25, "priceCurrency": "EUR"}"#;

        let request: PriceRequest =
            serde_json::from_str(json).expect("Failed to deserialize PriceRequest");
        let fields = PriceFields::from(request);

        assert_eq!(fields.price_value, dec!(3.25));
        assert_eq!(fields.created_at, None);
        assert_eq!(fields.updated_at, None);
    }

    #[test]
    fn test_price_request_rejects_string_price_value() {
        let json = r#"{"scheduleId": "s1", "priceValue": "10", "priceCurrency": "USD"}"#;

        let result: Result<PriceRequest, _> = serde_json::from_str(json);

        assert!(result.is_err());
    }

    #[test]
    fn test_price_request_rejects_oversized_price_value() {
        let json = r#"{"scheduleId": "s1", "priceValue": 123456789012.12, "priceCurrency": "USD"}"#;

        let request: PriceRequest =
            serde_json::from_str(json).expect("Failed to deserialize PriceRequest");

        assert!(request.validate().is_err());
    }

    #[test]
    fn test_price_request_validation_failures() {
        let json = r#"{"scheduleId": "", "priceValue": -1, "priceCurrency": "usd"}"#;

        let request: PriceRequest =
            serde_json::from_str(json).expect("Failed to deserialize PriceRequest");
        let errors = request.validate().expect_err("Request should be invalid");

        assert_eq!(errors.field_errors().len(), 3);
    }

    #[test]
    fn test_deleted_message() {
        let json = serde_json::to_value(MessageResponse::deleted()).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"code": "PRICE_DELETED", "msg": "The PRICE has been deleted"})
        );
    }
}
