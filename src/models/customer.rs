use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::deserialize_optional_field;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Customer {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub business_id: Option<Uuid>,
    pub phone_number: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub points: i32,
    pub visits: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    pub phone_number: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub points: Option<i32>,
    pub visits: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCustomerRequest {
    #[serde(default, deserialize_with = "deserialize_optional_field")]
    pub phone_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_optional_field")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_optional_field")]
    pub email: Option<Option<String>>,
    pub points: Option<i32>,
    pub visits: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct AddPointsRequest {
    pub points: i32,
}

#[derive(Debug, Deserialize)]
pub struct CustomerListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_distinguishes_absent_null_and_value() {
        let absent: UpdateCustomerRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.phone_number, None);

        let null: UpdateCustomerRequest =
            serde_json::from_str(r#"{"phone_number": null}"#).unwrap();
        assert_eq!(null.phone_number, Some(None));

        let value: UpdateCustomerRequest =
            serde_json::from_str(r#"{"phone_number": "+15550100"}"#).unwrap();
        assert_eq!(value.phone_number, Some(Some("+15550100".to_string())));
    }

    #[test]
    fn update_counters_are_two_state() {
        let absent: UpdateCustomerRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.points, None);
        assert_eq!(absent.visits, None);

        let set: UpdateCustomerRequest =
            serde_json::from_str(r#"{"points": 40, "visits": 3}"#).unwrap();
        assert_eq!(set.points, Some(40));
        assert_eq!(set.visits, Some(3));
    }

    #[test]
    fn update_null_counter_reads_as_absent() {
        let null: UpdateCustomerRequest = serde_json::from_str(r#"{"points": null}"#).unwrap();
        assert_eq!(null.points, None);
    }
}
