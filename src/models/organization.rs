use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::deserialize_optional_field;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub industry_type: Option<String>,
    pub logo_url: Option<String>,
    pub billing_plan: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrganizationRequest {
    pub name: String,
    pub address: Option<String>,
    pub industry_type: Option<String>,
    pub logo_url: Option<String>,
    pub billing_plan: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrganizationRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_field")]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_optional_field")]
    pub industry_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_optional_field")]
    pub logo_url: Option<Option<String>>,
    pub billing_plan: Option<String>,
}
