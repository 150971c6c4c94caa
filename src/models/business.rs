use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::deserialize_optional_field;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Business {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub industry_type: Option<String>,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BusinessUser {
    pub id: Uuid,
    pub business_id: Uuid,
    pub admin_user_id: Uuid,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateBusinessRequest {
    pub name: String,
    pub address: Option<String>,
    pub industry_type: Option<String>,
    pub logo_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBusinessRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_field")]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_optional_field")]
    pub industry_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_optional_field")]
    pub logo_url: Option<Option<String>>,
}

#[derive(Debug, Deserialize)]
pub struct AssignUserRequest {
    pub admin_user_id: Uuid,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAssignmentRequest {
    pub role: Option<String>,
}

/// Business detail view embedding its assignment rows.
#[derive(Debug, Serialize)]
pub struct BusinessDetail {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub industry_type: Option<String>,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub business_users: Vec<BusinessUser>,
}

impl BusinessDetail {
    pub fn new(business: Business, business_users: Vec<BusinessUser>) -> Self {
        Self {
            id: business.id,
            organization_id: business.organization_id,
            name: business.name,
            address: business.address,
            industry_type: business.industry_type,
            logo_url: business.logo_url,
            created_at: business.created_at,
            updated_at: business.updated_at,
            business_users,
        }
    }
}

/// Row of the business roster view: one assigned user plus their
/// assignment id and business-level role.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct BusinessMember {
    pub id: Uuid,
    pub assignment_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: String,
}
