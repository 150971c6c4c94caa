use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::authz::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::organization::*;
use crate::models::BillingPlan;
use crate::AppState;

pub async fn create_organization(
    State(state): State<AppState>,
    Json(body): Json<CreateOrganizationRequest>,
) -> AppResult<(StatusCode, Json<Organization>)> {
    if body.name.is_empty() {
        return Err(AppError::BadRequest("Organization name required".into()));
    }

    let plan: BillingPlan = match body.billing_plan.as_deref() {
        Some(p) => p.parse().map_err(|_| {
            AppError::BadRequest("Invalid billing plan. Must be free, basic, or pro".into())
        })?,
        None => BillingPlan::Free,
    };

    let organization: Organization = sqlx::query_as(
        "INSERT INTO organizations (name, address, industry_type, logo_url, billing_plan) VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(&body.name)
    .bind(&body.address)
    .bind(&body.industry_type)
    .bind(&body.logo_url)
    .bind(plan.as_str())
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(organization)))
}

/// The listing collapses to the actor's own organization.
pub async fn list_organizations(
    State(state): State<AppState>,
    actor: axum::Extension<AuthUser>,
) -> AppResult<Json<Vec<Organization>>> {
    let organizations: Vec<Organization> =
        sqlx::query_as("SELECT * FROM organizations WHERE id = $1")
            .bind(actor.organization_id)
            .fetch_all(&state.db)
            .await?;

    Ok(Json(organizations))
}

pub async fn get_organization(
    State(state): State<AppState>,
    actor: axum::Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Organization>> {
    // Foreign organizations are indistinguishable from absent ones.
    if id != actor.organization_id {
        return Err(AppError::NotFound("Organization not found".into()));
    }

    let organization: Organization = sqlx::query_as("SELECT * FROM organizations WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Organization not found".into()))?;

    Ok(Json(organization))
}

pub async fn update_organization(
    State(state): State<AppState>,
    actor: axum::Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateOrganizationRequest>,
) -> AppResult<Json<Organization>> {
    if id != actor.organization_id {
        return Err(AppError::NotFound("Organization not found".into()));
    }

    let mut updates: Vec<String> = Vec::new();
    let mut params: Vec<Option<String>> = Vec::new();

    if let Some(ref name) = body.name {
        updates.push(format!("name = ${}", params.len() + 2));
        params.push(Some(name.clone()));
    }
    if let Some(ref address) = body.address {
        updates.push(format!("address = ${}", params.len() + 2));
        params.push(address.clone());
    }
    if let Some(ref industry) = body.industry_type {
        updates.push(format!("industry_type = ${}", params.len() + 2));
        params.push(industry.clone());
    }
    if let Some(ref logo) = body.logo_url {
        updates.push(format!("logo_url = ${}", params.len() + 2));
        params.push(logo.clone());
    }
    if let Some(ref plan) = body.billing_plan {
        let plan: BillingPlan = plan.parse().map_err(|_| {
            AppError::BadRequest("Invalid billing plan. Must be free, basic, or pro".into())
        })?;
        updates.push(format!("billing_plan = ${}", params.len() + 2));
        params.push(Some(plan.as_str().to_string()));
    }

    if updates.is_empty() {
        let organization: Organization =
            sqlx::query_as("SELECT * FROM organizations WHERE id = $1")
                .bind(id)
                .fetch_optional(&state.db)
                .await?
                .ok_or_else(|| AppError::NotFound("Organization not found".into()))?;
        return Ok(Json(organization));
    }

    updates.push("updated_at = NOW()".to_string());

    let sql = format!(
        "UPDATE organizations SET {} WHERE id = $1 RETURNING *",
        updates.join(", ")
    );

    let mut query = sqlx::query_as::<_, Organization>(&sql).bind(id);
    for p in &params {
        query = query.bind(p);
    }

    let organization = query
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Organization not found".into()))?;

    Ok(Json(organization))
}
