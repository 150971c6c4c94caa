use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::authz::{self, AuthUser, BusinessScope};
use crate::error::{AppError, AppResult};
use crate::models::business::*;
use crate::models::Role;
use crate::AppState;

/// Inserts a business and its creator's owner assignment in one
/// transaction; a failure of either insert leaves neither row.
pub async fn create_business_with_owner(
    db: &PgPool,
    organization_id: Uuid,
    creator_id: Uuid,
    body: &CreateBusinessRequest,
) -> AppResult<Business> {
    let mut tx = db.begin().await?;

    let business: Business = sqlx::query_as(
        "INSERT INTO businesses (organization_id, name, address, industry_type, logo_url) VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(organization_id)
    .bind(&body.name)
    .bind(&body.address)
    .bind(&body.industry_type)
    .bind(&body.logo_url)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO business_users (business_id, admin_user_id, role) VALUES ($1, $2, 'owner')",
    )
    .bind(business.id)
    .bind(creator_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(business)
}

pub async fn create_business(
    State(state): State<AppState>,
    actor: axum::Extension<AuthUser>,
    Json(body): Json<CreateBusinessRequest>,
) -> AppResult<(StatusCode, Json<Business>)> {
    if body.name.is_empty() {
        return Err(AppError::BadRequest("Business name required".into()));
    }

    let business =
        create_business_with_owner(&state.db, actor.organization_id, actor.id, &body).await?;

    Ok((StatusCode::CREATED, Json(business)))
}

pub async fn list_businesses(
    State(state): State<AppState>,
    actor: axum::Extension<AuthUser>,
) -> AppResult<Json<Vec<Business>>> {
    let businesses: Vec<Business> = match authz::business_scope(&actor) {
        BusinessScope::Organization => {
            sqlx::query_as(
                "SELECT * FROM businesses WHERE organization_id = $1 ORDER BY created_at",
            )
            .bind(actor.organization_id)
            .fetch_all(&state.db)
            .await?
        }
        BusinessScope::AssignedOnly => {
            sqlx::query_as(
                r#"SELECT DISTINCT b.* FROM businesses b
                JOIN business_users bu ON bu.business_id = b.id
                WHERE b.organization_id = $1 AND bu.admin_user_id = $2
                ORDER BY b.created_at"#,
            )
            .bind(actor.organization_id)
            .bind(actor.id)
            .fetch_all(&state.db)
            .await?
        }
    };

    Ok(Json(businesses))
}

pub async fn get_business(
    State(state): State<AppState>,
    actor: axum::Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BusinessDetail>> {
    let business: Business =
        sqlx::query_as("SELECT * FROM businesses WHERE id = $1 AND organization_id = $2")
            .bind(id)
            .bind(actor.organization_id)
            .fetch_optional(&state.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Business not found".into()))?;

    let business_users: Vec<BusinessUser> =
        sqlx::query_as("SELECT * FROM business_users WHERE business_id = $1 ORDER BY created_at")
            .bind(business.id)
            .fetch_all(&state.db)
            .await?;

    Ok(Json(BusinessDetail::new(business, business_users)))
}

pub async fn update_business(
    State(state): State<AppState>,
    actor: axum::Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateBusinessRequest>,
) -> AppResult<Json<Business>> {
    let mut updates: Vec<String> = Vec::new();
    let mut params: Vec<Option<String>> = Vec::new();

    if let Some(ref name) = body.name {
        updates.push(format!("name = ${}", params.len() + 3));
        params.push(Some(name.clone()));
    }
    if let Some(ref address) = body.address {
        updates.push(format!("address = ${}", params.len() + 3));
        params.push(address.clone());
    }
    if let Some(ref industry) = body.industry_type {
        updates.push(format!("industry_type = ${}", params.len() + 3));
        params.push(industry.clone());
    }
    if let Some(ref logo) = body.logo_url {
        updates.push(format!("logo_url = ${}", params.len() + 3));
        params.push(logo.clone());
    }

    if updates.is_empty() {
        let business: Business =
            sqlx::query_as("SELECT * FROM businesses WHERE id = $1 AND organization_id = $2")
                .bind(id)
                .bind(actor.organization_id)
                .fetch_optional(&state.db)
                .await?
                .ok_or_else(|| AppError::NotFound("Business not found".into()))?;
        return Ok(Json(business));
    }

    updates.push("updated_at = NOW()".to_string());

    let sql = format!(
        "UPDATE businesses SET {} WHERE id = $1 AND organization_id = $2 RETURNING *",
        updates.join(", ")
    );

    let mut query = sqlx::query_as::<_, Business>(&sql)
        .bind(id)
        .bind(actor.organization_id);
    for p in &params {
        query = query.bind(p);
    }

    let business = query
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Business not found".into()))?;

    Ok(Json(business))
}

pub async fn delete_business(
    State(state): State<AppState>,
    actor: axum::Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let deleted = sqlx::query("DELETE FROM businesses WHERE id = $1 AND organization_id = $2")
        .bind(id)
        .bind(actor.organization_id)
        .execute(&state.db)
        .await?;

    if deleted.rows_affected() == 0 {
        return Err(AppError::NotFound("Business not found".into()));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn assign_user(
    State(state): State<AppState>,
    actor: axum::Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<AssignUserRequest>,
) -> AppResult<(StatusCode, Json<BusinessUser>)> {
    let role: Role = match body.role.as_deref() {
        Some(r) => r.parse().map_err(|_| {
            AppError::BadRequest("Invalid role. Must be owner, manager, or staff".into())
        })?,
        None => Role::Staff,
    };

    let business_found: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM businesses WHERE id = $1 AND organization_id = $2)",
    )
    .bind(id)
    .bind(actor.organization_id)
    .fetch_one(&state.db)
    .await?;

    if !business_found {
        return Err(AppError::NotFound("Business not found".into()));
    }

    // Target must belong to the business's organization.
    let user_found: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM admin_users WHERE id = $1 AND organization_id = $2)",
    )
    .bind(body.admin_user_id)
    .bind(actor.organization_id)
    .fetch_one(&state.db)
    .await?;

    if !user_found {
        return Err(AppError::NotFound(
            "User not found in your organization".into(),
        ));
    }

    let already_assigned: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM business_users WHERE business_id = $1 AND admin_user_id = $2)",
    )
    .bind(id)
    .bind(body.admin_user_id)
    .fetch_one(&state.db)
    .await?;

    if already_assigned {
        return Err(AppError::BadRequest(
            "User is already assigned to this business".into(),
        ));
    }

    let mut tx = state.db.begin().await?;

    let assignment: BusinessUser = sqlx::query_as(
        "INSERT INTO business_users (business_id, admin_user_id, role) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(id)
    .bind(body.admin_user_id)
    .bind(role.as_str())
    .fetch_one(&mut *tx)
    .await?;

    // Role mirroring: the business-level role is copied onto the user's
    // organization-level role, in the same transaction as the assignment.
    sqlx::query("UPDATE admin_users SET role = $2, updated_at = NOW() WHERE id = $1")
        .bind(body.admin_user_id)
        .bind(role.as_str())
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(assignment)))
}

pub async fn list_business_users(
    State(state): State<AppState>,
    actor: axum::Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<BusinessMember>>> {
    let business_found: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM businesses WHERE id = $1 AND organization_id = $2)",
    )
    .bind(id)
    .bind(actor.organization_id)
    .fetch_one(&state.db)
    .await?;

    if !business_found {
        return Err(AppError::NotFound("Business not found".into()));
    }

    // INNER JOIN drops assignments whose user row is gone.
    let members: Vec<BusinessMember> = sqlx::query_as(
        r#"SELECT au.id AS id, bu.id AS assignment_id, au.email,
            split_part(au.email, '@', 1) AS full_name, bu.role
        FROM business_users bu
        JOIN admin_users au ON au.id = bu.admin_user_id
        WHERE bu.business_id = $1
        ORDER BY bu.created_at"#,
    )
    .bind(id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(members))
}

pub async fn update_assignment(
    State(state): State<AppState>,
    actor: axum::Extension<AuthUser>,
    Path(assignment_id): Path<Uuid>,
    Json(body): Json<UpdateAssignmentRequest>,
) -> AppResult<Json<BusinessUser>> {
    // Assignments are scoped through their business's organization.
    let assignment: BusinessUser = sqlx::query_as(
        r#"SELECT bu.* FROM business_users bu
        JOIN businesses b ON b.id = bu.business_id
        WHERE bu.id = $1 AND b.organization_id = $2"#,
    )
    .bind(assignment_id)
    .bind(actor.organization_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound("Assignment not found".into()))?;

    let role_str = match body.role {
        Some(r) => r,
        None => return Ok(Json(assignment)),
    };
    let role: Role = role_str.parse().map_err(|_| {
        AppError::BadRequest("Invalid role. Must be owner, manager, or staff".into())
    })?;

    let mut tx = state.db.begin().await?;

    let updated: BusinessUser = sqlx::query_as(
        "UPDATE business_users SET role = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(assignment_id)
    .bind(role.as_str())
    .fetch_one(&mut *tx)
    .await?;

    // Mirrors onto the org-level role, same as at assignment time.
    sqlx::query("UPDATE admin_users SET role = $2, updated_at = NOW() WHERE id = $1")
        .bind(assignment.admin_user_id)
        .bind(role.as_str())
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(Json(updated))
}

pub async fn delete_assignment(
    State(state): State<AppState>,
    actor: axum::Extension<AuthUser>,
    Path(assignment_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let deleted = sqlx::query(
        r#"DELETE FROM business_users bu
        USING businesses b
        WHERE bu.id = $1 AND b.id = bu.business_id AND b.organization_id = $2"#,
    )
    .bind(assignment_id)
    .bind(actor.organization_id)
    .execute(&state.db)
    .await?;

    if deleted.rows_affected() == 0 {
        return Err(AppError::NotFound("Assignment not found".into()));
    }

    Ok(StatusCode::NO_CONTENT)
}
