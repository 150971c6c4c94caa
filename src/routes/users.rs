use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::authz::{self, AuthUser};
use crate::error::{AppError, AppResult};
use crate::models::user::*;
use crate::models::Role;
use crate::AppState;

pub async fn list_users(
    State(state): State<AppState>,
    actor: axum::Extension<AuthUser>,
) -> AppResult<Json<Vec<UserRosterEntry>>> {
    let users: Vec<UserRosterEntry> = sqlx::query_as(
        r#"SELECT id, email, split_part(email, '@', 1) AS full_name, role, is_active, created_at
        FROM admin_users WHERE organization_id = $1
        ORDER BY created_at"#,
    )
    .bind(actor.organization_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(users))
}

pub async fn create_user(
    State(state): State<AppState>,
    actor: axum::Extension<AuthUser>,
    Json(body): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<AdminUser>)> {
    if body.email.is_empty() || body.password.len() < 6 {
        return Err(AppError::BadRequest(
            "Email required and password must be at least 6 characters".into(),
        ));
    }

    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM admin_users WHERE email = $1)")
            .bind(&body.email)
            .fetch_one(&state.db)
            .await?;

    if exists {
        return Err(AppError::BadRequest("Email already registered".into()));
    }

    let password_hash =
        bcrypt::hash(&body.password, 12).map_err(|e| AppError::Internal(e.to_string()))?;

    let user: AdminUser = sqlx::query_as(
        "INSERT INTO admin_users (organization_id, email, password_hash, role) VALUES ($1, $2, $3, 'staff') RETURNING *",
    )
    .bind(actor.organization_id)
    .bind(&body.email)
    .bind(&password_hash)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update_user_role(
    State(state): State<AppState>,
    actor: axum::Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateUserRoleRequest>,
) -> AppResult<Json<AdminUser>> {
    let role: Role = body.role.parse().map_err(|_| {
        AppError::BadRequest("Invalid role. Must be owner, manager, or staff".into())
    })?;

    let user: AdminUser = sqlx::query_as(
        "UPDATE admin_users SET role = $3, updated_at = NOW() WHERE id = $1 AND organization_id = $2 RETURNING *",
    )
    .bind(id)
    .bind(actor.organization_id)
    .bind(role.as_str())
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(Json(user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    actor: axum::Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let role_str: String = sqlx::query_scalar(
        "SELECT role FROM admin_users WHERE id = $1 AND organization_id = $2",
    )
    .bind(id)
    .bind(actor.organization_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let target_role: Role = role_str
        .parse()
        .map_err(|_| AppError::Internal(format!("unknown role '{role_str}' for user {id}")))?;

    let owner_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*)::bigint FROM admin_users WHERE organization_id = $1 AND role = 'owner'",
    )
    .bind(actor.organization_id)
    .fetch_one(&state.db)
    .await?;

    authz::ensure_owner_deletable(target_role, owner_count)?;

    sqlx::query("DELETE FROM admin_users WHERE id = $1 AND organization_id = $2")
        .bind(id)
        .bind(actor.organization_id)
        .execute(&state.db)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
