use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use crate::authz::AuthUser;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::generate_token;
use crate::models::user::*;
use crate::models::Role;
use crate::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    if body.email.is_empty() || body.password.len() < 6 {
        return Err(AppError::BadRequest(
            "Email required and password must be at least 6 characters".into(),
        ));
    }

    // Check email uniqueness (system-wide, not per organization)
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM admin_users WHERE email = $1)")
            .bind(&body.email)
            .fetch_one(&state.db)
            .await?;

    if exists {
        return Err(AppError::BadRequest("Email already registered".into()));
    }

    let role: Role = match body.role.as_deref() {
        Some(r) => r.parse().map_err(|_| {
            AppError::BadRequest("Invalid role. Must be owner, manager, or staff".into())
        })?,
        None => Role::Staff,
    };

    let password_hash =
        bcrypt::hash(&body.password, 12).map_err(|e| AppError::Internal(e.to_string()))?;

    // Organization resolution and user insert commit together.
    let mut tx = state.db.begin().await?;

    let organization_id: Uuid = match body.organization_id {
        Some(org_id) => {
            let found: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM organizations WHERE id = $1)")
                    .bind(org_id)
                    .fetch_one(&mut *tx)
                    .await?;
            if !found {
                return Err(AppError::NotFound("Organization not found".into()));
            }
            org_id
        }
        None => {
            let org_name = body.organization_name.clone().unwrap_or_else(|| {
                let local = body.email.split('@').next().unwrap_or(body.email.as_str());
                format!("{local}'s Organization")
            });
            sqlx::query_scalar("INSERT INTO organizations (name) VALUES ($1) RETURNING id")
                .bind(&org_name)
                .fetch_one(&mut *tx)
                .await?
        }
    };

    let user: AdminUser = sqlx::query_as(
        "INSERT INTO admin_users (organization_id, email, password_hash, role) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(organization_id)
    .bind(&body.email)
    .bind(&password_hash)
    .bind(role.as_str())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    let token = generate_token(
        user.id,
        user.organization_id,
        &user.role,
        &state.config.jwt.secret,
        state.config.jwt.expiry_secs,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: UserSummary::from(&user),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user: AdminUser = sqlx::query_as("SELECT * FROM admin_users WHERE email = $1")
        .bind(&body.email)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".into()))?;

    let valid = bcrypt::verify(&body.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    if !valid {
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    if !user.is_active {
        return Err(AppError::Unauthorized("Account is inactive".into()));
    }

    let token = generate_token(
        user.id,
        user.organization_id,
        &user.role,
        &state.config.jwt.secret,
        state.config.jwt.expiry_secs,
    )?;

    Ok(Json(AuthResponse {
        token,
        user: UserSummary::from(&user),
    }))
}

pub async fn profile(
    State(state): State<AppState>,
    actor: axum::Extension<AuthUser>,
) -> AppResult<Json<UserSummary>> {
    let user: AdminUser = sqlx::query_as("SELECT * FROM admin_users WHERE id = $1")
        .bind(actor.id)
        .fetch_one(&state.db)
        .await?;

    Ok(Json(UserSummary::from(&user)))
}
