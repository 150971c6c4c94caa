use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::authz::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::Role;
use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "organizationId")]
    pub organization_id: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

pub fn generate_token(
    user_id: Uuid,
    organization_id: Uuid,
    role: &str,
    secret: &str,
    expiry_secs: i64,
) -> AppResult<String> {
    let now = Utc::now().timestamp();

    let claims = Claims {
        user_id: user_id.to_string(),
        organization_id: organization_id.to_string(),
        role: role.to_string(),
        exp: now + expiry_secs,
        iat: now,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

pub fn verify_token(token: &str, secret: &str) -> AppResult<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

fn extract_bearer(req: &Request) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(String::from)
}

/// Middleware: requires a valid JWT whose subject still exists and is
/// active. Sets AuthUser in extensions with the role read from storage,
/// not from the token.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer(&req)
        .ok_or_else(|| AppError::Unauthorized("No token provided".into()))?;

    let claims = verify_token(&token, &state.config.jwt.secret)?;

    let user_id = Uuid::parse_str(&claims.user_id)
        .map_err(|_| AppError::Unauthorized("Invalid token subject".into()))?;

    let (id, organization_id, role, is_active): (Uuid, Uuid, String, bool) = sqlx::query_as(
        "SELECT id, organization_id, role, is_active FROM admin_users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;

    if !is_active {
        return Err(AppError::Unauthorized("Account is inactive".into()));
    }

    let role: Role = role
        .parse()
        .map_err(|_| AppError::Internal(format!("unknown role '{role}' for user {id}")))?;

    req.extensions_mut().insert(AuthUser {
        id,
        organization_id,
        role,
    });

    Ok(next.run(req).await)
}
