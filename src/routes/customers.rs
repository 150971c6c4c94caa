use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::authz::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::customer::*;
use crate::AppState;

fn clamp_page(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    (limit.unwrap_or(100).clamp(1, 1000), offset.unwrap_or(0).max(0))
}

fn validate_points_delta(points: i32) -> AppResult<()> {
    if points <= 0 {
        return Err(AppError::BadRequest("Points must be greater than 0".into()));
    }
    Ok(())
}

pub async fn create_customer(
    State(state): State<AppState>,
    actor: axum::Extension<AuthUser>,
    Json(body): Json<CreateCustomerRequest>,
) -> AppResult<(StatusCode, Json<Customer>)> {
    let no_phone = body.phone_number.as_deref().map_or(true, str::is_empty);
    let no_email = body.email.as_deref().map_or(true, str::is_empty);
    if no_phone && no_email {
        return Err(AppError::BadRequest(
            "Phone number or email is required".into(),
        ));
    }

    let points = body.points.unwrap_or(0);
    let visits = body.visits.unwrap_or(0);
    if points < 0 || visits < 0 {
        return Err(AppError::BadRequest(
            "Points and visits cannot be negative".into(),
        ));
    }

    let customer: Customer = sqlx::query_as(
        "INSERT INTO customers (organization_id, phone_number, name, email, points, visits) VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(actor.organization_id)
    .bind(&body.phone_number)
    .bind(&body.name)
    .bind(&body.email)
    .bind(points)
    .bind(visits)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(customer)))
}

pub async fn list_customers(
    State(state): State<AppState>,
    actor: axum::Extension<AuthUser>,
    Query(query): Query<CustomerListQuery>,
) -> AppResult<Json<Vec<Customer>>> {
    let (limit, offset) = clamp_page(query.limit, query.offset);

    let customers: Vec<Customer> = sqlx::query_as(
        "SELECT * FROM customers WHERE organization_id = $1 ORDER BY created_at, id LIMIT $2 OFFSET $3",
    )
    .bind(actor.organization_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(customers))
}

pub async fn get_customer(
    State(state): State<AppState>,
    actor: axum::Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Customer>> {
    let customer: Customer =
        sqlx::query_as("SELECT * FROM customers WHERE id = $1 AND organization_id = $2")
            .bind(id)
            .bind(actor.organization_id)
            .fetch_optional(&state.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Customer not found".into()))?;

    Ok(Json(customer))
}

pub async fn update_customer(
    State(state): State<AppState>,
    actor: axum::Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateCustomerRequest>,
) -> AppResult<Json<Customer>> {
    let mut updates: Vec<String> = Vec::new();
    let mut text_params: Vec<Option<String>> = Vec::new();

    if let Some(ref phone) = body.phone_number {
        updates.push(format!("phone_number = ${}", text_params.len() + 3));
        text_params.push(phone.clone());
    }
    if let Some(ref name) = body.name {
        updates.push(format!("name = ${}", text_params.len() + 3));
        text_params.push(name.clone());
    }
    if let Some(ref email) = body.email {
        updates.push(format!("email = ${}", text_params.len() + 3));
        text_params.push(email.clone());
    }

    // Counter columns bind after the text columns.
    let mut int_params: Vec<i32> = Vec::new();
    let int_base = text_params.len() + 3;

    if let Some(points) = body.points {
        if points < 0 {
            return Err(AppError::BadRequest("Points cannot be negative".into()));
        }
        updates.push(format!("points = ${}", int_base + int_params.len()));
        int_params.push(points);
    }
    if let Some(visits) = body.visits {
        if visits < 0 {
            return Err(AppError::BadRequest("Visits cannot be negative".into()));
        }
        updates.push(format!("visits = ${}", int_base + int_params.len()));
        int_params.push(visits);
    }

    if updates.is_empty() {
        let customer: Customer =
            sqlx::query_as("SELECT * FROM customers WHERE id = $1 AND organization_id = $2")
                .bind(id)
                .bind(actor.organization_id)
                .fetch_optional(&state.db)
                .await?
                .ok_or_else(|| AppError::NotFound("Customer not found".into()))?;
        return Ok(Json(customer));
    }

    updates.push("updated_at = NOW()".to_string());

    let sql = format!(
        "UPDATE customers SET {} WHERE id = $1 AND organization_id = $2 RETURNING *",
        updates.join(", ")
    );

    let mut query = sqlx::query_as::<_, Customer>(&sql)
        .bind(id)
        .bind(actor.organization_id);
    for p in &text_params {
        query = query.bind(p);
    }
    for p in &int_params {
        query = query.bind(p);
    }

    let customer = query
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer not found".into()))?;

    Ok(Json(customer))
}

pub async fn add_points(
    State(state): State<AppState>,
    actor: axum::Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<AddPointsRequest>,
) -> AppResult<Json<Customer>> {
    validate_points_delta(body.points)?;

    // Single atomic increment; concurrent awards never lose updates.
    let customer: Customer = sqlx::query_as(
        "UPDATE customers SET points = points + $3, updated_at = NOW() WHERE id = $1 AND organization_id = $2 RETURNING *",
    )
    .bind(id)
    .bind(actor.organization_id)
    .bind(body.points)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound("Customer not found".into()))?;

    Ok(Json(customer))
}

pub async fn record_visit(
    State(state): State<AppState>,
    actor: axum::Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Customer>> {
    let customer: Customer = sqlx::query_as(
        "UPDATE customers SET visits = visits + 1, updated_at = NOW() WHERE id = $1 AND organization_id = $2 RETURNING *",
    )
    .bind(id)
    .bind(actor.organization_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound("Customer not found".into()))?;

    Ok(Json(customer))
}

pub async fn delete_customer(
    State(state): State<AppState>,
    actor: axum::Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let customer: Customer = sqlx::query_as(
        "DELETE FROM customers WHERE id = $1 AND organization_id = $2 RETURNING *",
    )
    .bind(id)
    .bind(actor.organization_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound("Customer not found".into()))?;

    Ok(Json(json!({
        "message": "Customer deleted successfully",
        "customer": customer,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_clamps_limit_and_offset() {
        assert_eq!(clamp_page(None, None), (100, 0));
        assert_eq!(clamp_page(Some(5000), Some(20)), (1000, 20));
        assert_eq!(clamp_page(Some(0), None), (1, 0));
        assert_eq!(clamp_page(Some(-3), Some(-10)), (1, 0));
    }

    #[test]
    fn points_delta_must_be_positive() {
        assert!(validate_points_delta(0).is_err());
        assert!(validate_points_delta(-5).is_err());
        assert!(validate_points_delta(10).is_ok());
    }
}
