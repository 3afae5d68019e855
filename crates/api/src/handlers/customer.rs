//! Handlers for the `/customers` resource.
//!
//! Create and update accept `multipart/form-data` with the customer text
//! fields and an optional `image` file part.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use crm_core::customer::Customer;
use crm_core::types::CustomerId;
use serde::Serialize;

use crate::error::AppResult;
use crate::multipart::read_customer_form;
use crate::state::AppState;

/// Confirmation body returned by DELETE.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: &'static str,
    pub id: CustomerId,
}

/// GET /api/v1/customers
///
/// List every customer. No pagination or server-side filtering.
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Customer>>> {
    let customers = state.customers.list().await?;
    Ok(Json(customers))
}

/// GET /api/v1/customers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Customer>> {
    let customer = state.customers.get(&id).await?;
    Ok(Json(customer))
}

/// POST /api/v1/customers
///
/// Returns 400 if `name` or `email` is missing or blank.
pub async fn create(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Customer>)> {
    let form = read_customer_form(multipart, state.config.max_image_bytes).await?;
    let customer = state.customers.create(form).await?;

    tracing::info!(
        customer_id = %customer.id,
        has_image = customer.image.is_some(),
        "Customer created"
    );

    Ok((StatusCode::CREATED, Json(customer)))
}

/// PUT /api/v1/customers/{id}
///
/// Absent fields keep their stored values. A new `image` replaces the stored
/// one entirely; without it the existing image is kept.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Json<Customer>> {
    let form = read_customer_form(multipart, state.config.max_image_bytes).await?;
    let image_replaced = form.image.is_some();
    let customer = state.customers.update(&id, form).await?;

    tracing::info!(customer_id = %customer.id, image_replaced, "Customer updated");

    Ok(Json(customer))
}

/// DELETE /api/v1/customers/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteResponse>> {
    let id = state.customers.delete(&id).await?;

    tracing::info!(customer_id = %id, "Customer deleted");

    Ok(Json(DeleteResponse {
        message: "Customer deleted successfully",
        id,
    }))
}
