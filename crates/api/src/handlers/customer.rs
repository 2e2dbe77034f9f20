use axum::{
    extract::{Path, Query, State},
    Json,
};
use brightbook_core::{
    errors::BookingError,
    models::customer::{CreateCustomerRequest, Customer, NewCustomer},
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

#[derive(Debug, Deserialize)]
pub struct CustomerQuery {
    pub search: Option<String>,
}

#[axum::debug_handler]
pub async fn search_customers(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<CustomerQuery>,
) -> Result<Json<Vec<Customer>>, AppError> {
    let customers = state.backend.search_customers(query.search).await?;
    Ok(Json(customers))
}

#[axum::debug_handler]
pub async fn get_customer(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Customer>, AppError> {
    let customer = state
        .backend
        .get_customer(id)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Customer with ID {} not found", id)))?;
    Ok(Json(customer))
}

/// Creates a customer from the customers screen, where the location can be
/// filled in up front.
#[axum::debug_handler]
pub async fn create_customer(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateCustomerRequest>,
) -> Result<Json<Customer>, AppError> {
    let contact = NewCustomer {
        name: payload.name.clone(),
        phone: payload.phone.clone(),
        email: payload.email.clone(),
    };
    if !contact.is_complete() {
        return Err(AppError(BookingError::Validation(
            "name, phone and email are required".to_string(),
        )));
    }

    let customer = brightbook_db::repositories::customer::create_customer(&state.db_pool, &payload).await?;
    tracing::info!(customer_id = %customer.id, "customer created");
    Ok(Json(customer.into()))
}
