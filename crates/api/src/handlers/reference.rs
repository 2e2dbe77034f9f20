//! CRUD handlers for the reference data behind the wizard's dropdowns:
//! areas, districts, properties, residence types and services.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use brightbook_core::{
    errors::BookingError,
    models::{
        reference::{
            Area, AreaRequest, DeletedResponse, District, DistrictRequest, Property,
            PropertyRequest, ResidenceType, ResidenceTypeRequest,
        },
        service::{Service, ServiceRequest},
    },
};
use brightbook_db::repositories::{reference, service};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

#[derive(Debug, Deserialize)]
pub struct DistrictQuery {
    pub area_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct PropertyQuery {
    pub district_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct ServiceQuery {
    pub parent_id: Option<Uuid>,
}

fn required_name<'a>(field: &str, value: &'a str) -> Result<&'a str, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError(BookingError::Validation(format!("{} is required", field))));
    }
    Ok(value)
}

fn not_found(kind: &str, id: Uuid) -> AppError {
    AppError(BookingError::NotFound(format!("{} with ID {} not found", kind, id)))
}

fn deleted(kind: &str, id: Uuid, found: bool) -> Result<Json<DeletedResponse>, AppError> {
    if !found {
        return Err(not_found(kind, id));
    }
    Ok(Json(DeletedResponse { id, deleted: true }))
}

// ---- areas ----

#[axum::debug_handler]
pub async fn list_areas(State(state): State<Arc<ApiState>>) -> Result<Json<Vec<Area>>, AppError> {
    let areas = reference::list_areas(&state.db_pool).await?;
    Ok(Json(areas.into_iter().map(Area::from).collect()))
}

#[axum::debug_handler]
pub async fn create_area(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<AreaRequest>,
) -> Result<Json<Area>, AppError> {
    let name = required_name("name", &payload.name)?;
    let area = reference::create_area(&state.db_pool, name).await?;
    Ok(Json(area.into()))
}

#[axum::debug_handler]
pub async fn update_area(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AreaRequest>,
) -> Result<Json<Area>, AppError> {
    let name = required_name("name", &payload.name)?;
    let area = reference::update_area(&state.db_pool, id, name)
        .await?
        .ok_or_else(|| not_found("Area", id))?;
    Ok(Json(area.into()))
}

#[axum::debug_handler]
pub async fn delete_area(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, AppError> {
    let found = reference::delete_area(&state.db_pool, id).await?;
    deleted("Area", id, found)
}

// ---- districts ----

#[axum::debug_handler]
pub async fn list_districts(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<DistrictQuery>,
) -> Result<Json<Vec<District>>, AppError> {
    let districts = reference::list_districts(&state.db_pool, query.area_id).await?;
    Ok(Json(districts.into_iter().map(District::from).collect()))
}

#[axum::debug_handler]
pub async fn create_district(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<DistrictRequest>,
) -> Result<Json<District>, AppError> {
    let name = required_name("name", &payload.name)?;
    let district = reference::create_district(&state.db_pool, payload.area_id, name).await?;
    Ok(Json(district.into()))
}

#[axum::debug_handler]
pub async fn update_district(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DistrictRequest>,
) -> Result<Json<District>, AppError> {
    let name = required_name("name", &payload.name)?;
    let district = reference::update_district(&state.db_pool, id, payload.area_id, name)
        .await?
        .ok_or_else(|| not_found("District", id))?;
    Ok(Json(district.into()))
}

#[axum::debug_handler]
pub async fn delete_district(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, AppError> {
    let found = reference::delete_district(&state.db_pool, id).await?;
    deleted("District", id, found)
}

// ---- properties ----

fn validate_coordinates(lat: f64, lng: f64) -> Result<(), AppError> {
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(AppError(BookingError::Validation(format!(
            "coordinates out of range: {}, {}",
            lat, lng
        ))));
    }
    Ok(())
}

#[axum::debug_handler]
pub async fn list_properties(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<PropertyQuery>,
) -> Result<Json<Vec<Property>>, AppError> {
    let properties = reference::list_properties(&state.db_pool, query.district_id).await?;
    Ok(Json(properties.into_iter().map(Property::from).collect()))
}

#[axum::debug_handler]
pub async fn create_property(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<PropertyRequest>,
) -> Result<Json<Property>, AppError> {
    let name = required_name("name", &payload.name)?;
    validate_coordinates(payload.lat, payload.lng)?;
    let property = reference::create_property(
        &state.db_pool,
        payload.district_id,
        name,
        payload.lat,
        payload.lng,
    )
    .await?;
    Ok(Json(property.into()))
}

#[axum::debug_handler]
pub async fn update_property(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PropertyRequest>,
) -> Result<Json<Property>, AppError> {
    let name = required_name("name", &payload.name)?;
    validate_coordinates(payload.lat, payload.lng)?;
    let property = reference::update_property(
        &state.db_pool,
        id,
        payload.district_id,
        name,
        payload.lat,
        payload.lng,
    )
    .await?
    .ok_or_else(|| not_found("Property", id))?;
    Ok(Json(property.into()))
}

#[axum::debug_handler]
pub async fn delete_property(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, AppError> {
    let found = reference::delete_property(&state.db_pool, id).await?;
    deleted("Property", id, found)
}

// ---- residence types ----

#[axum::debug_handler]
pub async fn list_residence_types(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<ResidenceType>>, AppError> {
    let residence_types = reference::list_residence_types(&state.db_pool).await?;
    Ok(Json(residence_types.into_iter().map(ResidenceType::from).collect()))
}

#[axum::debug_handler]
pub async fn create_residence_type(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<ResidenceTypeRequest>,
) -> Result<Json<ResidenceType>, AppError> {
    let type_name = required_name("type", &payload.type_name)?;
    let residence_type = reference::create_residence_type(&state.db_pool, type_name).await?;
    Ok(Json(residence_type.into()))
}

#[axum::debug_handler]
pub async fn update_residence_type(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ResidenceTypeRequest>,
) -> Result<Json<ResidenceType>, AppError> {
    let type_name = required_name("type", &payload.type_name)?;
    let residence_type = reference::update_residence_type(&state.db_pool, id, type_name)
        .await?
        .ok_or_else(|| not_found("Residence type", id))?;
    Ok(Json(residence_type.into()))
}

#[axum::debug_handler]
pub async fn delete_residence_type(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, AppError> {
    let found = reference::delete_residence_type(&state.db_pool, id).await?;
    deleted("Residence type", id, found)
}

// ---- services ----

fn validate_price(base_price: i64) -> Result<(), AppError> {
    if base_price < 0 {
        return Err(AppError(BookingError::Validation(
            "base_price must not be negative".to_string(),
        )));
    }
    Ok(())
}

#[axum::debug_handler]
pub async fn list_services(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ServiceQuery>,
) -> Result<Json<Vec<Service>>, AppError> {
    let services = service::list_services(&state.db_pool, query.parent_id).await?;
    Ok(Json(services.into_iter().map(Service::from).collect()))
}

#[axum::debug_handler]
pub async fn create_service(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<ServiceRequest>,
) -> Result<Json<Service>, AppError> {
    let name = required_name("name", &payload.name)?;
    validate_price(payload.base_price)?;
    let created = service::create_service(
        &state.db_pool,
        name,
        payload.parent_id,
        payload.base_price,
        &payload.currency,
    )
    .await?;
    Ok(Json(created.into()))
}

#[axum::debug_handler]
pub async fn update_service(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ServiceRequest>,
) -> Result<Json<Service>, AppError> {
    let name = required_name("name", &payload.name)?;
    validate_price(payload.base_price)?;
    if payload.parent_id == Some(id) {
        return Err(AppError(BookingError::Validation(
            "a service cannot be its own parent".to_string(),
        )));
    }
    let updated = service::update_service(
        &state.db_pool,
        id,
        name,
        payload.parent_id,
        payload.base_price,
        &payload.currency,
    )
    .await?
    .ok_or_else(|| not_found("Service", id))?;
    Ok(Json(updated.into()))
}

#[axum::debug_handler]
pub async fn delete_service(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, AppError> {
    let found = service::delete_service(&state.db_pool, id).await?;
    deleted("Service", id, found)
}
