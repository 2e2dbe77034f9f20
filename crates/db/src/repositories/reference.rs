use crate::models::{DbArea, DbDistrict, DbProperty, DbResidenceType};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn list_areas(pool: &Pool<Postgres>) -> Result<Vec<DbArea>> {
    let areas = sqlx::query_as::<_, DbArea>(
        r#"
        SELECT id, name
        FROM areas
        ORDER BY name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(areas)
}

pub async fn create_area(pool: &Pool<Postgres>, name: &str) -> Result<DbArea> {
    tracing::debug!("Creating area: name={}", name);

    let area = sqlx::query_as::<_, DbArea>(
        r#"
        INSERT INTO areas (id, name)
        VALUES ($1, $2)
        RETURNING id, name
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(area)
}

pub async fn update_area(pool: &Pool<Postgres>, id: Uuid, name: &str) -> Result<Option<DbArea>> {
    let area = sqlx::query_as::<_, DbArea>(
        r#"
        UPDATE areas
        SET name = $2
        WHERE id = $1
        RETURNING id, name
        "#,
    )
    .bind(id)
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(area)
}

pub async fn delete_area(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM areas WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Districts of one area, or all districts when `area_id` is `None`.
pub async fn list_districts(pool: &Pool<Postgres>, area_id: Option<Uuid>) -> Result<Vec<DbDistrict>> {
    let districts = sqlx::query_as::<_, DbDistrict>(
        r#"
        SELECT id, area_id, name
        FROM districts
        WHERE $1::uuid IS NULL OR area_id = $1
        ORDER BY name ASC
        "#,
    )
    .bind(area_id)
    .fetch_all(pool)
    .await?;

    Ok(districts)
}

pub async fn create_district(pool: &Pool<Postgres>, area_id: Uuid, name: &str) -> Result<DbDistrict> {
    tracing::debug!("Creating district: area_id={}, name={}", area_id, name);

    let district = sqlx::query_as::<_, DbDistrict>(
        r#"
        INSERT INTO districts (id, area_id, name)
        VALUES ($1, $2, $3)
        RETURNING id, area_id, name
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(area_id)
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(district)
}

pub async fn update_district(
    pool: &Pool<Postgres>,
    id: Uuid,
    area_id: Uuid,
    name: &str,
) -> Result<Option<DbDistrict>> {
    let district = sqlx::query_as::<_, DbDistrict>(
        r#"
        UPDATE districts
        SET area_id = $2, name = $3
        WHERE id = $1
        RETURNING id, area_id, name
        "#,
    )
    .bind(id)
    .bind(area_id)
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(district)
}

pub async fn delete_district(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM districts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn list_properties(pool: &Pool<Postgres>, district_id: Option<Uuid>) -> Result<Vec<DbProperty>> {
    let properties = sqlx::query_as::<_, DbProperty>(
        r#"
        SELECT id, district_id, name, lat, lng
        FROM properties
        WHERE $1::uuid IS NULL OR district_id = $1
        ORDER BY name ASC
        "#,
    )
    .bind(district_id)
    .fetch_all(pool)
    .await?;

    Ok(properties)
}

pub async fn get_property_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbProperty>> {
    let property = sqlx::query_as::<_, DbProperty>(
        r#"
        SELECT id, district_id, name, lat, lng
        FROM properties
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(property)
}

pub async fn create_property(
    pool: &Pool<Postgres>,
    district_id: Uuid,
    name: &str,
    lat: f64,
    lng: f64,
) -> Result<DbProperty> {
    tracing::debug!("Creating property: district_id={}, name={}", district_id, name);

    let property = sqlx::query_as::<_, DbProperty>(
        r#"
        INSERT INTO properties (id, district_id, name, lat, lng)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, district_id, name, lat, lng
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(district_id)
    .bind(name)
    .bind(lat)
    .bind(lng)
    .fetch_one(pool)
    .await?;

    Ok(property)
}

pub async fn update_property(
    pool: &Pool<Postgres>,
    id: Uuid,
    district_id: Uuid,
    name: &str,
    lat: f64,
    lng: f64,
) -> Result<Option<DbProperty>> {
    let property = sqlx::query_as::<_, DbProperty>(
        r#"
        UPDATE properties
        SET district_id = $2, name = $3, lat = $4, lng = $5
        WHERE id = $1
        RETURNING id, district_id, name, lat, lng
        "#,
    )
    .bind(id)
    .bind(district_id)
    .bind(name)
    .bind(lat)
    .bind(lng)
    .fetch_optional(pool)
    .await?;

    Ok(property)
}

pub async fn delete_property(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM properties WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn list_residence_types(pool: &Pool<Postgres>) -> Result<Vec<DbResidenceType>> {
    let residence_types = sqlx::query_as::<_, DbResidenceType>(
        r#"
        SELECT id, type_name, cleaner_count
        FROM residence_types
        ORDER BY type_name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(residence_types)
}

pub async fn get_residence_type_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbResidenceType>> {
    let residence_type = sqlx::query_as::<_, DbResidenceType>(
        r#"
        SELECT id, type_name, cleaner_count
        FROM residence_types
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(residence_type)
}

pub async fn create_residence_type(pool: &Pool<Postgres>, type_name: &str) -> Result<DbResidenceType> {
    let residence_type = sqlx::query_as::<_, DbResidenceType>(
        r#"
        INSERT INTO residence_types (id, type_name)
        VALUES ($1, $2)
        RETURNING id, type_name, cleaner_count
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(type_name)
    .fetch_one(pool)
    .await?;

    Ok(residence_type)
}

pub async fn update_residence_type(
    pool: &Pool<Postgres>,
    id: Uuid,
    type_name: &str,
) -> Result<Option<DbResidenceType>> {
    let residence_type = sqlx::query_as::<_, DbResidenceType>(
        r#"
        UPDATE residence_types
        SET type_name = $2
        WHERE id = $1
        RETURNING id, type_name, cleaner_count
        "#,
    )
    .bind(id)
    .bind(type_name)
    .fetch_optional(pool)
    .await?;

    Ok(residence_type)
}

pub async fn delete_residence_type(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM residence_types WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
