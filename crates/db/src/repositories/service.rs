use crate::models::{DbService, DbSpecializedItem};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Children of `parent_id`, or the top-level services when it is `None`.
pub async fn list_services(pool: &Pool<Postgres>, parent_id: Option<Uuid>) -> Result<Vec<DbService>> {
    let services = sqlx::query_as::<_, DbService>(
        r#"
        SELECT id, name, parent_id, base_price, currency
        FROM services
        WHERE parent_id IS NOT DISTINCT FROM $1
        ORDER BY name ASC
        "#,
    )
    .bind(parent_id)
    .fetch_all(pool)
    .await?;

    Ok(services)
}

pub async fn get_service_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbService>> {
    let service = sqlx::query_as::<_, DbService>(
        r#"
        SELECT id, name, parent_id, base_price, currency
        FROM services
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(service)
}

pub async fn create_service(
    pool: &Pool<Postgres>,
    name: &str,
    parent_id: Option<Uuid>,
    base_price: i64,
    currency: &str,
) -> Result<DbService> {
    tracing::debug!(
        "Creating service: name={}, parent_id={:?}, base_price={}",
        name, parent_id, base_price
    );

    let service = sqlx::query_as::<_, DbService>(
        r#"
        INSERT INTO services (id, name, parent_id, base_price, currency)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, parent_id, base_price, currency
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(parent_id)
    .bind(base_price)
    .bind(currency)
    .fetch_one(pool)
    .await?;

    Ok(service)
}

pub async fn update_service(
    pool: &Pool<Postgres>,
    id: Uuid,
    name: &str,
    parent_id: Option<Uuid>,
    base_price: i64,
    currency: &str,
) -> Result<Option<DbService>> {
    let service = sqlx::query_as::<_, DbService>(
        r#"
        UPDATE services
        SET name = $2, parent_id = $3, base_price = $4, currency = $5
        WHERE id = $1
        RETURNING id, name, parent_id, base_price, currency
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(parent_id)
    .bind(base_price)
    .bind(currency)
    .fetch_optional(pool)
    .await?;

    Ok(service)
}

pub async fn delete_service(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM services WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn list_specialized_items(pool: &Pool<Postgres>, category_id: Uuid) -> Result<Vec<DbSpecializedItem>> {
    let items = sqlx::query_as::<_, DbSpecializedItem>(
        r#"
        SELECT id, category_id, name, unit_price, currency
        FROM specialized_items
        WHERE category_id = $1
        ORDER BY name ASC
        "#,
    )
    .bind(category_id)
    .fetch_all(pool)
    .await?;

    Ok(items)
}
