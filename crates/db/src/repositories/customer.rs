use crate::models::DbCustomer;
use brightbook_core::models::customer::CreateCustomerRequest;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const CUSTOMER_COLUMNS: &str = "id, name, phone, email, area_id, district_id, property_id, \
     residence_type_id, apartment_number, created_at";

/// Case-insensitive match on name, phone or email. Without a search term
/// the most recent customers are returned.
pub async fn search_customers(pool: &Pool<Postgres>, search: Option<&str>) -> Result<Vec<DbCustomer>> {
    let pattern = search
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(|term| format!("%{}%", term));

    tracing::debug!("Searching customers: pattern={:?}", pattern);

    let customers = sqlx::query_as::<_, DbCustomer>(&format!(
        r#"
        SELECT {CUSTOMER_COLUMNS}
        FROM customers
        WHERE $1::text IS NULL OR name ILIKE $1 OR phone ILIKE $1 OR email ILIKE $1
        ORDER BY created_at DESC
        LIMIT 50
        "#
    ))
    .bind(pattern)
    .fetch_all(pool)
    .await?;

    Ok(customers)
}

pub async fn get_customer_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbCustomer>> {
    let customer = sqlx::query_as::<_, DbCustomer>(&format!(
        r#"
        SELECT {CUSTOMER_COLUMNS}
        FROM customers
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(customer)
}

pub async fn create_customer(pool: &Pool<Postgres>, request: &CreateCustomerRequest) -> Result<DbCustomer> {
    let id = Uuid::new_v4();
    tracing::debug!("Creating customer: id={}, name={}", id, request.name);

    let customer = sqlx::query_as::<_, DbCustomer>(&format!(
        r#"
        INSERT INTO customers (id, name, phone, email, area_id, district_id, property_id,
                               residence_type_id, apartment_number, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {CUSTOMER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(request.name.trim())
    .bind(request.phone.trim())
    .bind(request.email.trim())
    .bind(request.area_id)
    .bind(request.district_id)
    .bind(request.property_id)
    .bind(request.residence_type_id)
    .bind(request.apartment_number.as_deref())
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(customer)
}
