use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Location hierarchy
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS areas (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS districts (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            area_id UUID NOT NULL REFERENCES areas(id) ON DELETE CASCADE,
            name VARCHAR(255) NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS properties (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            district_id UUID NOT NULL REFERENCES districts(id) ON DELETE CASCADE,
            name VARCHAR(255) NOT NULL,
            lat DOUBLE PRECISION NOT NULL DEFAULT 0,
            lng DOUBLE PRECISION NOT NULL DEFAULT 0
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS residence_types (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            type_name VARCHAR(255) NOT NULL,
            cleaner_count INTEGER NOT NULL DEFAULT 1 CHECK (cleaner_count > 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Service catalogue; sub-services and specialized categories point at a parent
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS services (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            parent_id UUID NULL REFERENCES services(id) ON DELETE CASCADE,
            base_price BIGINT NOT NULL DEFAULT 0,
            currency VARCHAR(8) NOT NULL DEFAULT 'AED'
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS specialized_items (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            category_id UUID NOT NULL REFERENCES services(id) ON DELETE CASCADE,
            name VARCHAR(255) NOT NULL,
            unit_price BIGINT NOT NULL,
            currency VARCHAR(8) NOT NULL DEFAULT 'AED'
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS customers (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            phone VARCHAR(64) NOT NULL,
            email VARCHAR(255) NOT NULL,
            area_id UUID NULL REFERENCES areas(id) ON DELETE SET NULL,
            district_id UUID NULL REFERENCES districts(id) ON DELETE SET NULL,
            property_id UUID NULL REFERENCES properties(id) ON DELETE SET NULL,
            residence_type_id UUID NULL REFERENCES residence_types(id) ON DELETE SET NULL,
            apartment_number VARCHAR(64) NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Roster
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS teams (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS team_members (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            team_id UUID NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
            name VARCHAR(255) NOT NULL,
            role VARCHAR(64) NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bookings (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            customer_id UUID NOT NULL REFERENCES customers(id),
            team_id UUID NULL REFERENCES teams(id),
            service_id UUID NOT NULL REFERENCES services(id),
            sub_service_id UUID NOT NULL REFERENCES services(id),
            area_id UUID NULL,
            district_id UUID NULL,
            property_id UUID NULL,
            residence_type_id UUID NULL,
            apartment_number VARCHAR(64) NOT NULL DEFAULT '',
            presence BOOLEAN NOT NULL DEFAULT FALSE,
            special_instructions TEXT NOT NULL DEFAULT '',
            cleaner_count INTEGER NOT NULL DEFAULT 1,
            total_amount BIGINT NOT NULL,
            currency VARCHAR(8) NOT NULL,
            start_date DATE NOT NULL,
            end_date DATE NOT NULL,
            frequency VARCHAR(16) NULL,
            status VARCHAR(16) NOT NULL,
            payment_status VARCHAR(16) NOT NULL,
            expires_at TIMESTAMP WITH TIME ZONE NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_booking_dates CHECK (end_date >= start_date)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS team_schedules (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            team_id UUID NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
            date DATE NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            is_blocked BOOLEAN NOT NULL DEFAULT FALSE,
            is_available BOOLEAN NOT NULL DEFAULT TRUE,
            is_booked BOOLEAN NOT NULL DEFAULT FALSE,
            booking_id UUID NULL REFERENCES bookings(id) ON DELETE SET NULL,
            status VARCHAR(32) NULL,
            area_id UUID NULL,
            district_id UUID NULL,
            property_id UUID NULL,
            CONSTRAINT valid_schedule_range CHECK (end_time > start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS booking_slots (
            booking_id UUID NOT NULL REFERENCES bookings(id) ON DELETE CASCADE,
            schedule_id UUID NOT NULL REFERENCES team_schedules(id),
            date DATE NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            renewal BOOLEAN NOT NULL DEFAULT FALSE,
            PRIMARY KEY (booking_id, schedule_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS booking_items (
            booking_id UUID NOT NULL REFERENCES bookings(id) ON DELETE CASCADE,
            item_id UUID NOT NULL REFERENCES specialized_items(id),
            name VARCHAR(255) NOT NULL,
            quantity INTEGER NOT NULL CHECK (quantity > 0),
            unit_price BIGINT NOT NULL,
            PRIMARY KEY (booking_id, item_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_districts_area_id ON districts(area_id);
        CREATE INDEX IF NOT EXISTS idx_properties_district_id ON properties(district_id);
        CREATE INDEX IF NOT EXISTS idx_services_parent_id ON services(parent_id);
        CREATE INDEX IF NOT EXISTS idx_specialized_items_category_id ON specialized_items(category_id);
        CREATE INDEX IF NOT EXISTS idx_customers_phone ON customers(phone);
        CREATE INDEX IF NOT EXISTS idx_team_members_team_id ON team_members(team_id);
        CREATE INDEX IF NOT EXISTS idx_team_schedules_date ON team_schedules(date);
        CREATE INDEX IF NOT EXISTS idx_team_schedules_booking_id ON team_schedules(booking_id);
        CREATE INDEX IF NOT EXISTS idx_bookings_status_expires ON bookings(status, expires_at);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
