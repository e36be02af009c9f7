//! Lead database operations

use chrono::{DateTime, Utc};
use shared::models::{Lead, LeadContact};
use sqlx::PgPool;

pub async fn create_lead(
    pool: &PgPool,
    contact: &LeadContact,
    appointment_at: DateTime<Utc>,
) -> Result<Lead, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO leads (id, first_name, last_name, email, phone, appointment_at, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, now())
        RETURNING id, first_name, last_name, email, phone, appointment_at, created_at
        "#,
    )
    .bind(shared::util::snowflake_id())
    .bind(&contact.first_name)
    .bind(&contact.last_name)
    .bind(&contact.email)
    .bind(&contact.phone)
    .bind(appointment_at)
    .fetch_one(pool)
    .await
}

pub async fn list_for_slot(
    pool: &PgPool,
    appointment_at: DateTime<Utc>,
) -> Result<Vec<Lead>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT id, first_name, last_name, email, phone, appointment_at, created_at
        FROM leads
        WHERE appointment_at = $1
        ORDER BY created_at
        "#,
    )
    .bind(appointment_at)
    .fetch_all(pool)
    .await
}
