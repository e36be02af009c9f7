//! Slot quota database operations
//!
//! `reserve` and `release` hold `FOR UPDATE` on exactly one row for the whole
//! transaction, so bookers of the same slot serialize and bookers of other
//! slots never wait on each other. Dropping the transaction (error, client
//! gone) rolls it back and leaves `booked` untouched.

use chrono::{DateTime, Utc};
use shared::models::SlotQuota;
use sqlx::{PgConnection, PgPool};

use crate::store::ReserveOutcome;

/// Bound the row-lock wait of the current transaction
async fn set_lock_timeout(conn: &mut PgConnection, lock_timeout_ms: u64) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT set_config('lock_timeout', $1, true)")
        .bind(format!("{lock_timeout_ms}ms"))
        .execute(conn)
        .await?;
    Ok(())
}

async fn lock_row(
    conn: &mut PgConnection,
    start_at: DateTime<Utc>,
) -> Result<Option<SlotQuota>, sqlx::Error> {
    sqlx::query_as(
        "SELECT start_at, capacity, booked FROM slot_quotas WHERE start_at = $1 FOR UPDATE",
    )
    .bind(start_at)
    .fetch_optional(conn)
    .await
}

async fn write_row(
    conn: &mut PgConnection,
    start_at: DateTime<Utc>,
    capacity: i32,
    booked: i32,
) -> Result<SlotQuota, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE slot_quotas SET capacity = $2, booked = $3
        WHERE start_at = $1
        RETURNING start_at, capacity, booked
        "#,
    )
    .bind(start_at)
    .bind(capacity)
    .bind(booked)
    .fetch_one(conn)
    .await
}

// ── Listing path (unlocked) ──

pub async fn ensure_quota(
    pool: &PgPool,
    start_at: DateTime<Utc>,
    capacity: i32,
) -> Result<SlotQuota, sqlx::Error> {
    let row: Option<SlotQuota> = sqlx::query_as(
        r#"
        INSERT INTO slot_quotas (start_at, capacity, booked)
        VALUES ($1, $2, 0)
        ON CONFLICT (start_at)
        DO UPDATE SET capacity = EXCLUDED.capacity
        WHERE slot_quotas.capacity <> EXCLUDED.capacity
        RETURNING start_at, capacity, booked
        "#,
    )
    .bind(start_at)
    .bind(capacity)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(quota) => Ok(quota),
        // already present with the right capacity
        None => {
            sqlx::query_as("SELECT start_at, capacity, booked FROM slot_quotas WHERE start_at = $1")
                .bind(start_at)
                .fetch_one(pool)
                .await
        }
    }
}

// ── Booking path (locked) ──

pub async fn reserve(
    pool: &PgPool,
    start_at: DateTime<Utc>,
    capacity: i32,
    lock_timeout_ms: u64,
) -> Result<ReserveOutcome, sqlx::Error> {
    let mut tx = pool.begin().await?;
    set_lock_timeout(&mut tx, lock_timeout_ms).await?;

    sqlx::query(
        r#"
        INSERT INTO slot_quotas (start_at, capacity, booked)
        VALUES ($1, $2, 0)
        ON CONFLICT (start_at) DO NOTHING
        "#,
    )
    .bind(start_at)
    .bind(capacity)
    .execute(&mut *tx)
    .await?;

    let Some(mut quota) = lock_row(&mut tx, start_at).await? else {
        return Err(sqlx::Error::RowNotFound);
    };

    if quota.capacity != capacity {
        quota = write_row(&mut tx, start_at, capacity, quota.booked).await?;
    }

    if quota.booked >= quota.capacity {
        // keep the re-aligned capacity
        tx.commit().await?;
        return Ok(ReserveOutcome::Full(quota));
    }

    let quota = write_row(&mut tx, start_at, quota.capacity, quota.booked + 1).await?;
    tx.commit().await?;
    Ok(ReserveOutcome::Reserved(quota))
}

pub async fn release(
    pool: &PgPool,
    start_at: DateTime<Utc>,
    lock_timeout_ms: u64,
) -> Result<Option<SlotQuota>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    set_lock_timeout(&mut tx, lock_timeout_ms).await?;

    let Some(quota) = lock_row(&mut tx, start_at).await? else {
        return Ok(None);
    };
    if quota.booked == 0 {
        return Ok(Some(quota));
    }

    let quota = write_row(&mut tx, start_at, quota.capacity, quota.booked - 1).await?;
    tx.commit().await?;
    Ok(Some(quota))
}

// ── Reads ──

pub async fn find_quota(
    pool: &PgPool,
    start_at: DateTime<Utc>,
) -> Result<Option<SlotQuota>, sqlx::Error> {
    sqlx::query_as("SELECT start_at, capacity, booked FROM slot_quotas WHERE start_at = $1")
        .bind(start_at)
        .fetch_optional(pool)
        .await
}

pub async fn list_between(
    pool: &PgPool,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<SlotQuota>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT start_at, capacity, booked
        FROM slot_quotas
        WHERE start_at >= $1 AND start_at < $2
        ORDER BY start_at
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await
}
