//! Opening rule database operations

use shared::models::{OpeningRule, OpeningRuleUpsert};
use sqlx::PgPool;

pub async fn find_active_by_weekday(
    pool: &PgPool,
    weekday: i16,
) -> Result<Option<OpeningRule>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT id, weekday, open_time, close_time, slot_duration_minutes,
               capacity_per_slot, is_active
        FROM opening_rules
        WHERE weekday = $1 AND is_active
        "#,
    )
    .bind(weekday)
    .fetch_optional(pool)
    .await
}

pub async fn list_rules(pool: &PgPool) -> Result<Vec<OpeningRule>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT id, weekday, open_time, close_time, slot_duration_minutes,
               capacity_per_slot, is_active
        FROM opening_rules
        ORDER BY weekday
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn upsert_rule(
    pool: &PgPool,
    data: &OpeningRuleUpsert,
) -> Result<OpeningRule, sqlx::Error> {
    let now = shared::util::now_millis();
    sqlx::query_as(
        r#"
        INSERT INTO opening_rules (
            id, weekday, open_time, close_time, slot_duration_minutes,
            capacity_per_slot, is_active, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (weekday)
        DO UPDATE SET
            open_time = EXCLUDED.open_time, close_time = EXCLUDED.close_time,
            slot_duration_minutes = EXCLUDED.slot_duration_minutes,
            capacity_per_slot = EXCLUDED.capacity_per_slot,
            is_active = EXCLUDED.is_active, updated_at = EXCLUDED.updated_at
        RETURNING id, weekday, open_time, close_time, slot_duration_minutes,
                  capacity_per_slot, is_active
        "#,
    )
    .bind(shared::util::snowflake_id())
    .bind(data.weekday)
    .bind(data.open_time)
    .bind(data.close_time)
    .bind(data.slot_duration_minutes)
    .bind(data.capacity_per_slot)
    .bind(data.is_active)
    .bind(now)
    .fetch_one(pool)
    .await
}
