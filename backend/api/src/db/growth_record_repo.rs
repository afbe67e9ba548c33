use crate::db::sequence_repo;
use crate::models::GrowthRecord;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;

/// Insert a growth record, allocating its number from the per-(user, plant)
/// counter in the same transaction so the number and the row commit
/// together.
pub async fn create_record(
    pool: &PgPool,
    plant_id: i64,
    user_id: i64,
    note: &str,
    recorded_on: NaiveDate,
) -> Result<GrowthRecord, sqlx::Error> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let number = sequence_repo::next_number_in_tx(&mut tx, user_id, plant_id).await?;

    let record = sqlx::query_as::<_, GrowthRecord>(
        r#"
        INSERT INTO growth_records
            (plant_id, user_id, record_number, note, recorded_on, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $6)
        RETURNING id, plant_id, user_id, record_number, note, recorded_on, created_at, updated_at
        "#,
    )
    .bind(plant_id)
    .bind(user_id)
    .bind(number)
    .bind(note)
    .bind(recorded_on)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(record)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<GrowthRecord>, sqlx::Error> {
    sqlx::query_as::<_, GrowthRecord>(
        r#"
        SELECT id, plant_id, user_id, record_number, note, recorded_on, created_at, updated_at
        FROM growth_records
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn list_by_plant(pool: &PgPool, plant_id: i64) -> Result<Vec<GrowthRecord>, sqlx::Error> {
    sqlx::query_as::<_, GrowthRecord>(
        r#"
        SELECT id, plant_id, user_id, record_number, note, recorded_on, created_at, updated_at
        FROM growth_records
        WHERE plant_id = $1
        ORDER BY record_number
        "#,
    )
    .bind(plant_id)
    .fetch_all(pool)
    .await
}

pub async fn update_record(
    pool: &PgPool,
    id: i64,
    note: Option<&str>,
    recorded_on: Option<NaiveDate>,
) -> Result<GrowthRecord, sqlx::Error> {
    sqlx::query_as::<_, GrowthRecord>(
        r#"
        UPDATE growth_records
        SET note = COALESCE($1, note),
            recorded_on = COALESCE($2, recorded_on),
            updated_at = $3
        WHERE id = $4
        RETURNING id, plant_id, user_id, record_number, note, recorded_on, created_at, updated_at
        "#,
    )
    .bind(note)
    .bind(recorded_on)
    .bind(Utc::now())
    .bind(id)
    .fetch_one(pool)
    .await
}

/// Deleting a record leaves its number unused; the counter never goes
/// backwards on the hot path.
pub async fn delete_record(pool: &PgPool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM growth_records WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
