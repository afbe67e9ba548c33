//! Growth-record numbering. One counter row per (user, plant); the row is
//! locked for the read-increment-write section so concurrent callers never
//! observe the same number.

use sqlx::{PgPool, Postgres, Transaction};

/// Allocate the next record number for (user_id, plant_id).
///
/// Creates the counter at 0 on first use, then locks the single row with
/// `SELECT .. FOR UPDATE`, increments, and returns the new value. The lock
/// covers only the increment; callers must not hold it across unrelated
/// work.
pub async fn next_number(pool: &PgPool, user_id: i64, plant_id: i64) -> Result<i32, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let number = next_number_in_tx(&mut tx, user_id, plant_id).await?;
    tx.commit().await?;
    Ok(number)
}

/// Same allocation, inside a caller-owned transaction, so record insertion
/// and numbering commit atomically.
pub async fn next_number_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i64,
    plant_id: i64,
) -> Result<i32, sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO growth_record_sequences (user_id, plant_id, last_number)
        VALUES ($1, $2, 0)
        ON CONFLICT (user_id, plant_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(plant_id)
    .execute(&mut **tx)
    .await?;

    let current: i32 = sqlx::query_scalar(
        r#"
        SELECT last_number FROM growth_record_sequences
        WHERE user_id = $1 AND plant_id = $2
        FOR UPDATE
        "#,
    )
    .bind(user_id)
    .bind(plant_id)
    .fetch_one(&mut **tx)
    .await?;

    let next = current + 1;

    sqlx::query(
        r#"
        UPDATE growth_record_sequences
        SET last_number = $3
        WHERE user_id = $1 AND plant_id = $2
        "#,
    )
    .bind(user_id)
    .bind(plant_id)
    .bind(next)
    .execute(&mut **tx)
    .await?;

    Ok(next)
}

/// Administrative backfill: reassign record numbers 1..N per (user, plant)
/// ordered by creation time, and reset each counter to N. Exclusive
/// operation; takes a table lock so it cannot interleave with live
/// allocation.
pub async fn resequence_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("LOCK TABLE growth_record_sequences IN ACCESS EXCLUSIVE MODE")
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query(
        r#"
        WITH ranked AS (
            SELECT id,
                   ROW_NUMBER() OVER (
                       PARTITION BY user_id, plant_id
                       ORDER BY created_at, id
                   ) AS rn
            FROM growth_records
        )
        UPDATE growth_records g
        SET record_number = ranked.rn
        FROM ranked
        WHERE g.id = ranked.id
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        UPDATE growth_record_sequences s
        SET last_number = COALESCE(counts.n, 0)
        FROM (
            SELECT user_id, plant_id, COUNT(*) AS n
            FROM growth_records
            GROUP BY user_id, plant_id
        ) AS counts
        WHERE s.user_id = counts.user_id AND s.plant_id = counts.plant_id
        "#,
    )
    .execute(&mut *tx)
    .await?;

    // Counters whose records were all deleted restart from zero.
    sqlx::query(
        r#"
        UPDATE growth_record_sequences s
        SET last_number = 0
        WHERE NOT EXISTS (
            SELECT 1 FROM growth_records g
            WHERE g.user_id = s.user_id AND g.plant_id = s.plant_id
        )
        "#,
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(result.rows_affected())
}
