//! Record-numbering behavior against a live database. These tests run only
//! when TEST_DATABASE_URL points at a Postgres instance; migrations are
//! applied on connect and each test works under its own freshly created
//! user so runs do not interfere.

mod common;

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use common::db_pool as test_pool;
use hatake_api::db::{growth_record_repo, plant_repo, sequence_repo, user_repo};
use hatake_api::models::{Plant, User};

async fn seed_user_and_plant(pool: &PgPool) -> (User, Plant) {
    let email = format!("seq-{}@example.com", Uuid::new_v4());
    let user = user_repo::create_user(pool, &email, "テスト", "hash", "token")
        .await
        .expect("create user");
    let plant = plant_repo::create_plant(pool, user.id, "ミニトマト", None, None)
        .await
        .expect("create plant");
    (user, plant)
}

#[actix_web::test]
async fn numbers_start_at_one_and_increment() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let (user, plant) = seed_user_and_plant(&pool).await;

    for expected in 1..=3 {
        let n = sequence_repo::next_number(&pool, user.id, plant.id)
            .await
            .expect("allocate");
        assert_eq!(n, expected);
    }
}

#[actix_web::test]
async fn counters_are_independent_per_plant() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let (user, plant_a) = seed_user_and_plant(&pool).await;
    let plant_b = plant_repo::create_plant(&pool, user.id, "きゅうり", None, None)
        .await
        .expect("create plant");

    sequence_repo::next_number(&pool, user.id, plant_a.id)
        .await
        .expect("allocate");
    sequence_repo::next_number(&pool, user.id, plant_a.id)
        .await
        .expect("allocate");

    let first_for_b = sequence_repo::next_number(&pool, user.id, plant_b.id)
        .await
        .expect("allocate");
    assert_eq!(first_for_b, 1);
}

#[actix_web::test]
async fn concurrent_allocation_yields_distinct_numbers() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let (user, plant) = seed_user_and_plant(&pool).await;

    let tasks: Vec<_> = (0..50)
        .map(|_| {
            let pool = pool.clone();
            let (user_id, plant_id) = (user.id, plant.id);
            tokio::spawn(
                async move { sequence_repo::next_number(&pool, user_id, plant_id).await },
            )
        })
        .collect();

    let mut numbers = Vec::new();
    for task in tasks {
        numbers.push(task.await.expect("join").expect("allocate"));
    }

    numbers.sort_unstable();
    assert_eq!(numbers, (1..=50).collect::<Vec<i32>>());
}

#[actix_web::test]
async fn deleting_a_record_does_not_reuse_its_number() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let (user, plant) = seed_user_and_plant(&pool).await;
    let today = Utc::now().date_naive();

    let first = growth_record_repo::create_record(&pool, plant.id, user.id, "発芽", today)
        .await
        .expect("create record");
    let second = growth_record_repo::create_record(&pool, plant.id, user.id, "本葉", today)
        .await
        .expect("create record");
    assert_eq!((first.record_number, second.record_number), (1, 2));

    growth_record_repo::delete_record(&pool, second.id)
        .await
        .expect("delete record");

    let third = growth_record_repo::create_record(&pool, plant.id, user.id, "開花", today)
        .await
        .expect("create record");
    assert_eq!(third.record_number, 3);
}

#[actix_web::test]
async fn resequence_closes_gaps_and_resets_counters() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let (user, plant) = seed_user_and_plant(&pool).await;
    let today = Utc::now().date_naive();

    let mut ids = Vec::new();
    for note in ["発芽", "本葉", "開花", "収穫"] {
        let record = growth_record_repo::create_record(&pool, plant.id, user.id, note, today)
            .await
            .expect("create record");
        ids.push(record.id);
    }

    growth_record_repo::delete_record(&pool, ids[1])
        .await
        .expect("delete record");

    sequence_repo::resequence_all(&pool)
        .await
        .expect("resequence");

    let records = growth_record_repo::list_by_plant(&pool, plant.id)
        .await
        .expect("list records");
    let numbers: Vec<i32> = records.iter().map(|r| r.record_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);

    // The counter continues from the compacted count.
    let next = sequence_repo::next_number(&pool, user.id, plant.id)
        .await
        .expect("allocate");
    assert_eq!(next, 4);
}
