//! PostgreSQL ledger tests
//!
//! Need a disposable database:
//!
//! ```text
//! DATABASE_URL=postgres://localhost/booking_test cargo test -p booking-server --test postgres -- --ignored
//! ```
//!
//! Every test works on its own far-future day so runs do not collide.

use booking_server::db;
use booking_server::store::{PgStore, QuotaLedger, ReserveOutcome, RuleStore};
use booking_server::{BookingError, BookingService};
use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use chrono_tz::Europe::Paris;
use futures::future::join_all;
use shared::models::OpeningRuleUpsert;

async fn store() -> PgStore {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for postgres tests");
    let pool = db::connect(&url, 20).await.unwrap();
    PgStore::new(pool, 2000)
}

/// A unique instant on a random day far in the future
fn unique_slot() -> DateTime<Utc> {
    let offset_days = i64::from(rand::random::<u16>());
    Utc.with_ymd_and_hms(2200, 1, 1, 9, 0, 0).unwrap() + Duration::days(offset_days)
}

#[tokio::test]
#[ignore]
async fn test_reserve_release_roundtrip() {
    let store = store().await;
    let start_at = unique_slot();

    let ReserveOutcome::Reserved(quota) = store.reserve(start_at, 1).await.unwrap() else {
        panic!("first reservation must succeed");
    };
    assert_eq!((quota.capacity, quota.booked), (1, 1));
    assert!(matches!(
        store.reserve(start_at, 1).await.unwrap(),
        ReserveOutcome::Full(_)
    ));

    assert_eq!(store.release(start_at).await.unwrap().unwrap().booked, 0);
    // floored at zero
    assert_eq!(store.release(start_at).await.unwrap().unwrap().booked, 0);
}

#[tokio::test]
#[ignore]
async fn test_release_unknown_slot_creates_nothing() {
    let store = store().await;
    let start_at = unique_slot() + Duration::seconds(7);

    assert_eq!(store.release(start_at).await.unwrap(), None);
    assert_eq!(store.find(start_at).await.unwrap(), None);
}

#[tokio::test]
#[ignore]
async fn test_ensure_realigns_capacity_only() {
    let store = store().await;
    let start_at = unique_slot() + Duration::seconds(11);

    store.reserve(start_at, 2).await.unwrap();
    let quota = store.ensure(start_at, 5).await.unwrap();
    assert_eq!((quota.capacity, quota.booked), (5, 1));

    // unchanged capacity takes the no-update path
    let quota = store.ensure(start_at, 5).await.unwrap();
    assert_eq!((quota.capacity, quota.booked), (5, 1));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
#[ignore]
async fn test_concurrent_reservations_respect_capacity() {
    const CAPACITY: i32 = 3;
    let store = store().await;
    let start_at = unique_slot() + Duration::seconds(13);

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.reserve(start_at, CAPACITY).await })
        })
        .collect();

    let reserved = join_all(handles)
        .await
        .into_iter()
        .filter(|r| matches!(r, Ok(Ok(ReserveOutcome::Reserved(_)))))
        .count();
    assert_eq!(reserved, CAPACITY as usize);
    assert_eq!(store.find(start_at).await.unwrap().unwrap().booked, CAPACITY);
}

#[tokio::test]
#[ignore]
async fn test_service_over_postgres() {
    let store = store().await;
    // Sunday rule; the rule table is shared, so only this test writes Sunday
    let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
    store
        .upsert_rule(&OpeningRuleUpsert::open(6, t(9, 0), t(10, 0), 30, 1))
        .await
        .unwrap();
    let service = BookingService::from_store(store.clone(), Paris);

    // 2200-01-05 is a Sunday
    let date = chrono::NaiveDate::from_ymd_opt(2200, 1, 5).unwrap();
    let slots = service.list_slots_with_quota(date).await.unwrap();
    assert_eq!(slots.len(), 2);

    let start_at = slots[0].start_at.with_timezone(&Utc);
    if slots[0].remaining > 0 {
        service.try_book_slot(start_at).await.unwrap();
    }
    assert!(matches!(
        service.try_book_slot(start_at).await,
        Err(BookingError::SlotFull { .. })
    ));
    service.cancel_booking(start_at).await.unwrap();

    assert!(store.ping().await.is_ok());
}
