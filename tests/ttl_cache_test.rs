use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use voxpulse::application::services::TtlCache;

fn key() -> String {
    "pk_live".to_string()
}

#[tokio::test(start_paused = true)]
async fn given_fresh_entry_when_reading_then_loader_is_not_called() {
    let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(60));
    let loads = AtomicU32::new(0);

    for _ in 0..3 {
        let value = cache
            .get_or_refresh(&key(), || async {
                loads.fetch_add(1, Ordering::SeqCst);
                Ok::<_, String>(Some(7))
            })
            .await
            .unwrap();
        assert_eq!(value, Some(7));
    }

    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn given_expired_entry_when_reading_then_value_is_refreshed() {
    let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(60));
    cache
        .get_or_refresh(&key(), || async { Ok::<_, String>(Some(1)) })
        .await
        .unwrap();

    tokio::time::advance(Duration::from_secs(61)).await;

    let value = cache
        .get_or_refresh(&key(), || async { Ok::<_, String>(Some(2)) })
        .await
        .unwrap();
    assert_eq!(value, Some(2));
}

#[tokio::test(start_paused = true)]
async fn given_expired_entry_and_failing_refresh_when_reading_then_stale_value_is_served() {
    let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(60));
    cache
        .get_or_refresh(&key(), || async { Ok::<_, String>(Some(1)) })
        .await
        .unwrap();

    tokio::time::advance(Duration::from_secs(61)).await;

    let value = cache
        .get_or_refresh(&key(), || async {
            Err::<Option<u32>, _>("database unreachable".to_string())
        })
        .await;
    assert_eq!(value, Ok(Some(1)));
}

#[tokio::test(start_paused = true)]
async fn given_no_entry_and_failing_load_when_reading_then_error_is_returned() {
    let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(60));

    let value = cache
        .get_or_refresh(&key(), || async {
            Err::<Option<u32>, _>("database unreachable".to_string())
        })
        .await;
    assert_eq!(value, Err("database unreachable".to_string()));
}

#[tokio::test(start_paused = true)]
async fn given_invalidated_entry_when_reading_then_loader_runs_again() {
    let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(60));
    cache
        .get_or_refresh(&key(), || async { Ok::<_, String>(Some(1)) })
        .await
        .unwrap();

    cache.invalidate(&key());

    let value = cache
        .get_or_refresh(&key(), || async { Ok::<_, String>(None) })
        .await
        .unwrap();
    assert_eq!(value, None);
}
