//! Browser-only checks for the pieces backed by web APIs.

use std::time::Duration;
use wasm_bindgen_test::*;

use crate::cache::{CacheStore, SessionStorageStore, TtlCache};
use crate::clock::{BrowserClock, Clock, with_timeout};
use crate::portal::{browser_hostname, resolve_portal};
use civic_shared::models::SystemStatus;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn session_storage_backs_the_setup_cache() {
    let cache: TtlCache<SystemStatus, SessionStorageStore> =
        TtlCache::new(SessionStorageStore, "civic.test.setupStatus", Duration::from_secs(300));
    let now = BrowserClock.now_ms();

    cache.put(&SystemStatus { setup_required: true }, now);
    assert_eq!(cache.get(now + 1), Some(SystemStatus { setup_required: true }));

    cache.invalidate();
    assert_eq!(SessionStorageStore.read("civic.test.setupStatus"), Ok(None));
}

#[wasm_bindgen_test]
fn setup_cache_is_stored_as_a_plain_object() {
    let key = "civic.test.rawShape";
    let cache: TtlCache<SystemStatus, SessionStorageStore> =
        TtlCache::new(SessionStorageStore, key, Duration::from_secs(300));

    cache.put(&SystemStatus { setup_required: true }, 1_000);

    let raw = SessionStorageStore.read(key).unwrap().unwrap();
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored, serde_json::json!({ "setupRequired": true, "checkedAt": 1_000 }));
    cache.invalidate();
}

#[wasm_bindgen_test]
fn setup_cache_reads_entries_written_by_hand() {
    let key = "civic.test.handWritten";
    let storage = web_sys::window().unwrap().session_storage().unwrap().unwrap();
    storage
        .set_item(key, r#"{"setupRequired":false,"checkedAt":5000}"#)
        .unwrap();
    let cache: TtlCache<SystemStatus, SessionStorageStore> =
        TtlCache::new(SessionStorageStore, key, Duration::from_secs(300));

    assert_eq!(cache.get(6_000), Some(SystemStatus { setup_required: false }));
    assert_eq!(
        storage.get_item(key).unwrap().as_deref(),
        Some(r#"{"setupRequired":false,"checkedAt":5000}"#)
    );
    cache.invalidate();
    assert_eq!(storage.get_item(key).unwrap(), None);
}

#[wasm_bindgen_test]
fn test_runner_host_is_the_main_portal() {
    assert!(!browser_hostname().is_empty());
    assert_eq!(resolve_portal(&browser_hostname()), crate::portal::Portal::Main);
}

#[wasm_bindgen_test]
async fn browser_timers_bound_slow_work() {
    let clock = BrowserClock;
    let output = with_timeout(
        &clock,
        Duration::from_millis(10),
        gloo_timers::future::sleep(Duration::from_secs(5)),
    )
    .await;
    assert_eq!(output, None);
}
