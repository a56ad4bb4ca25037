//! Integration tests for the optimistic mutation store: the properties
//! the dashboard relies on, driven through the public API only.

use std::collections::BTreeSet;

use duckcross_api::{LineId, Profile, StationId};
use duckcross_http::MockBackend;
use duckcross_profile::ProfileStore;
use duckcross_session::AuthHeader;

// =========================================================================
// Helpers
// =========================================================================

fn auth() -> AuthHeader {
    AuthHeader::bearer("tok1")
}

fn base_profile_json() -> serde_json::Value {
    serde_json::json!({
        "id": "prof-1",
        "userId": "user-abc",
        "needsWelcome": false,
        "favoriteStations": ["s1", "s3"],
        "favoriteLines": ["M1"],
        "createdAt": "2025-03-01T10:00:00Z",
        "updatedAt": "2025-03-01T10:00:00Z"
    })
}

fn base_profile() -> Profile {
    serde_json::from_value(base_profile_json()).unwrap()
}

async fn loaded_store(mock: &MockBackend) -> ProfileStore<MockBackend> {
    mock.respond(200, base_profile_json());
    let mut store = ProfileStore::new(mock.clone());
    store.load(&auth()).await.unwrap();
    store
}

/// Scripts the backend to confirm every mutation by echoing back the
/// favorites the client sent, merged into the base profile. This is what
/// the real backend does: the PUT response is the full updated profile.
fn echo_station_favorites(mock: &MockBackend, favorites: &[&str]) {
    let mut profile = base_profile();
    profile.favorite_stations =
        favorites.iter().map(|s| StationId::from(*s)).collect();
    mock.respond(200, serde_json::to_value(&profile).unwrap());
}

// =========================================================================
// Toggle algebra
// =========================================================================

#[tokio::test]
async fn test_toggle_sequence_equals_xor_of_ids() {
    // For any sequence of successful toggles, the resulting set is the
    // initial set XOR'd with the toggled ids: s2 toggled once (in),
    // s3 toggled once (out), s1 untouched.
    let mock = MockBackend::new();
    let mut store = loaded_store(&mock).await;

    echo_station_favorites(&mock, &["s1", "s2", "s3"]);
    store
        .toggle_favorite_station(&auth(), StationId::from("s2"))
        .await
        .unwrap();

    echo_station_favorites(&mock, &["s1", "s2"]);
    store
        .toggle_favorite_station(&auth(), StationId::from("s3"))
        .await
        .unwrap();

    let expected: BTreeSet<StationId> =
        [StationId::from("s1"), StationId::from("s2")].into();
    assert_eq!(store.profile().unwrap().favorite_stations, expected);
}

#[tokio::test]
async fn test_double_toggle_returns_to_original_set() {
    let mock = MockBackend::new();
    let mut store = loaded_store(&mock).await;
    let original = store.profile().unwrap().favorite_stations.clone();

    echo_station_favorites(&mock, &["s1", "s2", "s3"]);
    store
        .toggle_favorite_station(&auth(), StationId::from("s2"))
        .await
        .unwrap();

    echo_station_favorites(&mock, &["s1", "s3"]);
    store
        .toggle_favorite_station(&auth(), StationId::from("s2"))
        .await
        .unwrap();

    assert_eq!(store.profile().unwrap().favorite_stations, original);
}

// =========================================================================
// Rollback exactness
// =========================================================================

#[tokio::test]
async fn test_failed_save_restores_identical_content() {
    let mock = MockBackend::new();
    let mut store = loaded_store(&mock).await;
    let before = store.profile().unwrap().clone();

    mock.respond(503, serde_json::json!({}));
    let result = store
        .toggle_favorite_station(&auth(), StationId::from("s9"))
        .await;

    assert!(result.is_err());
    assert_eq!(store.profile(), Some(&before));
}

#[tokio::test]
async fn test_rollback_preserves_earlier_confirmed_mutation() {
    // The case snapshot-rollback exists for: mutation A confirms, then
    // mutation B (built on A's result) fails. Rolling B back must land
    // on the state that *includes* A — a recomputed "undo of B" against
    // the original profile would silently drop A.
    let mock = MockBackend::new();
    let mut store = loaded_store(&mock).await;

    // A: favorite line M2 — confirmed by the server.
    let mut after_a = base_profile();
    after_a.favorite_lines.insert(LineId::from("M2"));
    mock.respond(200, serde_json::to_value(&after_a).unwrap());
    store
        .toggle_favorite_line(&auth(), LineId::from("M2"))
        .await
        .unwrap();

    // B: favorite station s9 — rejected.
    mock.fail("connection reset");
    let result = store
        .toggle_favorite_station(&auth(), StationId::from("s9"))
        .await;

    assert!(result.is_err());
    let profile = store.profile().unwrap();
    // A survived the rollback of B.
    assert!(profile.favorite_lines.contains(&LineId::from("M2")));
    // B is fully gone.
    assert!(!profile.favorite_stations.contains(&StationId::from("s9")));
    assert_eq!(profile, &after_a);
}

// =========================================================================
// Wire discipline
// =========================================================================

#[tokio::test]
async fn test_each_toggle_is_one_put() {
    let mock = MockBackend::new();
    let mut store = loaded_store(&mock).await;

    echo_station_favorites(&mock, &["s1", "s2", "s3"]);
    store
        .toggle_favorite_station(&auth(), StationId::from("s2"))
        .await
        .unwrap();

    // One GET (load) + one PUT (toggle).
    let seen = mock.requests();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[1].path, "/profile");
    assert_eq!(seen[1].method, duckcross_http::Method::Put);
}
