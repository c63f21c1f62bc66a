mod helpers;

use chrono::Duration;
use delirium_domain::EvictionPolicy;
use helpers::{all_stores, fixed_now};
use std::net::Ipv4Addr;

const X1: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 1);
const X2: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 2);

#[tokio::test]
async fn test_upsert_inserts_active_record() {
    for (backend, store) in all_stores().await {
        let now = fixed_now();

        let record = store.upsert_active("a.test", X1, 60, now).await.unwrap();

        assert_eq!(record.name.as_ref(), "a.test", "{}", backend);
        assert_eq!(record.address, X1, "{}", backend);
        assert_eq!(record.expires_at, now + Duration::seconds(60), "{}", backend);
        assert!(!record.expired, "{}", backend);
        assert!(record.id > 0, "{}", backend);
    }
}

#[tokio::test]
async fn test_upsert_refresh_keeps_address_and_extends_expiry() {
    for (backend, store) in all_stores().await {
        let now = fixed_now();
        let first = store.upsert_active("a.test", X1, 60, now).await.unwrap();

        let later = now + Duration::seconds(30);
        let refreshed = store.upsert_active("a.test", X2, 60, later).await.unwrap();

        assert_eq!(refreshed.id, first.id, "{}", backend);
        assert_eq!(refreshed.address, X1, "{}", backend);
        assert_eq!(refreshed.expires_at, later + Duration::seconds(60), "{}", backend);
        assert_eq!(store.find_by_status(false).await.unwrap().len(), 1, "{}", backend);
    }
}

#[tokio::test]
async fn test_upsert_never_shortens_expiry() {
    for (backend, store) in all_stores().await {
        let now = fixed_now();
        let first = store.upsert_active("a.test", X1, 600, now).await.unwrap();

        let refreshed = store.upsert_active("a.test", X1, 5, now).await.unwrap();

        assert_eq!(refreshed.expires_at, first.expires_at, "{}", backend);
    }
}

#[tokio::test]
async fn test_find_filters_by_expired_flag() {
    for (backend, store) in all_stores().await {
        let now = fixed_now();
        store.upsert_active("a.test", X1, 10, now).await.unwrap();
        store.upsert_active("b.test", X2, 100, now).await.unwrap();

        let marked = store
            .sweep_expired(EvictionPolicy::Mark, now + Duration::seconds(10))
            .await
            .unwrap();
        assert_eq!(marked, 1, "{}", backend);

        assert!(store.find_by_name("a.test", false).await.unwrap().is_empty());
        assert_eq!(store.find_by_name("a.test", true).await.unwrap().len(), 1);
        assert!(store.find_by_address(X1, false).await.unwrap().is_empty());
        assert_eq!(store.find_by_address(X1, true).await.unwrap().len(), 1);
        assert_eq!(store.find_by_address(X2, false).await.unwrap().len(), 1);

        let active = store.find_by_status(false).await.unwrap();
        assert_eq!(active.len(), 1, "{}", backend);
        assert_eq!(active[0].name.as_ref(), "b.test");
    }
}

#[tokio::test]
async fn test_mark_sweep_is_idempotent() {
    for (backend, store) in all_stores().await {
        let now = fixed_now();
        store.upsert_active("a.test", X1, 1, now).await.unwrap();
        let later = now + Duration::seconds(5);

        assert_eq!(store.sweep_expired(EvictionPolicy::Mark, later).await.unwrap(), 1);
        assert_eq!(
            store.sweep_expired(EvictionPolicy::Mark, later).await.unwrap(),
            0,
            "{}",
            backend
        );
        assert_eq!(store.find_by_status(true).await.unwrap().len(), 1);
    }
}

#[tokio::test]
async fn test_delete_sweep_removes_marked_and_unmarked() {
    for (backend, store) in all_stores().await {
        let now = fixed_now();
        store.upsert_active("a.test", X1, 1, now).await.unwrap();
        store
            .sweep_expired(EvictionPolicy::Mark, now + Duration::seconds(1))
            .await
            .unwrap();
        store
            .upsert_active("b.test", X2, 2, now + Duration::seconds(1))
            .await
            .unwrap();

        let deleted = store
            .sweep_expired(EvictionPolicy::Delete, now + Duration::seconds(10))
            .await
            .unwrap();

        assert_eq!(deleted, 2, "{}", backend);
        assert!(store.find_by_status(false).await.unwrap().is_empty());
        assert!(store.find_by_status(true).await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_sweep_boundary_is_inclusive() {
    for (backend, store) in all_stores().await {
        let now = fixed_now();
        store.upsert_active("a.test", X1, 10, now).await.unwrap();

        let just_before = now + Duration::milliseconds(9_999);
        assert_eq!(
            store.sweep_expired(EvictionPolicy::Mark, just_before).await.unwrap(),
            0,
            "{}",
            backend
        );

        let exactly = now + Duration::seconds(10);
        assert_eq!(
            store.sweep_expired(EvictionPolicy::Mark, exactly).await.unwrap(),
            1,
            "{}",
            backend
        );
    }
}

#[tokio::test]
async fn test_marked_name_can_be_bound_again() {
    for (backend, store) in all_stores().await {
        let now = fixed_now();
        let old = store.upsert_active("a.test", X1, 1, now).await.unwrap();
        let later = now + Duration::seconds(2);
        store.sweep_expired(EvictionPolicy::Mark, later).await.unwrap();

        let fresh = store.upsert_active("a.test", X2, 60, later).await.unwrap();

        assert_ne!(fresh.id, old.id, "{}", backend);
        assert_eq!(fresh.address, X2, "{}", backend);
        assert_eq!(store.find_by_name("a.test", true).await.unwrap().len(), 1);
        assert_eq!(store.find_by_name("a.test", false).await.unwrap().len(), 1);
    }
}

#[tokio::test]
async fn test_active_addresses_excludes_expired() {
    for (backend, store) in all_stores().await {
        let now = fixed_now();
        store.upsert_active("a.test", X1, 1, now).await.unwrap();
        store.upsert_active("b.test", X2, 100, now).await.unwrap();
        store
            .sweep_expired(EvictionPolicy::Mark, now + Duration::seconds(1))
            .await
            .unwrap();

        let active = store.active_addresses().await.unwrap();

        assert_eq!(active.len(), 1, "{}", backend);
        assert!(active.contains(&X2), "{}", backend);
    }
}

#[tokio::test]
async fn test_find_by_status_is_oldest_first() {
    for (backend, store) in all_stores().await {
        let now = fixed_now();
        for (i, name) in ["c.test", "a.test", "b.test"].iter().enumerate() {
            store
                .upsert_active(name, Ipv4Addr::new(10, 0, 0, i as u8 + 1), 60, now)
                .await
                .unwrap();
        }

        let names: Vec<String> = store
            .find_by_status(false)
            .await
            .unwrap()
            .into_iter()
            .map(|record| record.name.to_string())
            .collect();

        assert_eq!(names, vec!["c.test", "a.test", "b.test"], "{}", backend);
    }
}
