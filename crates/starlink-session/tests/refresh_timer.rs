mod common;

use std::time::Duration;

use common::{FakeIssuer, Harness, drain, settle, user};
use starlink_models::Credentials;
use starlink_session::{SessionEvent, SessionStatus};

const INTERVAL: Duration = Duration::from_secs(15 * 60);

async fn sleep_past(ticks: u32) {
    tokio::time::sleep(INTERVAL * ticks + Duration::from_secs(1)).await;
    settle().await;
}

#[tokio::test(start_paused = true)]
async fn test_timer_refreshes_every_interval() {
    let h = Harness::new(FakeIssuer::new(user(&["Client"], &[])));
    h.login().await;

    tokio::time::sleep(INTERVAL - Duration::from_secs(1)).await;
    settle().await;
    assert_eq!(h.issuer.refreshes(), 0);

    tokio::time::sleep(Duration::from_secs(2)).await;
    settle().await;
    assert_eq!(h.issuer.refreshes(), 1);
    assert_eq!(h.store.access_token().as_deref(), Some("access-1"));

    sleep_past(1).await;
    assert_eq!(h.issuer.refreshes(), 2);
    assert!(h.store.is_authenticated());
}

#[tokio::test(start_paused = true)]
async fn test_timer_failure_terminates_session() {
    let h = Harness::new(FakeIssuer::new(user(&["Client"], &[])).failing_refresh());
    h.login().await;
    let mut events = h.store.events();

    sleep_past(1).await;

    assert_eq!(h.issuer.refreshes(), 1);
    assert_eq!(h.store.status(), SessionStatus::Unauthenticated);
    assert!(h.stored_tokens().await.is_none());
    assert!(!h.store.has_active_timer());
    assert!(matches!(
        drain(&mut events).as_slice(),
        [SessionEvent::Terminated { .. }]
    ));

    sleep_past(3).await;
    assert_eq!(h.issuer.refreshes(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_logout_cancels_timer() {
    let h = Harness::new(FakeIssuer::new(user(&["Client"], &[])));
    h.login().await;
    assert!(h.store.has_active_timer());

    h.store.logout().await;
    sleep_past(4).await;

    assert_eq!(h.issuer.refreshes(), 0);
    assert!(!h.store.has_active_timer());
}

#[tokio::test(start_paused = true)]
async fn test_relogin_keeps_a_single_timer() {
    let h = Harness::new(FakeIssuer::new(user(&["Client"], &[])));
    h.login().await;
    h.store
        .login(&Credentials::new("a@b.com", common::PASSWORD))
        .await
        .unwrap();

    sleep_past(1).await;

    assert_eq!(h.issuer.refreshes(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_store_stops_timer() {
    let h = Harness::new(FakeIssuer::new(user(&["Client"], &[])));
    h.login().await;
    let issuer = h.issuer.clone();
    drop(h);

    sleep_past(4).await;

    assert_eq!(issuer.refreshes(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_stops_timer_but_keeps_session() {
    let h = Harness::new(FakeIssuer::new(user(&["Client"], &[])));
    h.login().await;

    h.store.shutdown();
    sleep_past(2).await;

    assert_eq!(h.issuer.refreshes(), 0);
    assert!(h.store.is_authenticated());
}
