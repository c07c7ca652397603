#![cfg(feature = "e2e-tests")]

//! The ordered bookmark session against one instance on a fixed port.
//! Run with: cargo test --test api-e2e --features e2e-tests

use bookmarks::suite::bookmark_session;
use bookmarks::test_support::{TestUser, e2e_port, spawn_app, spawn_app_on_port};
use serde_json::Value;
use std::net::TcpListener;
use std::time::Duration;

async fn count_rows(app: &bookmarks::test_support::TestApp, table: &str) -> i64 {
    let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(&app.db_connection_pool)
        .await
        .expect("Failed to count rows.");
    count
}

async fn port_is_free(port: u16) -> bool {
    for _ in 0..50 {
        if TcpListener::bind(("127.0.0.1", port)).is_ok() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}

#[tokio::test]
async fn bookmark_session_passes_end_to_end() {
    let pipeline = bookmark_session().expect("Invalid scenario pipeline.");
    let app = spawn_app_on_port("e2e-bookmark-session", e2e_port()).await;
    app.reset().await;

    let report = pipeline.run(&app.driver()).await;
    app.shutdown().await;

    println!("{}", report);
    assert!(report.is_success(), "\n{}", report);
    assert_eq!(report.passed(), pipeline.scenarios().len());
}

#[tokio::test]
async fn stored_values_are_threaded_through_the_session() {
    let pipeline = bookmark_session().expect("Invalid scenario pipeline.");
    let app = spawn_app_on_port("e2e-stored-values", 0).await;

    let report = pipeline.run(&app.driver()).await;
    app.shutdown().await;

    assert!(report.is_success(), "\n{}", report);
    let context = report.context();
    for key in ["userAccessToken", "userId", "bookmarkId"] {
        assert!(context.get(key).is_some_and(|value| !value.is_empty()), "{} missing", key);
    }
}

#[tokio::test]
async fn reset_purges_users_and_bookmarks() {
    let app = spawn_app("e2e-reset").await;
    let user = TestUser::generate();
    let token = user.signup(&app).await;
    app.create_bookmark(&token, "The Fall").await;
    assert_eq!(count_rows(&app, "bookmarks").await, 1);

    app.reset().await;

    assert_eq!(count_rows(&app, "users").await, 0);
    assert_eq!(count_rows(&app, "bookmarks").await, 0);
    let listed: Value = app.get_bookmarks(&token).await.json().await.unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 0);
    assert_eq!(app.post_signup(&user.credentials()).await.status().as_u16(), 201);
}

#[tokio::test]
async fn port_is_released_after_shutdown() {
    let app = spawn_app("e2e-release-on-shutdown").await;
    let port = app.port;

    app.shutdown().await;

    assert!(TcpListener::bind(("127.0.0.1", port)).is_ok());
}

#[tokio::test]
async fn port_is_released_when_the_app_is_dropped() {
    let app = spawn_app("e2e-release-on-drop").await;
    let port = app.port;
    assert_eq!(app.get_bookmarks("no-token").await.status().as_u16(), 401);

    drop(app);

    assert!(port_is_free(port).await, "port {} is still bound", port);
}
