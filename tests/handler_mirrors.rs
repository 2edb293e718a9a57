mod common;

use axum::{Router, routing::get};
use axum_test::TestServer;
use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use mirror_collector::api::handlers::list_mirrors_handler;

async fn server(pool: SqlitePool) -> TestServer {
    let (state, _rx) = common::create_test_state(pool);
    let app = Router::new()
        .route("/mirrors", get(list_mirrors_handler))
        .with_state(state);

    TestServer::new(app).unwrap()
}

#[sqlx::test]
async fn test_list_mirrors_empty(pool: SqlitePool) {
    let server = server(pool).await;

    let response = server.get("/mirrors").await;

    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>(), serde_json::json!([]));
}

#[sqlx::test]
async fn test_list_mirrors_filters(pool: SqlitePool) {
    let now = Utc::now();
    common::create_test_mirror(&pool, "1win", "ar", "1win-ar.com", now - Duration::minutes(5)).await;
    common::create_test_mirror(&pool, "1win", "ar", "1win-ar2.com", now).await;
    common::create_test_mirror(&pool, "1win", "in", "1win.in", now).await;
    common::create_test_mirror(&pool, "stake", "ar", "stake.ar", now).await;

    let server = server(pool).await;

    let response = server
        .get("/mirrors")
        .add_query_param("country", "ar")
        .add_query_param("merchant", "1win")
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["final_domain"], "1win-ar2.com");
    assert_eq!(items[1]["final_domain"], "1win-ar.com");
    assert!(items[0].get("first_seen_at").is_some());
}

#[sqlx::test]
async fn test_list_mirrors_empty_filter_values(pool: SqlitePool) {
    let now = Utc::now();
    common::create_test_mirror(&pool, "stake", "in", "stake.com", now).await;
    common::create_test_mirror(&pool, "stake", "br", "stake.bet.br", now).await;

    let server = server(pool).await;

    let response = server.get("/mirrors?country=&merchant=&limit=1").await;

    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>().as_array().unwrap().len(), 1);
}

#[sqlx::test]
async fn test_list_mirrors_invalid_limit(pool: SqlitePool) {
    let server = server(pool).await;

    let response = server.get("/mirrors").add_query_param("limit", "5000").await;

    response.assert_status_bad_request();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");
}
