#![allow(dead_code)]

use std::str::FromStr;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{web, App};
use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use vendor_bookings::{db, routes};

/// A migrated in-memory database. One connection, kept alive, so every query sees the same data.
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();

    db::run_migrations(&pool).await.unwrap();
    pool
}

pub async fn send(pool: &SqlitePool, req: TestRequest) -> (StatusCode, Value) {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .configure(routes::configure),
    )
    .await;

    let resp = test::call_service(&app, req.to_request()).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

pub async fn register(pool: &SqlitePool, username: &str, role: &str) -> i64 {
    let (status, user) = send(
        pool,
        TestRequest::post().uri("/users").set_json(json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "role": role,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{user}");
    user["id"].as_i64().unwrap()
}

/// Registers a vendor account and returns the id of its vendor profile.
pub async fn vendor(pool: &SqlitePool, username: &str) -> i64 {
    let user_id = register(pool, username, "vendor").await;
    let (status, profile) = send(
        pool,
        TestRequest::get().uri(&format!("/users/{user_id}/vendor-profile")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    profile["id"].as_i64().unwrap()
}

pub async fn cuisine(pool: &SqlitePool, name: &str) -> i64 {
    let (status, cuisine) = send(
        pool,
        TestRequest::post()
            .uri("/cuisines")
            .set_json(json!({ "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    cuisine["id"].as_i64().unwrap()
}

/// Overwrites the vendor profile owned by `user_id`.
pub async fn set_profile(pool: &SqlitePool, user_id: i64, profile: Value) -> Value {
    let (status, body) = send(
        pool,
        TestRequest::put()
            .uri(&format!("/users/{user_id}/vendor-profile"))
            .set_json(profile),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body
}

pub async fn add_food(pool: &SqlitePool, vendor_id: i64, name: &str, price: f64) -> i64 {
    let (status, item) = send(
        pool,
        TestRequest::post()
            .uri(&format!("/vendors/{vendor_id}/food-items"))
            .set_json(json!({ "name": name, "price": price })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{item}");
    item["id"].as_i64().unwrap()
}

pub async fn review(pool: &SqlitePool, vendor_id: i64, user_id: i64, rating: i64) -> (StatusCode, Value) {
    send(
        pool,
        TestRequest::post()
            .uri(&format!("/vendors/{vendor_id}/reviews"))
            .set_json(json!({ "user_id": user_id, "rating": rating })),
    )
    .await
}

pub async fn book(pool: &SqlitePool, vendor_id: i64, tourist_id: i64, date: &str) -> (StatusCode, Value) {
    send(
        pool,
        TestRequest::post()
            .uri(&format!("/vendors/{vendor_id}/bookings"))
            .set_json(json!({
                "tourist_id": tourist_id,
                "booking_date": date,
                "booking_time": "18:00:00",
                "number_of_people": 2,
                "special_request": "Window seat",
            })),
    )
    .await
}
