mod common;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use serde_json::json;
use sqlx::SqlitePool;

use common::{register, review, send, test_pool, vendor};

async fn average_rating(pool: &SqlitePool, vendor_id: i64) -> f64 {
    sqlx::query_scalar("SELECT average_rating FROM vendor_profiles WHERE id = ?")
        .bind(vendor_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[actix_web::test]
async fn average_rating_follows_reviews() {
    let pool = test_pool().await;
    let vendor_id = vendor(&pool, "sushi").await;
    let alice = register(&pool, "alice", "tourist").await;
    let bob = register(&pool, "bob", "tourist").await;

    assert_eq!(average_rating(&pool, vendor_id).await, 0.0);

    let (status, first) = review(&pool, vendor_id, alice, 5).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(average_rating(&pool, vendor_id).await, 5.0);

    let (_, second) = review(&pool, vendor_id, bob, 2).await;
    assert_eq!(average_rating(&pool, vendor_id).await, 3.5);

    let id = first["id"].as_i64().unwrap();
    let (status, updated) = send(
        &pool,
        TestRequest::put()
            .uri(&format!("/reviews/{id}"))
            .set_json(json!({ "user_id": alice, "rating": 4, "comment": "Still good" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["comment"], "Still good");
    assert_eq!(average_rating(&pool, vendor_id).await, 3.0);

    let id = second["id"].as_i64().unwrap();
    let (status, _) = send(
        &pool,
        TestRequest::delete().uri(&format!("/reviews/{id}?user_id={bob}")),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(average_rating(&pool, vendor_id).await, 4.0);
}

#[actix_web::test]
async fn deleting_the_last_review_resets_rating_to_zero() {
    let pool = test_pool().await;
    let vendor_id = vendor(&pool, "sushi").await;
    let alice = register(&pool, "alice", "tourist").await;
    let (_, created) = review(&pool, vendor_id, alice, 3).await;
    let id = created["id"].as_i64().unwrap();

    let (status, _) = send(
        &pool,
        TestRequest::delete().uri(&format!("/reviews/{id}?user_id={alice}")),
    )
    .await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(average_rating(&pool, vendor_id).await, 0.0);
}

#[actix_web::test]
async fn one_review_per_user_per_vendor() {
    let pool = test_pool().await;
    let vendor_id = vendor(&pool, "sushi").await;
    let alice = register(&pool, "alice", "tourist").await;
    review(&pool, vendor_id, alice, 4).await;

    let (status, body) = review(&pool, vendor_id, alice, 1).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "You've already reviewed this vendor.");
    assert_eq!(average_rating(&pool, vendor_id).await, 4.0);
}

#[actix_web::test]
async fn rating_must_be_between_one_and_five() {
    let pool = test_pool().await;
    let vendor_id = vendor(&pool, "sushi").await;
    let alice = register(&pool, "alice", "tourist").await;

    let (status, _) = review(&pool, vendor_id, alice, 6).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = review(&pool, vendor_id, alice, 0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn only_the_author_can_change_a_review() {
    let pool = test_pool().await;
    let vendor_id = vendor(&pool, "sushi").await;
    let alice = register(&pool, "alice", "tourist").await;
    let bob = register(&pool, "bob", "tourist").await;
    let (_, created) = review(&pool, vendor_id, alice, 5).await;
    let id = created["id"].as_i64().unwrap();

    let (status, _) = send(
        &pool,
        TestRequest::put()
            .uri(&format!("/reviews/{id}"))
            .set_json(json!({ "user_id": bob, "rating": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &pool,
        TestRequest::delete().uri(&format!("/reviews/{id}?user_id={bob}")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(average_rating(&pool, vendor_id).await, 5.0);
}

#[actix_web::test]
async fn vendor_detail_shows_menu_reviews_and_similar_vendors() {
    let pool = test_pool().await;
    let thai = common::cuisine(&pool, "Thai").await;
    let italian = common::cuisine(&pool, "Italian").await;

    let mut thai_vendors = Vec::new();
    for name in ["basil", "lemongrass", "galangal", "tamarind", "chili"] {
        let user_id = register(&pool, name, "vendor").await;
        let profile = common::set_profile(
            &pool,
            user_id,
            json!({ "business_name": name, "cuisine_id": thai }),
        )
        .await;
        thai_vendors.push(profile["id"].as_i64().unwrap());
    }
    let pasta_user = register(&pool, "pasta", "vendor").await;
    common::set_profile(
        &pool,
        pasta_user,
        json!({ "business_name": "pasta", "cuisine_id": italian }),
    )
    .await;

    let alice = register(&pool, "alice", "tourist").await;
    review(&pool, thai_vendors[1], alice, 5).await;
    review(&pool, thai_vendors[2], alice, 4).await;
    review(&pool, thai_vendors[3], alice, 3).await;
    review(&pool, thai_vendors[4], alice, 1).await;

    let basil = thai_vendors[0];
    common::add_food(&pool, basil, "Pad Thai", 12.0).await;
    common::add_food(&pool, basil, "Green Curry", 14.5).await;
    review(&pool, basil, alice, 4).await;

    let (status, detail) = send(&pool, TestRequest::get().uri(&format!("/vendors/{basil}"))).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(detail["vendor"]["business_name"], "basil");
    assert_eq!(detail["food_items"][0]["name"], "Green Curry");
    assert_eq!(detail["food_items"][1]["name"], "Pad Thai");
    assert_eq!(detail["reviews"][0]["username"], "alice");

    let similar: Vec<&str> = detail["similar_vendors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["business_name"].as_str().unwrap())
        .collect();
    assert_eq!(similar, vec!["lemongrass", "galangal", "tamarind"]);

    let (status, _) = send(&pool, TestRequest::get().uri("/vendors/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn vendors_without_cuisine_have_no_similar_vendors() {
    let pool = test_pool().await;
    let first = vendor(&pool, "stall").await;
    vendor(&pool, "cart").await;

    let (status, detail) = send(&pool, TestRequest::get().uri(&format!("/vendors/{first}"))).await;

    assert_eq!(status, StatusCode::OK);
    assert!(detail["vendor"]["cuisine_id"].is_null());
    assert_eq!(detail["similar_vendors"], json!([]));
}
