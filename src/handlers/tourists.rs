use actix_web::{web, HttpResponse};
use chrono::Utc;
use sqlx::SqlitePool;
use validator::Validate;

use super::users::fetch_user;
use crate::error::{AppError, AppResult};
use crate::models::booking::TouristBooking;
use crate::models::review::AuthoredReview;
use crate::models::tourist::{TouristProfile, UpdateTouristProfile};
use crate::models::user::{Role, User};

async fn require_tourist(pool: &SqlitePool, user_id: i64) -> AppResult<User> {
    let user = fetch_user(pool, user_id).await?;
    if user.role != Some(Role::Tourist) {
        return Err(AppError::Forbidden("Not a tourist account".to_string()));
    }
    Ok(user)
}

/// Returns the tourist's profile, creating a blank one if the account has none.
pub async fn get_profile(pool: web::Data<SqlitePool>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let user = require_tourist(pool.get_ref(), path.into_inner()).await?;

    sqlx::query("INSERT OR IGNORE INTO tourist_profiles (user_id, full_name) VALUES (?, ?)")
        .bind(user.id)
        .bind(&user.username)
        .execute(pool.get_ref())
        .await?;

    let profile =
        sqlx::query_as::<_, TouristProfile>("SELECT * FROM tourist_profiles WHERE user_id = ?")
            .bind(user.id)
            .fetch_one(pool.get_ref())
            .await?;

    Ok(HttpResponse::Ok().json(profile))
}

pub async fn update_profile(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    body: web::Json<UpdateTouristProfile>,
) -> AppResult<HttpResponse> {
    body.validate()?;
    let user_id = path.into_inner();
    require_tourist(pool.get_ref(), user_id).await?;

    let profile = sqlx::query_as::<_, TouristProfile>(
        r#"
        INSERT INTO tourist_profiles (user_id, full_name, phone_number, profile_picture_url)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            full_name = excluded.full_name,
            phone_number = excluded.phone_number,
            profile_picture_url = excluded.profile_picture_url
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&body.full_name)
    .bind(&body.phone_number)
    .bind(&body.profile_picture_url)
    .fetch_one(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(profile))
}

pub async fn dashboard(pool: web::Data<SqlitePool>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let user_id = path.into_inner();
    require_tourist(pool.get_ref(), user_id).await?;

    let bookings = sqlx::query_as::<_, TouristBooking>(
        r#"
        SELECT b.*, v.business_name FROM bookings b
        JOIN vendor_profiles v ON v.id = b.vendor_id
        WHERE b.tourist_id = ?
        ORDER BY b.booking_date DESC, b.booking_time DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool.get_ref())
    .await?;

    let reviews = sqlx::query_as::<_, AuthoredReview>(
        r#"
        SELECT r.*, v.business_name FROM reviews r
        JOIN vendor_profiles v ON v.id = r.vendor_id
        WHERE r.user_id = ?
        ORDER BY r.created_at DESC, r.id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "bookings": bookings,
        "reviews": reviews,
    })))
}

/// Splits the tourist's bookings around today: upcoming soonest first, past latest first.
pub async fn my_bookings(pool: web::Data<SqlitePool>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let user_id = path.into_inner();
    require_tourist(pool.get_ref(), user_id).await?;
    let today = Utc::now().date_naive();

    let upcoming = sqlx::query_as::<_, TouristBooking>(
        r#"
        SELECT b.*, v.business_name FROM bookings b
        JOIN vendor_profiles v ON v.id = b.vendor_id
        WHERE b.tourist_id = ? AND b.booking_date >= ?
        ORDER BY b.booking_date ASC, b.booking_time ASC
        "#,
    )
    .bind(user_id)
    .bind(today)
    .fetch_all(pool.get_ref())
    .await?;

    let past = sqlx::query_as::<_, TouristBooking>(
        r#"
        SELECT b.*, v.business_name FROM bookings b
        JOIN vendor_profiles v ON v.id = b.vendor_id
        WHERE b.tourist_id = ? AND b.booking_date < ?
        ORDER BY b.booking_date DESC, b.booking_time DESC
        "#,
    )
    .bind(user_id)
    .bind(today)
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "upcoming": upcoming,
        "past": past,
    })))
}
