use actix_web::{web, HttpResponse};
use sqlx::{SqliteConnection, SqlitePool};
use validator::Validate;

use super::users::fetch_user;
use super::vendors::fetch_vendor;
use crate::error::{AppError, AppResult};
use crate::models::review::{Review, ReviewAuthor, ReviewForm};

/// Recomputes and stores a vendor's `average_rating`. A vendor with no reviews rates 0.0.
///
/// Call this on the same connection (transaction) that changed the reviews.
pub async fn refresh_average_rating(
    conn: &mut SqliteConnection,
    vendor_id: i64,
) -> Result<f64, sqlx::Error> {
    let average: Option<f64> =
        sqlx::query_scalar("SELECT AVG(rating) FROM reviews WHERE vendor_id = ?")
            .bind(vendor_id)
            .fetch_one(&mut *conn)
            .await?;
    let average = average.unwrap_or(0.0);

    sqlx::query("UPDATE vendor_profiles SET average_rating = ? WHERE id = ?")
        .bind(average)
        .bind(vendor_id)
        .execute(&mut *conn)
        .await?;

    Ok(average)
}

async fn fetch_own_review(
    conn: &mut SqliteConnection,
    id: i64,
    user_id: i64,
) -> AppResult<Review> {
    sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(AppError::NotFound("Review"))
}

pub async fn create_review(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    body: web::Json<ReviewForm>,
) -> AppResult<HttpResponse> {
    body.validate()?;
    let vendor_id = path.into_inner();

    let mut tx = pool.begin().await?;

    let vendor = fetch_vendor(&mut *tx, vendor_id).await?;
    let user = fetch_user(&mut *tx, body.user_id).await?;

    let review = sqlx::query_as::<_, Review>(
        "INSERT INTO reviews (user_id, vendor_id, rating, comment) VALUES (?, ?, ?, ?) RETURNING *",
    )
    .bind(user.id)
    .bind(vendor.id)
    .bind(body.rating)
    .bind(&body.comment)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| match AppError::from(e) {
        AppError::Conflict(_) => {
            AppError::Conflict("You've already reviewed this vendor.".to_string())
        }
        other => other,
    })?;

    let average = refresh_average_rating(&mut tx, vendor.id).await?;
    tx.commit().await?;

    log::info!(
        "Review {} on vendor {} by user {}, average now {average:.2}",
        review.id,
        vendor.id,
        user.id
    );
    Ok(HttpResponse::Created().json(review))
}

pub async fn update_review(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    body: web::Json<ReviewForm>,
) -> AppResult<HttpResponse> {
    body.validate()?;
    let id = path.into_inner();

    let mut tx = pool.begin().await?;

    let existing = fetch_own_review(&mut tx, id, body.user_id).await?;

    let review = sqlx::query_as::<_, Review>(
        "UPDATE reviews SET rating = ?, comment = ? WHERE id = ? RETURNING *",
    )
    .bind(body.rating)
    .bind(&body.comment)
    .bind(existing.id)
    .fetch_one(&mut *tx)
    .await?;

    refresh_average_rating(&mut tx, review.vendor_id).await?;
    tx.commit().await?;

    Ok(HttpResponse::Ok().json(review))
}

pub async fn delete_review(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    author: web::Query<ReviewAuthor>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let mut tx = pool.begin().await?;

    let review = fetch_own_review(&mut tx, id, author.user_id).await?;

    sqlx::query("DELETE FROM reviews WHERE id = ?")
        .bind(review.id)
        .execute(&mut *tx)
        .await?;

    let average = refresh_average_rating(&mut tx, review.vendor_id).await?;
    tx.commit().await?;

    log::info!(
        "Review {id} deleted, vendor {} average now {average:.2}",
        review.vendor_id
    );
    Ok(HttpResponse::NoContent().finish())
}
