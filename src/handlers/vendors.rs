use actix_web::{web, HttpResponse};
use sqlx::{Sqlite, SqlitePool};
use validator::Validate;

use super::users::fetch_user;
use crate::error::{AppError, AppResult};
use crate::models::food_item::FoodItem;
use crate::models::review::VendorReview;
use crate::models::user::Role;
use crate::models::vendor::{FeaturedVendor, VendorDetail, VendorProfile, VendorProfileForm};

const FEATURED_VENDORS: i64 = 3;
const SIMILAR_VENDORS: i64 = 3;

pub(crate) async fn fetch_vendor<'e, E>(executor: E, id: i64) -> AppResult<VendorProfile>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, VendorProfile>("SELECT * FROM vendor_profiles WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound("Vendor"))
}

async fn food_items_of(pool: &SqlitePool, vendor_id: i64) -> AppResult<Vec<FoodItem>> {
    Ok(
        sqlx::query_as::<_, FoodItem>("SELECT * FROM food_items WHERE vendor_id = ? ORDER BY name")
            .bind(vendor_id)
            .fetch_all(pool)
            .await?,
    )
}

/// Landing page data: the newest vendors with their menus.
pub async fn home(pool: web::Data<SqlitePool>) -> AppResult<HttpResponse> {
    let vendors = sqlx::query_as::<_, VendorProfile>(
        "SELECT * FROM vendor_profiles ORDER BY created_at DESC, id DESC LIMIT ?",
    )
    .bind(FEATURED_VENDORS)
    .fetch_all(pool.get_ref())
    .await?;

    let mut featured = Vec::with_capacity(vendors.len());
    for vendor in vendors {
        let food_items = food_items_of(pool.get_ref(), vendor.id).await?;
        featured.push(FeaturedVendor { vendor, food_items });
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "featured_vendors": featured })))
}

pub async fn list_vendors(pool: web::Data<SqlitePool>) -> AppResult<HttpResponse> {
    let vendors =
        sqlx::query_as::<_, VendorProfile>("SELECT * FROM vendor_profiles ORDER BY business_name")
            .fetch_all(pool.get_ref())
            .await?;

    Ok(HttpResponse::Ok().json(vendors))
}

pub async fn get_vendor(pool: web::Data<SqlitePool>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let vendor = fetch_vendor(pool.get_ref(), path.into_inner()).await?;
    let food_items = food_items_of(pool.get_ref(), vendor.id).await?;

    let reviews = sqlx::query_as::<_, VendorReview>(
        r#"
        SELECT r.*, u.username FROM reviews r
        JOIN users u ON u.id = r.user_id
        WHERE r.vendor_id = ?
        ORDER BY r.created_at DESC, r.id DESC
        "#,
    )
    .bind(vendor.id)
    .fetch_all(pool.get_ref())
    .await?;

    let similar_vendors = match vendor.cuisine_id {
        Some(cuisine_id) => {
            sqlx::query_as::<_, VendorProfile>(
                r#"
                SELECT * FROM vendor_profiles
                WHERE cuisine_id = ? AND id != ?
                ORDER BY average_rating DESC
                LIMIT ?
                "#,
            )
            .bind(cuisine_id)
            .bind(vendor.id)
            .bind(SIMILAR_VENDORS)
            .fetch_all(pool.get_ref())
            .await?
        }
        None => Vec::new(),
    };

    Ok(HttpResponse::Ok().json(VendorDetail {
        vendor,
        food_items,
        reviews,
        similar_vendors,
    }))
}

/// Vendor dashboard: the profile owned by a vendor account.
pub async fn get_vendor_profile(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let user_id = path.into_inner();

    let vendor =
        sqlx::query_as::<_, VendorProfile>("SELECT * FROM vendor_profiles WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(pool.get_ref())
            .await?
            .ok_or(AppError::NotFound("Vendor profile"))?;

    Ok(HttpResponse::Ok().json(vendor))
}

/// Creates the vendor profile if the account has none yet, otherwise overwrites it.
pub async fn upsert_vendor_profile(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    body: web::Json<VendorProfileForm>,
) -> AppResult<HttpResponse> {
    body.validate()?;
    let user_id = path.into_inner();

    let mut tx = pool.begin().await?;

    let user = fetch_user(&mut *tx, user_id).await?;
    if user.role != Some(Role::Vendor) {
        return Err(AppError::Forbidden(
            "Only vendor accounts have a vendor profile".to_string(),
        ));
    }

    if let Some(cuisine_id) = body.cuisine_id {
        let known: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM cuisines WHERE id = ?)")
            .bind(cuisine_id)
            .fetch_one(&mut *tx)
            .await?;
        if !known {
            return Err(AppError::Validation(format!("Unknown cuisine {cuisine_id}")));
        }
    }

    let vendor = sqlx::query_as::<_, VendorProfile>(
        r#"
        INSERT INTO vendor_profiles (
            user_id, business_name, description, category, cuisine_id,
            location_text, latitude, longitude, phone, photo_url
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            business_name = excluded.business_name,
            description = excluded.description,
            category = excluded.category,
            cuisine_id = excluded.cuisine_id,
            location_text = excluded.location_text,
            latitude = excluded.latitude,
            longitude = excluded.longitude,
            phone = excluded.phone,
            photo_url = excluded.photo_url
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&body.business_name)
    .bind(&body.description)
    .bind(&body.category)
    .bind(body.cuisine_id)
    .bind(&body.location_text)
    .bind(body.latitude.unwrap_or(0.0))
    .bind(body.longitude.unwrap_or(0.0))
    .bind(&body.phone)
    .bind(&body.photo_url)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    log::info!("Vendor profile {} saved for user {}", vendor.id, user_id);
    Ok(HttpResponse::Ok().json(vendor))
}
