use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;
use validator::Validate;

use super::vendors::fetch_vendor;
use crate::error::{AppError, AppResult};
use crate::models::food_item::{FoodItem, FoodItemForm};

pub async fn list_food_items(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let vendor = fetch_vendor(pool.get_ref(), path.into_inner()).await?;

    let items =
        sqlx::query_as::<_, FoodItem>("SELECT * FROM food_items WHERE vendor_id = ? ORDER BY name")
            .bind(vendor.id)
            .fetch_all(pool.get_ref())
            .await?;

    Ok(HttpResponse::Ok().json(items))
}

pub async fn create_food_item(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    body: web::Json<FoodItemForm>,
) -> AppResult<HttpResponse> {
    body.validate()?;
    let vendor = fetch_vendor(pool.get_ref(), path.into_inner()).await?;

    let item = sqlx::query_as::<_, FoodItem>(
        r#"
        INSERT INTO food_items (vendor_id, name, description, price, image_url)
        VALUES (?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(vendor.id)
    .bind(&body.name)
    .bind(&body.description)
    .bind(body.price)
    .bind(&body.image_url)
    .fetch_one(pool.get_ref())
    .await?;

    log::info!("Vendor {} added food item {}", vendor.id, item.id);
    Ok(HttpResponse::Created().json(item))
}

pub async fn update_food_item(
    pool: web::Data<SqlitePool>,
    path: web::Path<(i64, i64)>,
    body: web::Json<FoodItemForm>,
) -> AppResult<HttpResponse> {
    body.validate()?;
    let (vendor_id, item_id) = path.into_inner();

    let item = sqlx::query_as::<_, FoodItem>(
        r#"
        UPDATE food_items SET name = ?, description = ?, price = ?, image_url = ?
        WHERE id = ? AND vendor_id = ?
        RETURNING *
        "#,
    )
    .bind(&body.name)
    .bind(&body.description)
    .bind(body.price)
    .bind(&body.image_url)
    .bind(item_id)
    .bind(vendor_id)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or(AppError::NotFound("Food item"))?;

    Ok(HttpResponse::Ok().json(item))
}

pub async fn delete_food_item(
    pool: web::Data<SqlitePool>,
    path: web::Path<(i64, i64)>,
) -> AppResult<HttpResponse> {
    let (vendor_id, item_id) = path.into_inner();

    let result = sqlx::query("DELETE FROM food_items WHERE id = ? AND vendor_id = ?")
        .bind(item_id)
        .bind(vendor_id)
        .execute(pool.get_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Food item"));
    }

    log::info!("Vendor {vendor_id} removed food item {item_id}");
    Ok(HttpResponse::NoContent().finish())
}
