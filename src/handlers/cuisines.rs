use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::cuisine::{CreateCuisine, Cuisine};

pub async fn list_cuisines(pool: web::Data<SqlitePool>) -> AppResult<HttpResponse> {
    let cuisines = sqlx::query_as::<_, Cuisine>("SELECT * FROM cuisines ORDER BY name")
        .fetch_all(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(cuisines))
}

pub async fn create_cuisine(
    pool: web::Data<SqlitePool>,
    body: web::Json<CreateCuisine>,
) -> AppResult<HttpResponse> {
    body.validate()?;
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Cuisine name cannot be blank".to_string()));
    }

    let cuisine = sqlx::query_as::<_, Cuisine>("INSERT INTO cuisines (name) VALUES (?) RETURNING *")
        .bind(name)
        .fetch_one(pool.get_ref())
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => {
                AppError::Conflict(format!("Cuisine '{name}' already exists"))
            }
            other => other,
        })?;

    Ok(HttpResponse::Created().json(cuisine))
}
