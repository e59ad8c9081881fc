use actix_web::{web, HttpResponse};
use sqlx::{Sqlite, SqlitePool};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::user::{RegisterUser, Role, UpdateAccount, User};

pub(crate) async fn fetch_user<'e, E>(executor: E, id: i64) -> AppResult<User>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound("User"))
}

/// Creates the account and, in the same transaction, the profile matching its role.
pub async fn register(
    pool: web::Data<SqlitePool>,
    body: web::Json<RegisterUser>,
) -> AppResult<HttpResponse> {
    body.validate()?;

    let mut tx = pool.begin().await?;

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (username, email, role) VALUES (?, ?, ?) RETURNING *",
    )
    .bind(&body.username)
    .bind(&body.email)
    .bind(body.role)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| match AppError::from(e) {
        AppError::Conflict(_) => AppError::Conflict("Username already taken".to_string()),
        other => other,
    })?;

    match body.role {
        Role::Vendor => {
            sqlx::query("INSERT INTO vendor_profiles (user_id, business_name) VALUES (?, ?)")
                .bind(user.id)
                .bind(&user.username)
                .execute(&mut *tx)
                .await?;
        }
        Role::Tourist => {
            sqlx::query("INSERT INTO tourist_profiles (user_id, full_name) VALUES (?, ?)")
                .bind(user.id)
                .bind(&user.username)
                .execute(&mut *tx)
                .await?;
        }
    }

    tx.commit().await?;

    log::info!("Registered {:?} user {} ({})", body.role, user.username, user.id);
    Ok(HttpResponse::Created().json(user))
}

pub async fn get_user(pool: web::Data<SqlitePool>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let user = fetch_user(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user))
}

pub async fn update_user(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    body: web::Json<UpdateAccount>,
) -> AppResult<HttpResponse> {
    body.validate()?;
    let id = path.into_inner();

    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users SET username = ?, email = ?, first_name = ?, last_name = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(&body.username)
    .bind(&body.email)
    .bind(&body.first_name)
    .bind(&body.last_name)
    .bind(id)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or(AppError::NotFound("User"))?;

    Ok(HttpResponse::Ok().json(user))
}
