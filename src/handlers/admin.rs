use std::collections::BTreeMap;

use actix_web::{web, HttpResponse};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::user::{AdminUserUpdate, Role, User};

/// How far back the signup chart reaches.
const SIGNUP_WINDOW_DAYS: i64 = 180;

#[derive(Debug, Serialize, FromRow)]
pub struct DashboardTotals {
    pub total_users: i64,
    pub total_tourists: i64,
    pub total_vendors: i64,
    pub total_reviews: i64,
    pub reviews_with_comment: i64,
    pub total_bookings: i64,
    pub pending_bookings: i64,
    pub confirmed_bookings: i64,
}

/// Signups per calendar month, oldest month first. The three vectors are parallel.
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct SignupSeries {
    pub signup_months: Vec<String>,
    pub signup_tourists: Vec<i64>,
    pub signup_vendors: Vec<i64>,
}

/// Buckets join dates by month. A month with only role-less signups still shows up with zeros.
pub fn monthly_signups(joined: &[(NaiveDateTime, Option<Role>)]) -> SignupSeries {
    let mut months: BTreeMap<NaiveDate, (i64, i64)> = BTreeMap::new();

    for (date_joined, role) in joined {
        let Some(month) = date_joined.date().with_day(1) else {
            continue;
        };
        let counts = months.entry(month).or_default();
        match role {
            Some(Role::Tourist) => counts.0 += 1,
            Some(Role::Vendor) => counts.1 += 1,
            None => {}
        }
    }

    let mut series = SignupSeries::default();
    for (month, (tourists, vendors)) in months {
        series.signup_months.push(month.format("%b %Y").to_string());
        series.signup_tourists.push(tourists);
        series.signup_vendors.push(vendors);
    }
    series
}

#[derive(Serialize)]
struct Dashboard {
    #[serde(flatten)]
    totals: DashboardTotals,
    reviews_without_comment: i64,
    #[serde(flatten)]
    signups: SignupSeries,
}

pub async fn dashboard(pool: web::Data<SqlitePool>) -> AppResult<HttpResponse> {
    let totals = sqlx::query_as::<_, DashboardTotals>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM users) AS total_users,
            (SELECT COUNT(*) FROM users WHERE role = 'tourist') AS total_tourists,
            (SELECT COUNT(*) FROM users WHERE role = 'vendor') AS total_vendors,
            (SELECT COUNT(*) FROM reviews) AS total_reviews,
            (SELECT COUNT(*) FROM reviews WHERE comment IS NOT NULL AND comment != '') AS reviews_with_comment,
            (SELECT COUNT(*) FROM bookings) AS total_bookings,
            (SELECT COUNT(*) FROM bookings WHERE status = 'pending') AS pending_bookings,
            (SELECT COUNT(*) FROM bookings WHERE status = 'confirmed') AS confirmed_bookings
        "#,
    )
    .fetch_one(pool.get_ref())
    .await?;

    let since = Utc::now().naive_utc() - Duration::days(SIGNUP_WINDOW_DAYS);
    let joined: Vec<(NaiveDateTime, Option<Role>)> =
        sqlx::query_as("SELECT date_joined, role FROM users WHERE date_joined >= ?")
            .bind(since)
            .fetch_all(pool.get_ref())
            .await?;

    Ok(HttpResponse::Ok().json(Dashboard {
        reviews_without_comment: totals.total_reviews - totals.reviews_with_comment,
        totals,
        signups: monthly_signups(&joined),
    }))
}

#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    pub role: Option<String>,
}

pub async fn list_users(
    pool: web::Data<SqlitePool>,
    query: web::Query<UserListQuery>,
) -> AppResult<HttpResponse> {
    let users = match Role::from_filter(query.role.as_deref()) {
        Some(role) => {
            sqlx::query_as::<_, User>(
                "SELECT * FROM users WHERE role = ? ORDER BY date_joined DESC, id DESC",
            )
            .bind(role)
            .fetch_all(pool.get_ref())
            .await?
        }
        None => {
            sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY date_joined DESC, id DESC")
                .fetch_all(pool.get_ref())
                .await?
        }
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "users": users,
        "selected_role": query.role,
    })))
}

pub async fn update_user(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    body: web::Json<AdminUserUpdate>,
) -> AppResult<HttpResponse> {
    body.validate()?;
    let id = path.into_inner();

    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users SET username = ?, email = ?, is_active = ?, is_staff = ?, is_superuser = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(&body.username)
    .bind(&body.email)
    .bind(body.is_active)
    .bind(body.is_staff)
    .bind(body.is_superuser)
    .bind(id)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or(AppError::NotFound("User"))?;

    log::info!("Admin updated user {}", user.id);
    Ok(HttpResponse::Ok().json(user))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(date: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{date} 12:00:00"), "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn no_signups_gives_empty_series() {
        assert_eq!(monthly_signups(&[]), SignupSeries::default());
    }

    #[test]
    fn signups_are_grouped_by_month_in_order() {
        let series = monthly_signups(&[
            (at("2025-03-14"), Some(Role::Vendor)),
            (at("2025-01-02"), Some(Role::Tourist)),
            (at("2025-01-30"), Some(Role::Tourist)),
            (at("2025-03-01"), Some(Role::Tourist)),
            (at("2025-01-15"), Some(Role::Vendor)),
        ]);

        assert_eq!(series.signup_months, vec!["Jan 2025", "Mar 2025"]);
        assert_eq!(series.signup_tourists, vec![2, 1]);
        assert_eq!(series.signup_vendors, vec![1, 1]);
    }

    #[test]
    fn roleless_signups_keep_their_month() {
        let series = monthly_signups(&[(at("2024-12-24"), None)]);
        assert_eq!(series.signup_months, vec!["Dec 2024"]);
        assert_eq!(series.signup_tourists, vec![0]);
        assert_eq!(series.signup_vendors, vec![0]);
    }

    #[test]
    fn same_month_different_years_stay_apart() {
        let series = monthly_signups(&[
            (at("2025-06-01"), Some(Role::Tourist)),
            (at("2024-06-01"), Some(Role::Tourist)),
        ]);
        assert_eq!(series.signup_months, vec!["Jun 2024", "Jun 2025"]);
    }
}
