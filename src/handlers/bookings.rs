use actix_web::{web, HttpResponse};
use sqlx::{Sqlite, SqlitePool};
use validator::Validate;

use super::users::fetch_user;
use super::vendors::fetch_vendor;
use crate::error::{AppError, AppResult};
use crate::models::booking::{
    Booking, BookingForm, BookingOwner, BookingResponse, BookingStatus, IncomingBooking,
};
use crate::models::user::Role;

async fn fetch_booking<'e, E>(executor: E, id: i64) -> AppResult<Booking>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound("Booking"))
}

/// Moves a booking from `from` to `to`, failing if someone else changed it meanwhile.
async fn set_status<'e, E>(
    executor: E,
    id: i64,
    from: BookingStatus,
    to: BookingStatus,
) -> AppResult<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("UPDATE bookings SET status = ? WHERE id = ? AND status = ?")
        .bind(to)
        .bind(id)
        .bind(from)
        .execute(executor)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::Conflict(format!(
            "Booking {id} is no longer {}",
            from.as_str()
        )));
    }
    Ok(())
}

pub async fn create_booking(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    body: web::Json<BookingForm>,
) -> AppResult<HttpResponse> {
    body.validate()?;
    let vendor_id = path.into_inner();

    let mut tx = pool.begin().await?;

    let vendor = fetch_vendor(&mut *tx, vendor_id).await?;
    let tourist = match fetch_user(&mut *tx, body.tourist_id).await {
        Ok(user) if user.role == Some(Role::Tourist) => user,
        Ok(_) | Err(AppError::NotFound(_)) => {
            return Err(AppError::Forbidden(
                "You need to be a tourist to make a booking.".to_string(),
            ))
        }
        Err(e) => return Err(e),
    };

    let booking = sqlx::query_as::<_, Booking>(
        r#"
        INSERT INTO bookings (tourist_id, vendor_id, booking_date, booking_time, number_of_people, special_request, status)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(tourist.id)
    .bind(vendor.id)
    .bind(body.booking_date)
    .bind(body.booking_time)
    .bind(body.number_of_people)
    .bind(&body.special_request)
    .bind(BookingStatus::Pending)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    log::info!(
        "Booking {} created by tourist {} at vendor {}",
        booking.id,
        tourist.id,
        vendor.id
    );
    Ok(HttpResponse::Created().json(booking))
}

pub async fn get_booking(pool: web::Data<SqlitePool>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let booking = fetch_booking(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(booking))
}

/// Tourists may reschedule or edit their own bookings.
pub async fn update_booking(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    body: web::Json<BookingForm>,
) -> AppResult<HttpResponse> {
    body.validate()?;
    let id = path.into_inner();

    let booking = sqlx::query_as::<_, Booking>(
        r#"
        UPDATE bookings
        SET booking_date = ?, booking_time = ?, number_of_people = ?, special_request = ?
        WHERE id = ? AND tourist_id = ?
        RETURNING *
        "#,
    )
    .bind(body.booking_date)
    .bind(body.booking_time)
    .bind(body.number_of_people)
    .bind(&body.special_request)
    .bind(id)
    .bind(body.tourist_id)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or(AppError::NotFound("Booking"))?;

    Ok(HttpResponse::Ok().json(booking))
}

pub async fn cancel_booking(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    body: web::Json<BookingOwner>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let mut tx = pool.begin().await?;

    let booking = fetch_booking(&mut *tx, id).await?;
    if booking.tourist_id != body.tourist_id {
        return Err(AppError::NotFound("Booking"));
    }

    let next = booking.status.cancel().inspect_err(|_| {
        log::warn!(
            "Refused to cancel booking {id} in status {}",
            booking.status.as_str()
        );
    })?;
    set_status(&mut *tx, id, booking.status, next).await?;

    tx.commit().await?;

    log::info!("Booking {id} cancelled by tourist {}", body.tourist_id);
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Booking cancelled successfully",
        "id": id,
        "status": next,
    })))
}

/// Incoming bookings for a vendor, most recent booking date first.
pub async fn list_vendor_bookings(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let vendor = fetch_vendor(pool.get_ref(), path.into_inner()).await?;

    let bookings = sqlx::query_as::<_, IncomingBooking>(
        r#"
        SELECT b.*, u.username FROM bookings b
        JOIN users u ON u.id = b.tourist_id
        WHERE b.vendor_id = ?
        ORDER BY b.booking_date DESC, b.booking_time DESC
        "#,
    )
    .bind(vendor.id)
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(bookings))
}

pub async fn respond_to_booking(
    pool: web::Data<SqlitePool>,
    path: web::Path<(i64, i64)>,
    body: web::Json<BookingResponse>,
) -> AppResult<HttpResponse> {
    let (vendor_id, id) = path.into_inner();

    let mut tx = pool.begin().await?;

    let booking = fetch_booking(&mut *tx, id).await?;
    if booking.vendor_id != vendor_id {
        return Err(AppError::NotFound("Booking"));
    }

    let next = booking.status.respond(body.status).inspect_err(|_| {
        log::warn!(
            "Vendor {vendor_id} sent {} for booking {id} in status {}",
            body.status.as_str(),
            booking.status.as_str()
        );
    })?;
    set_status(&mut *tx, id, booking.status, next).await?;

    let updated = fetch_booking(&mut *tx, id).await?;
    tx.commit().await?;

    log::info!("Booking {id} {} by vendor {vendor_id}", next.as_str());
    Ok(HttpResponse::Ok().json(updated))
}
