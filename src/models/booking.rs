use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Declined,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Declined => "declined",
        }
    }

    /// Tourist-initiated cancellation. Only a pending booking can be withdrawn.
    pub fn cancel(self) -> Result<BookingStatus, AppError> {
        match self {
            BookingStatus::Pending => Ok(BookingStatus::Cancelled),
            _ => Err(AppError::Conflict(
                "This booking cannot be cancelled.".to_string(),
            )),
        }
    }

    /// Vendor answer to a pending booking: `confirmed` or `declined`.
    pub fn respond(self, answer: BookingStatus) -> Result<BookingStatus, AppError> {
        match (self, answer) {
            (BookingStatus::Pending, BookingStatus::Confirmed | BookingStatus::Declined) => {
                Ok(answer)
            }
            _ => Err(AppError::Conflict("Invalid or duplicate action.".to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: i64,
    pub tourist_id: i64,
    pub vendor_id: i64,
    pub booking_date: chrono::NaiveDate,
    pub booking_time: chrono::NaiveTime,
    pub number_of_people: i64,
    pub special_request: Option<String>,
    pub status: BookingStatus,
    pub created_at: chrono::NaiveDateTime,
}

/// Booking joined with the vendor's business name.
#[derive(Debug, Serialize, FromRow)]
pub struct TouristBooking {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub booking: Booking,
    pub business_name: String,
}

/// Booking joined with the tourist's username.
#[derive(Debug, Serialize, FromRow)]
pub struct IncomingBooking {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub booking: Booking,
    pub username: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BookingForm {
    pub tourist_id: i64,
    pub booking_date: chrono::NaiveDate,
    pub booking_time: chrono::NaiveTime,
    #[validate(range(min = 1, max = 500))]
    pub number_of_people: i64,
    #[validate(length(max = 1000))]
    pub special_request: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BookingOwner {
    pub tourist_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct BookingResponse {
    pub status: BookingStatus,
}
