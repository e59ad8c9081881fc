use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: i64,
    pub user_id: i64,
    pub vendor_id: i64,
    pub rating: i64,
    pub comment: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

/// A review joined with the reviewer's username, as shown on a vendor page.
#[derive(Debug, Serialize, FromRow)]
pub struct VendorReview {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub review: Review,
    pub username: String,
}

/// A review joined with the vendor's name, as shown on a tourist dashboard.
#[derive(Debug, Serialize, FromRow)]
pub struct AuthoredReview {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub review: Review,
    pub business_name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReviewForm {
    pub user_id: i64,
    #[validate(range(min = 1, max = 5))]
    pub rating: i64,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewAuthor {
    pub user_id: i64,
}
