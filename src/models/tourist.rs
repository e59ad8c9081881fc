use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TouristProfile {
    pub id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub phone_number: String,
    pub profile_picture_url: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTouristProfile {
    #[validate(length(min = 1, max = 255))]
    pub full_name: String,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub phone_number: String,
    #[validate(url)]
    pub profile_picture_url: Option<String>,
}
