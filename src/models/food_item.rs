use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FoodItem {
    pub id: i64,
    pub vendor_id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

/// Payload for both creating and editing a menu entry.
#[derive(Debug, Deserialize, Validate)]
pub struct FoodItemForm {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 0.0, max = 999999.99))]
    pub price: f64,
    #[validate(url)]
    pub image_url: Option<String>,
}
