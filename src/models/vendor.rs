use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::food_item::FoodItem;
use super::review::VendorReview;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VendorProfile {
    pub id: i64,
    pub user_id: i64,
    pub business_name: String,
    pub description: String,
    pub category: String,
    pub cuisine_id: Option<i64>,
    pub location_text: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub phone: String,
    pub photo_url: Option<String>,
    pub average_rating: f64,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VendorProfileForm {
    #[validate(length(min = 1, max = 255))]
    pub business_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_category")]
    #[validate(length(max = 100))]
    pub category: String,
    pub cuisine_id: Option<i64>,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub location_text: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub phone: String,
    #[validate(url)]
    pub photo_url: Option<String>,
}

fn default_category() -> String {
    "General".to_string()
}

#[derive(Debug, Serialize)]
pub struct FeaturedVendor {
    #[serde(flatten)]
    pub vendor: VendorProfile,
    pub food_items: Vec<FoodItem>,
}

#[derive(Debug, Serialize)]
pub struct VendorDetail {
    pub vendor: VendorProfile,
    pub food_items: Vec<FoodItem>,
    pub reviews: Vec<VendorReview>,
    pub similar_vendors: Vec<VendorProfile>,
}

/// One row of a search result: the vendor plus the aggregates the filters run on.
#[derive(Debug, Serialize, FromRow)]
pub struct VendorSearchHit {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub vendor: VendorProfile,
    pub cuisine_name: Option<String>,
    pub avg_rating: Option<f64>,
    pub min_price: Option<f64>,
}
