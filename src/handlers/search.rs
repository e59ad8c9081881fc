use actix_web::{web, HttpResponse};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::error::AppResult;
use crate::models::vendor::VendorSearchHit;

/// Rating floor implied by `sort=top` when no explicit rating is given.
const TOP_RATED_FLOOR: &str = "4";
/// Vendors created within this many days get a "new" badge.
const NEW_VENDOR_DAYS: i64 = 7;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
    pub cuisine: Option<String>,
    pub price: Option<String>,
    pub rating: Option<String>,
    pub sort: Option<String>,
}

/// The filters that survive parameter cleanup. `None` means "don't filter".
#[derive(Debug, Default, PartialEq)]
pub struct VendorFilter {
    pub text: Option<String>,
    pub cuisine: Option<String>,
    pub max_price: Option<i64>,
    pub min_rating: Option<i64>,
}

/// Values are kept as sent; only numeric parsing ignores surrounding whitespace.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl SearchParams {
    /// Rating as selected by the user, with `sort=top` standing in for a 4-star floor.
    pub fn effective_rating(&self) -> Option<String> {
        match non_empty(&self.rating) {
            Some(rating) => Some(rating.to_string()),
            None if self.sort.as_deref() == Some("top") => Some(TOP_RATED_FLOOR.to_string()),
            None => None,
        }
    }

    /// Non-numeric price or rating values are dropped rather than rejected.
    pub fn to_filter(&self) -> VendorFilter {
        VendorFilter {
            text: non_empty(&self.search).map(str::to_string),
            cuisine: non_empty(&self.cuisine).map(str::to_string),
            max_price: non_empty(&self.price).and_then(|p| p.trim().parse().ok()),
            min_rating: self
                .effective_rating()
                .and_then(|r| r.trim().parse().ok()),
        }
    }
}

impl VendorFilter {
    pub fn build_query(&self) -> QueryBuilder<'_, Sqlite> {
        let mut query = QueryBuilder::new(
            r#"
            SELECT v.*, c.name AS cuisine_name, r.avg_rating, f.min_price
            FROM vendor_profiles v
            LEFT JOIN cuisines c ON c.id = v.cuisine_id
            LEFT JOIN (
                SELECT vendor_id, AVG(rating) AS avg_rating FROM reviews GROUP BY vendor_id
            ) r ON r.vendor_id = v.id
            LEFT JOIN (
                SELECT vendor_id, MIN(price) AS min_price FROM food_items GROUP BY vendor_id
            ) f ON f.vendor_id = v.id
            WHERE 1=1
            "#,
        );

        if let Some(text) = &self.text {
            query
                .push(" AND (instr(lower(v.business_name), lower(")
                .push_bind(text.as_str())
                .push(")) > 0 OR instr(lower(v.description), lower(")
                .push_bind(text.as_str())
                .push(")) > 0)");
        }

        if let Some(cuisine) = &self.cuisine {
            query
                .push(" AND lower(c.name) = lower(")
                .push_bind(cuisine.as_str())
                .push(")");
        }

        if let Some(max_price) = self.max_price {
            query.push(" AND f.min_price <= ").push_bind(max_price);
        }

        if let Some(min_rating) = self.min_rating {
            query.push(" AND r.avg_rating >= ").push_bind(min_rating);
        }

        query.push(" ORDER BY v.business_name, v.id");
        query
    }
}

#[derive(Serialize)]
struct SearchResults {
    query: String,
    selected_cuisine: Option<String>,
    selected_price: Option<String>,
    selected_rating: Option<String>,
    sort: Option<String>,
    new_since: chrono::NaiveDateTime,
    vendors: Vec<VendorSearchHit>,
}

pub async fn search_vendors(
    pool: web::Data<SqlitePool>,
    params: web::Query<SearchParams>,
) -> AppResult<HttpResponse> {
    let params = params.into_inner();
    let filter = params.to_filter();

    let vendors = filter
        .build_query()
        .build_query_as::<VendorSearchHit>()
        .fetch_all(pool.get_ref())
        .await?;

    log::debug!("Search {:?} matched {} vendors", filter, vendors.len());

    let selected_rating = params.effective_rating();
    Ok(HttpResponse::Ok().json(SearchResults {
        query: params.search.unwrap_or_default(),
        selected_cuisine: params.cuisine,
        selected_price: params.price,
        selected_rating,
        sort: params.sort,
        new_since: Utc::now().naive_utc() - Duration::days(NEW_VENDOR_DAYS),
        vendors,
    }))
}
