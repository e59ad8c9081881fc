use actix_web::web;

use crate::error;
use crate::handlers::{
    admin, bookings, cuisines, food_items, reviews, search, tourists, users, vendors,
};

/// The full route table, shared by the server binary and the integration tests.
/// Extractor failures render through `AppError` like every other error.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error))
        .app_data(web::QueryConfig::default().error_handler(error::query_error))
        .app_data(web::PathConfig::default().error_handler(error::path_error))
        .route("/", web::get().to(vendors::home))
        .route("/search", web::get().to(search::search_vendors))
        .service(
            web::scope("/users")
                .route("", web::post().to(users::register))
                .route("/{id}", web::get().to(users::get_user))
                .route("/{id}", web::put().to(users::update_user))
                .route(
                    "/{id}/vendor-profile",
                    web::get().to(vendors::get_vendor_profile),
                )
                .route(
                    "/{id}/vendor-profile",
                    web::put().to(vendors::upsert_vendor_profile),
                ),
        )
        .service(
            web::scope("/tourists/{id}")
                .route("/profile", web::get().to(tourists::get_profile))
                .route("/profile", web::put().to(tourists::update_profile))
                .route("/dashboard", web::get().to(tourists::dashboard))
                .route("/bookings", web::get().to(tourists::my_bookings)),
        )
        .service(
            web::scope("/cuisines")
                .route("", web::get().to(cuisines::list_cuisines))
                .route("", web::post().to(cuisines::create_cuisine)),
        )
        .service(
            web::scope("/vendors")
                .route("", web::get().to(vendors::list_vendors))
                .route("/{id}", web::get().to(vendors::get_vendor))
                .route("/{id}/food-items", web::get().to(food_items::list_food_items))
                .route("/{id}/food-items", web::post().to(food_items::create_food_item))
                .route(
                    "/{id}/food-items/{item_id}",
                    web::put().to(food_items::update_food_item),
                )
                .route(
                    "/{id}/food-items/{item_id}",
                    web::delete().to(food_items::delete_food_item),
                )
                .route("/{id}/bookings", web::get().to(bookings::list_vendor_bookings))
                .route("/{id}/bookings", web::post().to(bookings::create_booking))
                .route(
                    "/{id}/bookings/{booking_id}/respond",
                    web::post().to(bookings::respond_to_booking),
                )
                .route("/{id}/reviews", web::post().to(reviews::create_review)),
        )
        .service(
            web::scope("/bookings")
                .route("/{id}", web::get().to(bookings::get_booking))
                .route("/{id}", web::put().to(bookings::update_booking))
                .route("/{id}/cancel", web::post().to(bookings::cancel_booking)),
        )
        .service(
            web::scope("/reviews")
                .route("/{id}", web::put().to(reviews::update_review))
                .route("/{id}", web::delete().to(reviews::delete_review)),
        )
        .service(
            web::scope("/admin")
                .route("/dashboard", web::get().to(admin::dashboard))
                .route("/users", web::get().to(admin::list_users))
                .route("/users/{id}", web::put().to(admin::update_user)),
        );
}
