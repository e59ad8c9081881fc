pub mod admin;
pub mod bookings;
pub mod cuisines;
pub mod food_items;
pub mod reviews;
pub mod search;
pub mod tourists;
pub mod users;
pub mod vendors;
