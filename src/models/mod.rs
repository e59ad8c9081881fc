pub mod booking;
pub mod cuisine;
pub mod food_item;
pub mod review;
pub mod tourist;
pub mod user;
pub mod vendor;
