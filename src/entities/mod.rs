pub mod truck_category;
pub mod user;
