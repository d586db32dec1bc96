pub mod catalog;
pub mod reviews;
