pub mod numeric;
pub mod product;
pub mod review;
