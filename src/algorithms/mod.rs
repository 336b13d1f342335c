pub mod bounding;
pub mod common;
