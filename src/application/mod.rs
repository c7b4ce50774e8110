//! Application services layer.

pub mod error;
pub mod products;
pub mod repos;
