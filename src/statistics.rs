pub mod shared;
pub mod regression;
