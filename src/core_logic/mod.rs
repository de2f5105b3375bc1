pub mod aggregation;
pub mod classification;
pub mod ranking;
