pub mod aggregation;
pub mod dataset;
pub mod error;
pub mod expression;
pub mod map;
pub mod period;
pub mod region;
pub mod series;
pub mod settings;

#[cfg(feature = "api")]
pub mod auth;
#[cfg(feature = "api")]
pub mod client;
