//! Client for the World Air Quality Index (WAQI) feed endpoint.

pub mod client;
pub mod config;
pub mod feed;

pub use client::WaqiClient;
pub use config::WaqiConfig;
