//! # Pure Data Module - Data Transfer Objects Only
//!
//! ## Responsibilities
//!
//! - Define configuration data structures
//! - Provide TOML → DTO mapping
//!
//! ## Prohibited
//!
//! **No business logic, validation or default value calculation.**
//! Empty values are valid facts; the bootstrap layer decides what they mean.

mod app_config;

pub use app_config::AppConfig;
