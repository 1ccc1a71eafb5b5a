//! Typed REST client for the shop services.
//!
//! Mirrors every endpoint the services expose. Works equally against three
//! separately deployed services or the single-process `shop` binary.

pub mod client;
pub mod config;
pub mod error;

pub use client::{HealthReport, Service, ShopClient};
pub use config::ClientConfig;
pub use error::ClientError;
