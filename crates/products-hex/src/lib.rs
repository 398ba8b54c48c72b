//! products-hex: hexagonal Products API library (core + inbound HTTP)

pub mod config;
pub mod errors;

pub mod application;

pub use products_types::{domain, ports};

pub mod inbound; // HTTP adapter (server + handlers)
