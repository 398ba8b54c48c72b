//! products-types: domain model and repository port shared by every adapter

pub mod domain;
pub mod ports;
