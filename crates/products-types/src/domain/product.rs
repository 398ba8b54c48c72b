use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid name")]
    InvalidName,
    #[error("Invalid price")]
    InvalidPrice,
}

impl ValidationError {
    /// Name of the request field that failed.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::InvalidName => "name",
            ValidationError::InvalidPrice => "price",
        }
    }
}

/// A persisted product. `id` and both timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A product that passed validation but has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    name: String,
    price: f64,
}

pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::InvalidName);
    }
    Ok(trimmed.to_string())
}

pub fn validate_price(price: f64) -> Result<f64, ValidationError> {
    if !price.is_finite() || price < 0.0 {
        return Err(ValidationError::InvalidPrice);
    }
    Ok(price)
}

impl NewProduct {
    pub fn new(name: &str, price: f64) -> Result<Self, ValidationError> {
        let name = validate_name(name)?;
        let price = validate_price(price)?;
        Ok(Self { name, price })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn into_product(self, id: Uuid, now: DateTime<Utc>) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            created_at: now,
            updated_at: now,
        }
    }
}
