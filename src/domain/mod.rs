//! Domain entities persisted by the two engines.
//!
//! The two entity sets are disjoint by design: `Product` rows live in the
//! catalog engine, `Supplier` rows live in the directory engine, and no
//! operation ever spans both.

use serde::{Deserialize, Serialize};

/// Catalog entity (engine 1).
///
/// `id == 0` marks a transient row; the engine assigns an identifier on
/// persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
}

impl Product {
    pub fn new(name: &str, description: &str, price: f64, category: &str) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            description: description.to_string(),
            price,
            category: category.to_string(),
        }
    }
}

/// Directory entity (engine 2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub city: String,
    pub phone: String,
    pub category: String,
}

impl Supplier {
    pub fn new(name: &str, address: &str, city: &str, phone: &str, category: &str) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            address: address.to_string(),
            city: city.to_string(),
            phone: phone.to_string(),
            category: category.to_string(),
        }
    }
}
