//! Primary-side pricing service whose calculator is produced by the
//! secondary injector.

use std::sync::Arc;
use tracing::debug;

use super::calculator::{Calculator, CalculatorError};
use super::product::ProductRepository;
use crate::domain::Product;

/// Pricing computations over the catalog, delegating arithmetic to the
/// secondary-managed [`Calculator`].
pub struct HybridPricingService {
    calculator: Arc<Calculator>,
    repository: Arc<ProductRepository>,
}

impl HybridPricingService {
    pub fn new(calculator: Arc<Calculator>, repository: Arc<ProductRepository>) -> Self {
        Self {
            calculator,
            repository,
        }
    }

    /// Sum of all product prices.
    pub fn total_value(&self) -> Result<f64, CalculatorError> {
        let mut total = 0.0;
        for product in self.repository.find_all() {
            total = self.calculator.calculate("add", total, product.price)?;
        }
        Ok(total)
    }

    pub fn average_price(&self) -> Result<f64, CalculatorError> {
        let count = self.repository.count();
        if count == 0 {
            return Ok(0.0);
        }
        self.calculator
            .calculate("divide", self.total_value()?, count as f64)
    }

    /// Discounted price for a single product, rounded to cents.
    pub fn apply_discount(&self, id: i64, percent: f64) -> Result<Option<f64>, CalculatorError> {
        let Some(product) = self.repository.find_by_id(id) else {
            return Ok(None);
        };
        let factor = self.calculator.calculate("subtract", 1.0, percent / 100.0)?;
        let discounted = self
            .calculator
            .process_business_logic(product.price, factor)?;
        debug!(id, percent, discounted, "discount applied");
        Ok(Some(discounted))
    }

    /// (min, max, mean) over all product prices.
    pub fn price_statistics(&self) -> (f64, f64, f64) {
        let prices: Vec<f64> = self
            .repository
            .find_all()
            .iter()
            .map(|product| product.price)
            .collect();
        self.calculator.stats(&prices)
    }

    /// Products whose price fails validation (non-finite or negative).
    pub fn validate_prices(&self) -> Vec<Product> {
        self.repository
            .find_all()
            .into_iter()
            .filter(|product| !product.price.is_finite() || product.price < 0.0)
            .collect()
    }

    /// Total value of one category, formatted by the calculator.
    pub fn process_category(&self, category: &str) -> Result<String, CalculatorError> {
        let mut total = 0.0;
        let products = self.repository.find_by_category(category);
        let count = products.len();
        for product in products {
            total = self.calculator.calculate("add", total, product.price)?;
        }
        Ok(format!(
            "{}: {} products worth {}",
            category,
            count,
            self.calculator.format_result(total)
        ))
    }

    /// Identifier of the bridged calculator instance.
    pub fn calculator_info(&self) -> &str {
        self.calculator.service_id()
    }
}
