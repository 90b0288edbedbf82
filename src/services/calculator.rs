//! Arithmetic service bound in the secondary injector.

use std::fmt;
use tracing::debug;
use uuid::Uuid;

/// Calculator failure modes.
#[derive(Debug, Clone, PartialEq)]
pub enum CalculatorError {
    DivisionByZero,
    UnknownOperation(String),
}

impl fmt::Display for CalculatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalculatorError::DivisionByZero => write!(f, "division by zero"),
            CalculatorError::UnknownOperation(op) => {
                write!(f, "unknown operation: {}", op)
            }
        }
    }
}

impl std::error::Error for CalculatorError {}

/// Stateless arithmetic service with a per-instance identifier.
///
/// The identifier makes instance sharing observable: every caller that holds
/// the same singleton sees the same `CALC-` id.
pub struct Calculator {
    service_id: String,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator {
    pub fn new() -> Self {
        let service_id = format!("CALC-{}", Uuid::new_v4());
        debug!(service_id, "calculator instantiated");
        Self { service_id }
    }

    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    /// Apply a named operation. Word forms and symbols are both accepted.
    pub fn calculate(&self, operation: &str, a: f64, b: f64) -> Result<f64, CalculatorError> {
        match operation {
            "add" | "+" => Ok(a + b),
            "subtract" | "-" => Ok(a - b),
            "multiply" | "*" => Ok(a * b),
            "divide" | "/" => {
                if b == 0.0 {
                    return Err(CalculatorError::DivisionByZero);
                }
                Ok(a / b)
            }
            "power" | "^" => Ok(a.powf(b)),
            other => Err(CalculatorError::UnknownOperation(other.to_string())),
        }
    }

    pub fn format_result(&self, value: f64) -> String {
        format!("{:.2}", value)
    }

    pub fn is_valid_number(&self, input: &str) -> bool {
        input.trim().parse::<f64>().is_ok()
    }

    /// Chain of operations used by the demo flow: scale, then round to cents.
    pub fn process_business_logic(&self, base: f64, factor: f64) -> Result<f64, CalculatorError> {
        let scaled = self.calculate("multiply", base, factor)?;
        Ok((scaled * 100.0).round() / 100.0)
    }

    /// Min, max and mean of a sample. Empty input yields all zeros.
    pub fn stats(&self, values: &[f64]) -> (f64, f64, f64) {
        if values.is_empty() {
            return (0.0, 0.0, 0.0);
        }
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &value in values {
            min = min.min(value);
            max = max.max(value);
            sum += value;
        }
        (min, max, sum / values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_and_symbol_operations() {
        let calc = Calculator::new();
        assert_eq!(calc.calculate("add", 2.0, 3.0).unwrap(), 5.0);
        assert_eq!(calc.calculate("+", 2.0, 3.0).unwrap(), 5.0);
        assert_eq!(calc.calculate("subtract", 5.0, 3.0).unwrap(), 2.0);
        assert_eq!(calc.calculate("*", 4.0, 2.5).unwrap(), 10.0);
        assert_eq!(calc.calculate("/", 9.0, 3.0).unwrap(), 3.0);
    }

    #[test]
    fn exponentiation() {
        let calc = Calculator::new();
        assert_eq!(calc.calculate("power", 2.0, 3.0).unwrap(), 8.0);
        assert_eq!(calc.calculate("^", 2.0, 10.0).unwrap(), 1024.0);
        assert_eq!(calc.calculate("power", 9.0, 0.5).unwrap(), 3.0);
    }

    #[test]
    fn division_by_zero_is_an_error() {
        let calc = Calculator::new();
        assert_eq!(
            calc.calculate("divide", 1.0, 0.0),
            Err(CalculatorError::DivisionByZero)
        );
    }

    #[test]
    fn unknown_operation_is_reported() {
        let calc = Calculator::new();
        assert_eq!(
            calc.calculate("modulo", 1.0, 2.0),
            Err(CalculatorError::UnknownOperation("modulo".to_string()))
        );
    }

    #[test]
    fn result_formatting_and_validation() {
        let calc = Calculator::new();
        assert_eq!(calc.format_result(3.14159), "3.14");
        assert!(calc.is_valid_number(" 42.5 "));
        assert!(!calc.is_valid_number("forty two"));
    }

    #[test]
    fn business_logic_rounds_to_cents() {
        let calc = Calculator::new();
        assert_eq!(calc.process_business_logic(10.0, 1.055).unwrap(), 10.55);
    }

    #[test]
    fn stats_of_a_sample() {
        let calc = Calculator::new();
        let (min, max, mean) = calc.stats(&[2.0, 8.0, 5.0]);
        assert_eq!(min, 2.0);
        assert_eq!(max, 8.0);
        assert_eq!(mean, 5.0);
        assert_eq!(calc.stats(&[]), (0.0, 0.0, 0.0));
    }

    #[test]
    fn service_ids_are_unique_per_instance() {
        let a = Calculator::new();
        let b = Calculator::new();
        assert!(a.service_id().starts_with("CALC-"));
        assert_ne!(a.service_id(), b.service_id());
    }
}
