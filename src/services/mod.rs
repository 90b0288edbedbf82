//! Business services layered over the engines.
//!
//! Primary-container services ([`ProductRepository`], [`ProductService`],
//! [`SupplierRepository`], [`SupplierService`], [`HybridPricingService`])
//! live in the application container; [`Calculator`] and
//! [`CrossProductService`] are bound in the secondary injector and reach the
//! primary-side services over the bridge.

pub mod calculator;
pub mod cross;
pub mod hybrid;
pub mod product;
pub mod supplier;

pub use calculator::{Calculator, CalculatorError};
pub use cross::CrossProductService;
pub use hybrid::HybridPricingService;
pub use product::{ProductRepository, ProductService};
pub use supplier::{SupplierRepository, SupplierService};
