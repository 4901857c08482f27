//! # tramo_core - Metalwork Bill-of-Materials Engine
//!
//! `tramo_core` turns a job type (window, fence, pergola, spiral stair, ...)
//! and two dimensions into an itemized list of steel to buy: stock lengths
//! of tubing with waste and offcuts, piece counts for hardware and sheets,
//! and estimated consumables. Everything is JSON-serializable so the same
//! types can back a form, a CLI or a saved quote.
//!
//! ## Design Philosophy
//!
//! - **Deterministic**: the engine is a pure function of its inputs
//! - **Never fails on bad input**: invalid dimensions give an empty,
//!   clearly-labelled result instead of an error
//! - **JSON-First**: all data types implement Serialize/Deserialize
//! - **Rich Errors**: structured errors for lookups and persistence
//!
//! ## Quick Start
//!
//! ```rust
//! use tramo_core::{calculate, default_config, WorkType};
//!
//! let config = default_config(WorkType::Gate);
//! let result = calculate(WorkType::Gate, 3.0, 2.0, &config);
//!
//! for line in &result.lines {
//!     println!("{:<40} {:>3}", line.concept, line.purchase_quantity());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`work_types`] - Job catalog and family classification
//! - [`config`] - Calculation overrides and family defaults
//! - [`calculations`] - The BOM engine and its family branches
//! - [`materials`] - Priced material catalog
//! - [`quote`] - Material assignment and pricing
//! - [`store`] - Saved-quote persistence
//! - [`errors`] - Structured error types
//! - [`file_io`] - Quote files with atomic saves and locking

pub mod calculations;
pub mod config;
pub mod errors;
#[cfg(not(target_arch = "wasm32"))]
pub mod file_io;
pub mod materials;
pub mod quote;
pub mod store;
pub mod work_types;

// Re-export commonly used types at crate root for convenience
pub use calculations::{calculate, CalculationResult, LineKey, LineRole, MaterialLine};
pub use config::{default_config, CalculationConfig, FillType};
pub use errors::{CalcError, CalcResult};
#[cfg(not(target_arch = "wasm32"))]
pub use file_io::{load_quote, save_quote, FileLock};
pub use quote::{CalculationRequest, PricedQuote, Quote, QuoteSettings};
pub use store::{MemoryStore, QuoteStore};
#[cfg(not(target_arch = "wasm32"))]
pub use store::DirectoryStore;
pub use work_types::{classify, StructuralFamily, WorkType};
