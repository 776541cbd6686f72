//! # cartstep-core: Quantity Policy Rules for Carts
//!
//! This crate decides which quantities of a product a cart may hold. It
//! contains pure computations with no network or database dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Embedding Application                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            Cart change pipeline (add / remove items)            │   │
//! │  └───────────────┬───────────────────────────────┬─────────────────┘   │
//! │                  │ quantity hint                 │ pre-check            │
//! │  ┌───────────────▼───────────────────────────────▼─────────────────┐   │
//! │  │               ★ cartstep-core (THIS CRATE) ★                     │   │
//! │  │                                                                  │   │
//! │  │   ┌───────────┐   ┌───────────┐   ┌─────────────┐               │   │
//! │  │   │ quantity  │──►│  rounder  │   │ restriction │               │   │
//! │  │   │ calculator│──►│           │   │  validator  │               │   │
//! │  │   └───────────┘   └───────────┘   └──────┬──────┘               │   │
//! │  │                                          │ PolicyLookup (trait)  │   │
//! │  └──────────────────────────────────────────┼───────────────────────┘   │
//! │                                             ▼                           │
//! │                        Policy storage (outside this crate)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`quantity`] - Precision-aware add / subtract / compare
//! - [`config`] - Precision, default minimum, enumeration cap
//! - [`policy`] - `QuantityPolicy` and the `PolicyLookup` seam
//! - [`cart`] - Cart items (quote lines and proposed changes)
//! - [`rounder`] - Nearest allowed quantity
//! - [`restriction`] - Batch validation of additions and removals
//! - [`validation`] - Input shape checks
//! - [`error`] - Error types
//!
//! ## Example Usage
//!
//! ```rust
//! use cartstep_core::{QuantityConfig, QuantityPolicy, QuantityRounder};
//!
//! let config = QuantityConfig::default();
//! let rounder = QuantityRounder::new(&config).unwrap();
//!
//! // Sold from 2 upwards in steps of 3, at most 10: 2, 5, 8
//! let policy = QuantityPolicy::new(Some(2.0), Some(10.0), Some(3.0));
//! assert_eq!(rounder.nearest_allowed_quantity(&policy, 6.0), 5.0);
//! assert_eq!(rounder.nearest_allowed_quantity(&policy, 40.0), 8.0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod config;
pub mod error;
pub mod policy;
pub mod quantity;
pub mod restriction;
pub mod rounder;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::CartItem;
pub use config::QuantityConfig;
pub use error::{CoreError, CoreResult, ValidationError};
pub use policy::{InMemoryPolicyStore, PolicyLookup, QuantityPolicy};
pub use quantity::QuantityCalculator;
pub use restriction::{RestrictionValidator, ValidationResult, Violation, ViolationKind};
pub use rounder::QuantityRounder;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum quantity applied when a policy does not set one.
pub const DEFAULT_MIN_QUANTITY: f64 = 1.0;

/// Decimal places kept by quantity arithmetic unless configured otherwise.
pub const DEFAULT_QUANTITY_PRECISION: u32 = 2;
