//! # Validation Module
//!
//! Input sanity checks that run before any quantity rule.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: THIS MODULE - input shape                                    │
//! │  ├── SKU present, bounded, no whitespace                               │
//! │  ├── Policy numbers finite, non-negative, min <= max                   │
//! │  └── Failure = Err(ValidationError), the call is aborted               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: restriction - business rules                                 │
//! │  ├── whole, non-negative / positive quantities                         │
//! │  ├── min / interval / max                                              │
//! │  └── Failure = Violation, the batch continues                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cartstep_core::validation::{validate_policy, validate_sku};
//! use cartstep_core::QuantityPolicy;
//!
//! assert!(validate_sku("TSHIRT-RED-M").is_ok());
//! assert!(validate_policy(&QuantityPolicy::new(Some(2.0), Some(10.0), Some(2.0))).is_ok());
//! ```

use crate::error::ValidationError;
use crate::policy::QuantityPolicy;

/// Result type for validation operations.
pub type InputResult<T> = Result<T, ValidationError>;

/// Longest SKU accepted.
pub const MAX_SKU_LENGTH: usize = 255;

/// Largest supported decimal precision for quantity arithmetic.
pub const MAX_QUANTITY_PRECISION: u32 = 10;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - At most [`MAX_SKU_LENGTH`] characters
/// - Must not contain whitespace or control characters
///
/// ## Example
/// ```rust
/// use cartstep_core::validation::validate_sku;
///
/// assert!(validate_sku("COKE-330").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("has space").is_err());
/// ```
pub fn validate_sku(sku: &str) -> InputResult<()> {
    if sku.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.chars().count() > MAX_SKU_LENGTH {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: MAX_SKU_LENGTH,
        });
    }

    if sku.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must not contain whitespace or control characters".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates the invariants of a quantity policy.
///
/// ## Rules
/// - Every set value is finite and `>= 0`
/// - `min <= max` when both are set
pub fn validate_policy(policy: &QuantityPolicy) -> InputResult<()> {
    validate_policy_value("quantity_min", policy.min)?;
    validate_policy_value("quantity_max", policy.max)?;
    validate_policy_value("quantity_interval", policy.interval)?;

    if let (Some(min), Some(max)) = (policy.min, policy.max) {
        if min > max {
            return Err(ValidationError::MinExceedsMax { min, max });
        }
    }

    Ok(())
}

fn validate_policy_value(field: &str, value: Option<f64>) -> InputResult<()> {
    match value {
        Some(v) if !v.is_finite() => Err(ValidationError::NotFinite {
            field: field.to_string(),
        }),
        Some(v) if v < 0.0 => Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Validates a decimal precision for quantity arithmetic.
pub fn validate_precision(precision: u32) -> InputResult<()> {
    if precision > MAX_QUANTITY_PRECISION {
        return Err(ValidationError::OutOfRange {
            field: "precision".to_string(),
            min: 0,
            max: MAX_QUANTITY_PRECISION as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
