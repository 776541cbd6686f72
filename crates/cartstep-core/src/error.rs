//! # Error Types
//!
//! Domain-specific error types for cartstep-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  CoreError        - Fatal for the call (returned as Err)               │
//! │  ├── UnresolvedGroupKey   inconsistent change input                    │
//! │  ├── PolicyLookup         collaborator failure                         │
//! │  ├── InvalidConfig / Config*   quantity.toml problems                  │
//! │  └── Validation           malformed input shape                        │
//! │                                                                         │
//! │  ValidationError  - Input shape failures (SKU, policy, config ranges)  │
//! │                                                                         │
//! │  NOT errors: MIN/MAX/INTERVAL/INCORRECT quantity breaches.             │
//! │  Those are `Violation`s inside an Ok(ValidationResult).                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (SKU, group key, field)
//! 3. Errors are enum variants, never String
//! 4. Business-rule breaches are data, not errors

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors that abort a rounding, validation or configuration call.
///
/// These indicate caller or integration bugs rather than a customer asking
/// for a quantity the product does not allow.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A change item's group key has no SKU behind it.
    ///
    /// ## When This Occurs
    /// Guards the pairing of resolved group keys with the group-key → SKU
    /// map. Both are built from the same change list, so a well-formed call
    /// never returns it; it stands in for a panic if that pairing breaks.
    #[error("Change references group key '{group_key}' with no resolvable SKU")]
    UnresolvedGroupKey { group_key: String },

    /// The policy-lookup collaborator failed.
    #[error("Policy lookup failed: {reason}")]
    PolicyLookup { reason: String },

    /// Configuration values are out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration file could not be read or written.
    #[error("Configuration I/O failed: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// The configuration file is not valid TOML for `QuantityConfig`.
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early checks before any quantity rule runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., SKU with whitespace).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Value is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Policy minimum is above its maximum.
    #[error("quantity min {min} exceeds quantity max {max}")]
    MinExceedsMax { min: f64, max: f64 },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
