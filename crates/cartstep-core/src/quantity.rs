//! # Quantity Module
//!
//! Quantity-safe arithmetic shared by the rounder and the restriction
//! validator.
//!
//! ## Why Not Plain f64?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Raw binary floats:                                                     │
//! │    0.1 + 0.2       = 0.30000000000000004  ❌                            │
//! │    0.3 % 0.1       = 0.09999999999999998  ❌ (looks off-grid!)          │
//! │                                                                         │
//! │  OUR SOLUTION: round every sum/difference to a fixed number of          │
//! │  decimal places, and compare with an epsilon of half a unit in the      │
//! │  last place.                                                            │
//! │    sum(0.1, 0.2)          = 0.3                                         │
//! │    subtract(5.5, 2.5)     = 3.0 (exactly)                               │
//! │    is_equal(0.0999.., 0.1) = true                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cartstep_core::quantity::QuantityCalculator;
//!
//! let calc = QuantityCalculator::new(2);
//! assert_eq!(calc.subtract(5.5, 2.5), 3.0);
//! assert!(calc.is_equal(calc.sum(0.1, 0.2), 0.3));
//! ```

use crate::validation::MAX_QUANTITY_PRECISION;
use crate::DEFAULT_QUANTITY_PRECISION;

// =============================================================================
// Quantity Calculator
// =============================================================================

/// Decimal-precision-aware arithmetic over `f64` quantities.
///
/// The precision comes from [`QuantityConfig`](crate::config::QuantityConfig)
/// so deployments can tune how many decimal places a quantity carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityCalculator {
    precision: u32,
}

impl QuantityCalculator {
    /// Creates a calculator rounding to `precision` decimal places.
    ///
    /// Precision is capped at [`MAX_QUANTITY_PRECISION`]; beyond that the
    /// scale factor overflows and the epsilon collapses to zero.
    #[inline]
    pub const fn new(precision: u32) -> Self {
        let precision = if precision > MAX_QUANTITY_PRECISION {
            MAX_QUANTITY_PRECISION
        } else {
            precision
        };
        QuantityCalculator { precision }
    }

    /// Number of decimal places kept by [`sum`](Self::sum) and
    /// [`subtract`](Self::subtract).
    #[inline]
    pub const fn precision(&self) -> u32 {
        self.precision
    }

    /// Half a unit in the last kept decimal place.
    ///
    /// ## Example
    /// ```rust
    /// use cartstep_core::quantity::QuantityCalculator;
    ///
    /// assert_eq!(QuantityCalculator::new(2).epsilon(), 0.005);
    /// assert_eq!(QuantityCalculator::new(0).epsilon(), 0.5);
    /// ```
    #[inline]
    pub fn epsilon(&self) -> f64 {
        0.5 / self.scale()
    }

    /// Rounds a quantity to the configured precision (half away from zero).
    pub fn round(&self, quantity: f64) -> f64 {
        let scale = self.scale();
        (quantity * scale).round() / scale
    }

    /// Adds two quantities without leaking binary representation error.
    #[inline]
    pub fn sum(&self, first: f64, second: f64) -> f64 {
        self.round(first + second)
    }

    /// Subtracts `second` from `first` without leaking representation error.
    #[inline]
    pub fn subtract(&self, first: f64, second: f64) -> f64 {
        self.round(first - second)
    }

    /// Epsilon-aware equality. Never compare quantities with `==`.
    #[inline]
    pub fn is_equal(&self, first: f64, second: f64) -> bool {
        (first - second).abs() < self.epsilon()
    }

    /// Returns true when the quantity has no fractional part (within epsilon).
    ///
    /// NaN and infinities are never whole.
    pub fn is_whole(&self, quantity: f64) -> bool {
        quantity.is_finite() && self.is_equal(quantity, quantity.round())
    }

    /// Returns true when `offset` is a whole multiple of `interval`.
    ///
    /// `fmod` can land just inside `±interval` instead of at 0
    /// (`3.0 % 0.1 == 0.0999..`), so both ends count as aligned. The sign
    /// follows `offset`, which is negative below the policy minimum.
    /// `interval` must be positive.
    pub fn is_multiple_of(&self, offset: f64, interval: f64) -> bool {
        let remainder = offset % interval;
        self.is_equal(remainder, 0.0) || self.is_equal(remainder.abs(), interval)
    }

    fn scale(&self) -> f64 {
        10_f64.powi(self.precision as i32)
    }
}

impl Default for QuantityCalculator {
    fn default() -> Self {
        QuantityCalculator::new(DEFAULT_QUANTITY_PRECISION)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtract_masks_representation_error() {
        let calc = QuantityCalculator::default();
        assert_eq!(calc.subtract(5.5, 2.5), 3.0);
        assert_eq!(calc.subtract(0.3, 0.1), 0.2);
        assert_ne!(0.3 - 0.1, 0.2); // raw float drift this type exists to hide
    }

    #[test]
    fn test_sum_rounds_to_precision() {
        let calc = QuantityCalculator::default();
        assert_eq!(calc.sum(0.1, 0.2), 0.3);
        assert_eq!(calc.sum(1.005, 0.0), 1.0); // 1.005 is stored as 1.00499..
        assert_eq!(calc.sum(2.0, 3.0), 5.0);
    }

    #[test]
    fn test_is_equal_uses_epsilon() {
        let calc = QuantityCalculator::default();
        assert!(calc.is_equal(0.3 % 0.1, 0.1));
        assert!(calc.is_equal(3.0, 3.004));
        assert!(!calc.is_equal(3.0, 3.01));
        assert!(calc.is_equal(-0.0, 0.0));
    }

    #[test]
    fn test_precision_is_configurable() {
        let coarse = QuantityCalculator::new(0);
        assert_eq!(coarse.sum(1.4, 0.0), 1.0);
        assert!(coarse.is_equal(1.0, 1.4));

        let fine = QuantityCalculator::new(4);
        assert_eq!(fine.sum(0.00011, 0.0), 0.0001);
        assert!(!fine.is_equal(1.0, 1.001));
    }

    #[test]
    fn test_is_whole() {
        let calc = QuantityCalculator::default();
        assert!(calc.is_whole(7.0));
        assert!(calc.is_whole(0.0));
        assert!(calc.is_whole(-4.0));
        assert!(calc.is_whole(calc.sum(5.5, 2.5)));
        assert!(calc.is_whole(6.9999999));
        assert!(!calc.is_whole(2.5));
        assert!(!calc.is_whole(f64::NAN));
        assert!(!calc.is_whole(f64::INFINITY));
    }

    #[test]
    fn test_is_multiple_of_absorbs_fmod_drift() {
        let calc = QuantityCalculator::default();
        assert!(calc.is_multiple_of(calc.subtract(3.0, 1.0), 0.1));
        assert!(calc.is_multiple_of(calc.subtract(1.3, 1.0), 0.1));
        assert!(calc.is_multiple_of(calc.subtract(1.0, 3.0), 0.1)); // negative offset
        assert!(calc.is_multiple_of(6.0, 3.0));
        assert!(calc.is_multiple_of(0.0, 0.5));
        assert!(!calc.is_multiple_of(0.25, 0.1));
        assert!(!calc.is_multiple_of(-1.0, 2.0));
        assert!(!calc.is_multiple_of(4.0, 3.0));
    }

    #[test]
    fn test_precision_is_capped() {
        let calc = QuantityCalculator::new(400);
        assert_eq!(calc.precision(), MAX_QUANTITY_PRECISION);
        assert!(calc.epsilon() > 0.0);
        assert!(calc.is_whole(5.0));
    }
}
