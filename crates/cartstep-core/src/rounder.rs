//! # Quantity Rounder
//!
//! Corrects an arbitrary requested quantity to the nearest quantity a
//! product's policy allows.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  requested q, policy (min, max, interval)                               │
//! │       │                                                                 │
//! │       ├── q < min ─────────────────────────────► return min             │
//! │       │                                                                 │
//! │       ├── q > max ──► q := max                                          │
//! │       │                                                                 │
//! │       ├── interval == 0 ───────────────────────► return q               │
//! │       │                                                                 │
//! │       ├── (q - min) mod interval ≈ 0 ──────────► return q               │
//! │       │                                                                 │
//! │       └── enumerate min, min+i, ... ≤ upper (descending)                │
//! │           upper = max, or q + interval when unbounded                   │
//! │                │                                                        │
//! │                ▼                                                        │
//! │           closest to q; on a tie the LARGER value wins                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use cartstep_core::{QuantityConfig, QuantityPolicy, QuantityRounder};
//!
//! let rounder = QuantityRounder::new(&QuantityConfig::default()).unwrap();
//! let policy = QuantityPolicy::new(Some(1.0), None, Some(2.0));
//!
//! assert_eq!(rounder.nearest_allowed_quantity(&policy, 5.0), 5.0);
//! assert_eq!(rounder.nearest_allowed_quantity(&policy, 4.0), 5.0); // tie: 3 or 5
//! assert_eq!(rounder.nearest_allowed_quantity(&policy, 0.0), 1.0);
//! ```

use tracing::{trace, warn};

use crate::config::QuantityConfig;
use crate::error::CoreResult;
use crate::policy::QuantityPolicy;
use crate::quantity::QuantityCalculator;

/// Nearest-allowed-quantity calculator.
#[derive(Debug, Clone)]
pub struct QuantityRounder {
    calc: QuantityCalculator,
    default_min: f64,
    max_candidates: usize,
}

impl QuantityRounder {
    /// Builds a rounder from a configuration, rejecting out-of-range values.
    pub fn new(config: &QuantityConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    fn from_validated(config: &QuantityConfig) -> Self {
        QuantityRounder {
            calc: config.calculator(),
            default_min: config.default_min_quantity,
            max_candidates: config.max_allowed_candidates,
        }
    }

    /// Returns the policy-legal quantity nearest to `quantity`.
    ///
    /// ## User Workflow
    /// ```text
    /// Customer types 4 for a product sold in pairs starting at 1 (1, 3, 5, ..)
    ///      │
    ///      ▼
    /// nearest_allowed_quantity(policy, 4) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Quantity field is corrected to 5 before the cart change is sent
    /// ```
    pub fn nearest_allowed_quantity(&self, policy: &QuantityPolicy, quantity: f64) -> f64 {
        let min = policy.rounding_min(self.default_min);
        let max = policy.rounding_max();
        let interval = policy.interval_or_zero();

        if quantity < min {
            trace!(quantity, min, "Quantity below minimum, clamping up");
            return min;
        }

        let quantity = match max {
            Some(max) if quantity > max => max,
            _ => quantity,
        };

        if interval <= 0.0 {
            return quantity;
        }

        if self.calc.is_multiple_of(self.calc.subtract(quantity, min), interval) {
            return quantity;
        }

        let upper = max.unwrap_or_else(|| self.calc.sum(quantity, interval));
        let allowed = self.allowed_quantities(quantity, min, upper, interval);
        let nearest = self.nearest_from_allowed(quantity, &allowed);

        trace!(quantity, nearest, candidates = allowed.len(), "Snapped quantity to interval");
        nearest
    }

    /// Legal values `min, min + interval, ...` up to `max`, largest first.
    fn allowed_quantities(&self, quantity: f64, min: f64, max: f64, interval: f64) -> Vec<f64> {
        if self.calc.sum(min, interval) > max {
            return vec![min];
        }

        let eps = self.calc.epsilon();
        let steps = ((max - min + eps) / interval).floor();

        if steps + 1.0 > self.max_candidates as f64 {
            warn!(
                min,
                max,
                interval,
                limit = self.max_candidates,
                "Allowed quantity set too large to enumerate, using nearest grid neighbours"
            );
            return self.grid_neighbours(quantity, min, max, interval);
        }

        (0..=steps as u64)
            .rev()
            .map(|k| self.calc.round(min + k as f64 * interval))
            .filter(|value| *value <= max + eps)
            .collect()
    }

    /// The grid points directly above and below `quantity`, largest first.
    fn grid_neighbours(&self, quantity: f64, min: f64, max: f64, interval: f64) -> Vec<f64> {
        let k = ((quantity - min) / interval).floor().max(0.0);
        let below = self.calc.round(min + k * interval);
        let above = self.calc.round(min + (k + 1.0) * interval);

        if above <= max + self.calc.epsilon() {
            vec![above, below]
        } else {
            vec![below]
        }
    }

    /// Scans `allowed` in order; a candidate only replaces the current best
    /// when strictly closer, so ties keep the earlier (larger) value.
    fn nearest_from_allowed(&self, quantity: f64, allowed: &[f64]) -> f64 {
        if let [only] = allowed {
            return *only;
        }

        let mut nearest: Option<f64> = None;
        for &candidate in allowed {
            let replace = match nearest {
                None => true,
                Some(best) => {
                    self.calc.subtract(quantity, best).abs()
                        > self.calc.subtract(candidate, quantity).abs()
                }
            };
            if replace {
                nearest = Some(candidate);
            }
        }

        nearest.unwrap_or(quantity)
    }
}

impl Default for QuantityRounder {
    fn default() -> Self {
        QuantityRounder::from_validated(&QuantityConfig::default())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
