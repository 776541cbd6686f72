//! # Restriction Validator
//!
//! Checks a batch of proposed cart changes against each product's quantity
//! policy and collects every breach, not just the first.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  changes + quote items                                                  │
//! │       │                                                                 │
//! │       ├── 1. group key → SKU           (from changes)                   │
//! │       ├── 2. SKU → current quantity    (from quote)                     │
//! │       ├── 3. group key → resulting     quote[group key] ± change        │
//! │       ├── 4. ONE batched policy lookup for all distinct SKUs            │
//! │       │       missing SKU ──► default_restriction()                     │
//! │       ▼                                                                 │
//! │  for each group key (first-seen order):                                 │
//! │       ├── current whole and >= 0?       no → INCORRECT_QUANTITY, next   │
//! │       ├── resulting whole and                                           │
//! │       │     > 0 (addition) / >= 0 (removal)?  no → INCORRECT_QUANTITY   │
//! │       ├── resulting == 0 → full removal, always legal, next             │
//! │       └── min / interval / max checked independently                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Two Failure Tiers
//! - `Err(CoreError)`: malformed input or a failing policy lookup
//! - `Ok(ValidationResult)` with violations: the customer asked for a
//!   quantity the product does not allow
//!
//! ## Example
//! ```rust
//! use cartstep_core::{CartItem, InMemoryPolicyStore, QuantityPolicy, RestrictionValidator, ViolationKind};
//!
//! let mut store = InMemoryPolicyStore::new();
//! store.insert("PAPER-A4", QuantityPolicy::new(Some(8.0), None, Some(1.0))).unwrap();
//!
//! let validator = RestrictionValidator::default();
//! let quote = vec![CartItem::new("PAPER-A4", 5.0)];
//! let changes = vec![CartItem::new("PAPER-A4", 2.0)];
//!
//! let result = validator.validate_additions(&changes, &quote, &store).unwrap();
//! assert!(!result.is_success());
//! assert_eq!(result.violations()[0].kind, ViolationKind::MinNotFulfilled);
//! assert_eq!(result.violations()[0].actual_value, 7.0);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;
use ts_rs::TS;

use crate::cart::CartItem;
use crate::config::QuantityConfig;
use crate::error::{CoreError, CoreResult};
use crate::policy::{PolicyLookup, PolicyMap, QuantityPolicy};
use crate::quantity::QuantityCalculator;
use crate::validation::validate_sku;

// =============================================================================
// Violations
// =============================================================================

/// Symbolic kind of a policy breach. Rendering is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    /// Resulting quantity below the policy minimum.
    MinNotFulfilled,
    /// Resulting quantity above the policy maximum.
    MaxNotFulfilled,
    /// Resulting quantity not on the `min + k * interval` grid.
    IntervalNotFulfilled,
    /// Quantity is fractional, negative, or zero where an addition needs > 0.
    IncorrectQuantity,
}

impl ViolationKind {
    /// Glossary key for message rendering.
    pub const fn message_key(&self) -> &'static str {
        match self {
            ViolationKind::MinNotFulfilled => "cart.pre.check.quantity.min.failed",
            ViolationKind::MaxNotFulfilled => "cart.pre.check.quantity.max.failed",
            ViolationKind::IntervalNotFulfilled => "cart.pre.check.quantity.interval.failed",
            ViolationKind::IncorrectQuantity => "cart.pre.check.quantity.value.failed",
        }
    }
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViolationKind::MinNotFulfilled => write!(f, "MIN_NOT_FULFILLED"),
            ViolationKind::MaxNotFulfilled => write!(f, "MAX_NOT_FULFILLED"),
            ViolationKind::IntervalNotFulfilled => write!(f, "INTERVAL_NOT_FULFILLED"),
            ViolationKind::IncorrectQuantity => write!(f, "INCORRECT_QUANTITY"),
        }
    }
}

/// One policy breach for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// Which rule was breached.
    pub kind: ViolationKind,
    /// SKU of the offending item (not its group key).
    pub sku: String,
    /// The policy value that was breached (1 for incorrect quantities).
    pub restriction_value: f64,
    /// The quantity that breached it.
    pub actual_value: f64,
}

impl Violation {
    /// Placeholder map for message rendering, keyed like the glossary
    /// templates (`%sku%`, `%restrictionValue%`, `%actualValue%`).
    pub fn message_parameters(&self) -> serde_json::Value {
        json!({
            "%sku%": self.sku,
            "%restrictionValue%": self.restriction_value,
            "%actualValue%": self.actual_value,
        })
    }
}

// =============================================================================
// Validation Result
// =============================================================================

/// Outcome of a validation batch.
///
/// ## Invariant
/// `is_success() == violations().is_empty()`. The flag is derived once when
/// the batch is finalized and there is no way to flip it back.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    is_success: bool,
    violations: Vec<Violation>,
}

impl ValidationResult {
    /// Finalizes an ordered violation list.
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        ValidationResult {
            is_success: violations.is_empty(),
            violations,
        }
    }

    /// A result with no violations.
    pub fn success() -> Self {
        Self::from_violations(Vec::new())
    }

    pub fn is_success(&self) -> bool {
        self.is_success
    }

    /// Violations in the order they were found.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::success()
    }
}

// =============================================================================
// Restriction Validator
// =============================================================================

/// Which way a cart change moves the quote quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChangeDirection {
    Addition,
    Removal,
}

impl ChangeDirection {
    fn as_str(&self) -> &'static str {
        match self {
            ChangeDirection::Addition => "addition",
            ChangeDirection::Removal => "removal",
        }
    }
}

/// Resulting quantity for one group key.
#[derive(Debug, Clone, PartialEq)]
struct ResolvedQuantity {
    group_key: String,
    quantity: f64,
}

/// Validates cart changes against quantity policies.
#[derive(Debug, Clone)]
pub struct RestrictionValidator {
    calc: QuantityCalculator,
    default_min: f64,
}

impl RestrictionValidator {
    /// Builds a validator from a configuration, rejecting out-of-range values.
    pub fn new(config: &QuantityConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    fn from_validated(config: &QuantityConfig) -> Self {
        RestrictionValidator {
            calc: config.calculator(),
            default_min: config.default_min_quantity,
        }
    }

    /// Validates items being added: resulting = quote + change, which must
    /// be a positive whole number satisfying the policy.
    pub fn validate_additions<L>(
        &self,
        changes: &[CartItem],
        quote: &[CartItem],
        lookup: &L,
    ) -> CoreResult<ValidationResult>
    where
        L: PolicyLookup + ?Sized,
    {
        self.validate(ChangeDirection::Addition, changes, quote, lookup)
    }

    /// Validates items being removed: resulting = quote - change, which must
    /// be a non-negative whole number. Removing down to exactly zero is
    /// always allowed.
    pub fn validate_removals<L>(
        &self,
        changes: &[CartItem],
        quote: &[CartItem],
        lookup: &L,
    ) -> CoreResult<ValidationResult>
    where
        L: PolicyLookup + ?Sized,
    {
        self.validate(ChangeDirection::Removal, changes, quote, lookup)
    }

    fn validate<L>(
        &self,
        direction: ChangeDirection,
        changes: &[CartItem],
        quote: &[CartItem],
        lookup: &L,
    ) -> CoreResult<ValidationResult>
    where
        L: PolicyLookup + ?Sized,
    {
        for item in changes {
            validate_sku(&item.sku)?;
        }

        debug!(
            direction = direction.as_str(),
            changes = changes.len(),
            quote_items = quote.len(),
            "Validating quantity restrictions"
        );

        let sku_by_group_key = changed_sku_map(changes);
        let quote_quantity_by_sku = quote_quantities_by_sku(quote);
        let resolved = resolve_quantities(direction, changes, quote);

        let skus: BTreeSet<String> = sku_by_group_key.values().cloned().collect();
        let policies = PolicyMap::fetch(lookup, &skus)?;

        let mut violations = Vec::new();
        for ResolvedQuantity { group_key, quantity } in resolved {
            let sku = sku_by_group_key
                .get(&group_key)
                .ok_or_else(|| CoreError::UnresolvedGroupKey {
                    group_key: group_key.clone(),
                })?;
            let current = quote_quantity_by_sku.get(sku.as_str()).copied().unwrap_or(0.0);

            if !self.is_non_negative_whole(current) {
                push(&mut violations, ViolationKind::IncorrectQuantity, sku, 1.0, current);
                continue;
            }

            let resulting_ok = match direction {
                ChangeDirection::Addition => self.is_positive_whole(quantity),
                ChangeDirection::Removal => self.is_non_negative_whole(quantity),
            };
            if !resulting_ok {
                push(&mut violations, ViolationKind::IncorrectQuantity, sku, 1.0, quantity);
                continue;
            }

            let quantity = quantity.round();
            if quantity == 0.0 {
                continue;
            }

            self.check_policy(sku, quantity, policies.policy_for(sku), &mut violations);
        }

        debug!(
            direction = direction.as_str(),
            violations = violations.len(),
            "Quantity restriction validation finished"
        );

        Ok(ValidationResult::from_violations(violations))
    }

    /// Applies min, interval and max independently; one item can collect
    /// several violations.
    fn check_policy(
        &self,
        sku: &str,
        quantity: f64,
        policy: &QuantityPolicy,
        violations: &mut Vec<Violation>,
    ) {
        let min = policy.restriction_min(self.default_min);
        let interval = policy.interval_or_zero();

        if quantity < min {
            push(violations, ViolationKind::MinNotFulfilled, sku, min, quantity);
        }

        if interval > 0.0 {
            let offset = self.calc.subtract(quantity, min);
            if !self.calc.is_multiple_of(offset, interval) {
                push(violations, ViolationKind::IntervalNotFulfilled, sku, interval, quantity);
            }
        }

        if let Some(max) = policy.max {
            if quantity > max {
                push(violations, ViolationKind::MaxNotFulfilled, sku, max, quantity);
            }
        }
    }

    fn is_non_negative_whole(&self, quantity: f64) -> bool {
        self.calc.is_whole(quantity) && quantity.round() >= 0.0
    }

    fn is_positive_whole(&self, quantity: f64) -> bool {
        self.calc.is_whole(quantity) && quantity.round() > 0.0
    }
}

impl Default for RestrictionValidator {
    fn default() -> Self {
        RestrictionValidator::from_validated(&QuantityConfig::default())
    }
}

fn push(
    violations: &mut Vec<Violation>,
    kind: ViolationKind,
    sku: &str,
    restriction_value: f64,
    actual_value: f64,
) {
    debug!(sku, %kind, restriction_value, actual_value, "Quantity restriction violated");
    violations.push(Violation {
        kind,
        sku: sku.to_string(),
        restriction_value,
        actual_value,
    });
}

// =============================================================================
// Batch Maps
// =============================================================================

/// Group key → SKU for every change. Later changes overwrite earlier ones.
fn changed_sku_map(changes: &[CartItem]) -> HashMap<String, String> {
    changes
        .iter()
        .map(|item| (item.group_key().to_string(), item.sku.clone()))
        .collect()
}

/// SKU → quantity currently in the quote. Absent SKUs count as zero on
/// lookup; they are not inserted here.
fn quote_quantities_by_sku(quote: &[CartItem]) -> HashMap<&str, f64> {
    quote
        .iter()
        .map(|item| (item.sku.as_str(), item.quantity))
        .collect()
}

/// Group key → resulting quantity, in first-seen order. A repeated group
/// key keeps its first position and takes the last change's value.
fn resolve_quantities(
    direction: ChangeDirection,
    changes: &[CartItem],
    quote: &[CartItem],
) -> Vec<ResolvedQuantity> {
    let quote_by_group_key: HashMap<&str, f64> = quote
        .iter()
        .map(|item| (item.group_key(), item.quantity))
        .collect();

    let mut resolved: Vec<ResolvedQuantity> = Vec::with_capacity(changes.len());
    let mut positions: HashMap<&str, usize> = HashMap::with_capacity(changes.len());

    for item in changes {
        let group_key = item.group_key();
        let delta = match direction {
            ChangeDirection::Addition => item.quantity,
            ChangeDirection::Removal => -item.quantity,
        };
        let quantity = quote_by_group_key.get(group_key).copied().unwrap_or(0.0) + delta;

        match positions.get(group_key) {
            Some(&index) => resolved[index].quantity = quantity,
            None => {
                positions.insert(group_key, resolved.len());
                resolved.push(ResolvedQuantity {
                    group_key: group_key.to_string(),
                    quantity,
                });
            }
        }
    }

    resolved
}

// =============================================================================
// Unit Tests
// =============================================================================
