//! # Quantity Policies
//!
//! The `(min, max, interval)` triple governing legal quantities for one
//! product, and the lookup seam through which policies reach the core.
//!
//! ## Policy Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  QuantityPolicy { min: 2, max: 10, interval: 3 }                        │
//! │                                                                         │
//! │  legal:   2 ── 5 ── 8                                                   │
//! │           ▲    ▲    ▲                                                   │
//! │          min  +3   +3     (11 would pass max=10, so it stops at 8)      │
//! │                                                                         │
//! │  min unset      → configured default minimum                            │
//! │  max unset      → unbounded                                             │
//! │  interval 0/unset → any quantity between min and max                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lookup Flow
//! ```text
//! RestrictionValidator ──► PolicyLookup::find_policies_by_skus({A, B, C})
//!                                   │   (one batched call per validation)
//!                                   ▼
//!                          { A: policy, C: policy }
//!                                   │
//!                                   ▼
//!                          PolicyMap: B ──► default_restriction()
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::validation::{validate_policy, validate_sku};

// =============================================================================
// Quantity Policy
// =============================================================================

/// Quantity restrictions for a single product.
///
/// Read-only snapshot: the core never mutates a policy it was handed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct QuantityPolicy {
    /// Smallest legal quantity.
    pub min: Option<f64>,
    /// Largest legal quantity, unbounded when absent.
    pub max: Option<f64>,
    /// Step between legal quantities, counted from `min`.
    pub interval: Option<f64>,
}

impl QuantityPolicy {
    /// Creates a policy from its three raw values.
    #[inline]
    pub const fn new(min: Option<f64>, max: Option<f64>, interval: Option<f64>) -> Self {
        QuantityPolicy { min, max, interval }
    }

    /// The policy applied to SKUs without a stored policy: any whole
    /// quantity of at least one.
    #[inline]
    pub const fn default_restriction() -> Self {
        QuantityPolicy {
            min: Some(1.0),
            max: None,
            interval: Some(1.0),
        }
    }

    /// Minimum used by the rounder: an unset or zero `min` falls back to
    /// `default_min`.
    pub fn rounding_min(&self, default_min: f64) -> f64 {
        match self.min {
            Some(min) if min != 0.0 => min,
            _ => default_min,
        }
    }

    /// Maximum used by the rounder: zero counts as unbounded.
    pub fn rounding_max(&self) -> Option<f64> {
        self.max.filter(|max| *max != 0.0)
    }

    /// Minimum used by the restriction validator: an explicit zero is kept.
    pub fn restriction_min(&self, default_min: f64) -> f64 {
        self.min.unwrap_or(default_min)
    }

    /// Step size, with unset meaning "no stepping constraint".
    pub fn interval_or_zero(&self) -> f64 {
        self.interval.unwrap_or(0.0)
    }
}

// =============================================================================
// Policy Lookup
// =============================================================================

/// Collaborator that resolves policies by SKU.
///
/// SKUs without a stored policy are simply absent from the returned map.
/// Implementations may fail; the failure aborts the validation call.
pub trait PolicyLookup {
    /// Fetches the policies for every SKU in `skus` in one call.
    fn find_policies_by_skus(
        &self,
        skus: &BTreeSet<String>,
    ) -> CoreResult<HashMap<String, QuantityPolicy>>;
}

impl PolicyLookup for HashMap<String, QuantityPolicy> {
    fn find_policies_by_skus(
        &self,
        skus: &BTreeSet<String>,
    ) -> CoreResult<HashMap<String, QuantityPolicy>> {
        Ok(skus
            .iter()
            .filter_map(|sku| self.get(sku).map(|policy| (sku.clone(), *policy)))
            .collect())
    }
}

// =============================================================================
// In-Memory Policy Store
// =============================================================================

/// A validated, in-process policy store.
///
/// ## Example
/// ```rust
/// use cartstep_core::{InMemoryPolicyStore, QuantityPolicy};
///
/// let mut store = InMemoryPolicyStore::new();
/// store.insert("TSHIRT-RED-M", QuantityPolicy::new(Some(2.0), None, Some(2.0))).unwrap();
/// assert_eq!(store.len(), 1);
/// assert!(store.insert("", QuantityPolicy::default()).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryPolicyStore {
    policies: HashMap<String, QuantityPolicy>,
}

impl InMemoryPolicyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `policy` for `sku`, replacing any previous one.
    ///
    /// Rejects malformed SKUs and policies that break `min <= max` or carry
    /// negative / non-finite values.
    pub fn insert(&mut self, sku: impl Into<String>, policy: QuantityPolicy) -> CoreResult<()> {
        let sku = sku.into();
        validate_sku(&sku)?;
        validate_policy(&policy)?;
        self.policies.insert(sku, policy);
        Ok(())
    }

    pub fn remove(&mut self, sku: &str) -> Option<QuantityPolicy> {
        self.policies.remove(sku)
    }

    pub fn get(&self, sku: &str) -> Option<&QuantityPolicy> {
        self.policies.get(sku)
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

impl PolicyLookup for InMemoryPolicyStore {
    fn find_policies_by_skus(
        &self,
        skus: &BTreeSet<String>,
    ) -> CoreResult<HashMap<String, QuantityPolicy>> {
        self.policies.find_policies_by_skus(skus)
    }
}

// =============================================================================
// Policy Map
// =============================================================================

/// Fetched policies with explicit fallback to
/// [`QuantityPolicy::default_restriction`] for SKUs the lookup did not know.
#[derive(Debug, Clone)]
pub(crate) struct PolicyMap {
    found: HashMap<String, QuantityPolicy>,
    fallback: QuantityPolicy,
}

impl PolicyMap {
    /// Runs the single batched lookup for `skus`.
    pub(crate) fn fetch<L>(lookup: &L, skus: &BTreeSet<String>) -> CoreResult<Self>
    where
        L: PolicyLookup + ?Sized,
    {
        let found = lookup.find_policies_by_skus(skus)?;
        Ok(PolicyMap {
            found,
            fallback: QuantityPolicy::default_restriction(),
        })
    }

    pub(crate) fn policy_for(&self, sku: &str) -> &QuantityPolicy {
        self.found.get(sku).unwrap_or(&self.fallback)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    fn skus(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_restriction() {
        let policy = QuantityPolicy::default_restriction();
        assert_eq!(policy.min, Some(1.0));
        assert_eq!(policy.interval, Some(1.0));
        assert_eq!(policy.max, None);
    }

    #[test]
    fn test_rounding_min_treats_zero_as_unset() {
        assert_eq!(QuantityPolicy::new(Some(0.0), None, None).rounding_min(1.0), 1.0);
        assert_eq!(QuantityPolicy::new(None, None, None).rounding_min(1.0), 1.0);
        assert_eq!(QuantityPolicy::new(Some(3.0), None, None).rounding_min(1.0), 3.0);
    }

    #[test]
    fn test_restriction_min_keeps_explicit_zero() {
        assert_eq!(QuantityPolicy::new(Some(0.0), None, None).restriction_min(1.0), 0.0);
        assert_eq!(QuantityPolicy::new(None, None, None).restriction_min(1.0), 1.0);
    }

    #[test]
    fn test_rounding_max_treats_zero_as_unbounded() {
        assert_eq!(QuantityPolicy::new(None, Some(0.0), None).rounding_max(), None);
        assert_eq!(QuantityPolicy::new(None, Some(4.0), None).rounding_max(), Some(4.0));
    }

    #[test]
    fn test_serde_camel_case() {
        let policy = QuantityPolicy::new(Some(2.0), None, Some(2.0));
        let json = serde_json::to_value(policy).unwrap();
        assert_eq!(json["min"], 2.0);
        assert!(json["max"].is_null());

        let parsed: QuantityPolicy =
            serde_json::from_str(r#"{"min":1.0,"max":6.0,"interval":null}"#).unwrap();
        assert_eq!(parsed, QuantityPolicy::new(Some(1.0), Some(6.0), None));
    }

    #[test]
    fn test_store_insert_validates() {
        let mut store = InMemoryPolicyStore::new();
        assert!(store.is_empty());

        store
            .insert("SKU-1", QuantityPolicy::new(Some(1.0), Some(5.0), Some(2.0)))
            .unwrap();
        assert_eq!(store.len(), 1);

        let err = store
            .insert("SKU-2", QuantityPolicy::new(Some(6.0), Some(5.0), None))
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(store.get("SKU-2").is_none());

        assert!(store.remove("SKU-1").is_some());
        assert!(store.is_empty());
    }

    #[test]
    fn test_lookup_omits_unknown_skus() {
        let mut store = InMemoryPolicyStore::new();
        store.insert("A", QuantityPolicy::new(Some(2.0), None, None)).unwrap();

        let found = store.find_policies_by_skus(&skus(&["A", "B"])).unwrap();
        assert_eq!(found.len(), 1);
        assert!(found.contains_key("A"));
        assert!(!found.contains_key("B"));
    }

    #[test]
    fn test_policy_map_falls_back_to_default() {
        let mut stored = HashMap::new();
        stored.insert("A".to_string(), QuantityPolicy::new(Some(4.0), None, Some(2.0)));

        let map = PolicyMap::fetch(&stored, &skus(&["A", "B"])).unwrap();
        assert_eq!(map.policy_for("A").min, Some(4.0));
        assert_eq!(*map.policy_for("B"), QuantityPolicy::default_restriction());
    }
}
