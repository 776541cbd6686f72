//! # Quantity Configuration
//!
//! Tunables for quantity arithmetic and rounding.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CARTSTEP_QUANTITY_PRECISION=3                                      │
//! │     CARTSTEP_DEFAULT_MIN_QUANTITY=1                                    │
//! │     CARTSTEP_MAX_ALLOWED_CANDIDATES=5000                               │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/cartstep/quantity.toml (Linux)                           │
//! │     ~/Library/Application Support/com.cartstep.cartstep/... (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     precision 2, default min 1, 10 000 candidates                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # quantity.toml
//! precision = 2
//! default_min_quantity = 1.0
//! max_allowed_candidates = 10000
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{CoreError, CoreResult};
use crate::quantity::QuantityCalculator;
use crate::validation;
use crate::{DEFAULT_MIN_QUANTITY, DEFAULT_QUANTITY_PRECISION};

const ENV_PRECISION: &str = "CARTSTEP_QUANTITY_PRECISION";
const ENV_DEFAULT_MIN: &str = "CARTSTEP_DEFAULT_MIN_QUANTITY";
const ENV_MAX_CANDIDATES: &str = "CARTSTEP_MAX_ALLOWED_CANDIDATES";

// =============================================================================
// Quantity Config
// =============================================================================

/// Complete quantity configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantityConfig {
    /// Decimal places kept by quantity-safe arithmetic.
    /// Equality epsilon is half a unit in this place.
    #[serde(default = "default_precision")]
    pub precision: u32,

    /// Minimum used when a policy has no `min` of its own.
    #[serde(default = "default_min_quantity")]
    pub default_min_quantity: f64,

    /// Upper bound on allowed-quantity enumeration in the rounder.
    /// Beyond this the rounder switches to arithmetic neighbour selection.
    #[serde(default = "default_max_allowed_candidates")]
    pub max_allowed_candidates: usize,
}

fn default_precision() -> u32 {
    DEFAULT_QUANTITY_PRECISION
}

fn default_min_quantity() -> f64 {
    DEFAULT_MIN_QUANTITY
}

fn default_max_allowed_candidates() -> usize {
    10_000
}

impl Default for QuantityConfig {
    fn default() -> Self {
        QuantityConfig {
            precision: default_precision(),
            default_min_quantity: default_min_quantity(),
            max_allowed_candidates: default_max_allowed_candidates(),
        }
    }
}

impl QuantityConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (quantity.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> CoreResult<Self> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// [`load`](Self::load) with overrides read from `lookup` instead of the
    /// process environment.
    fn load_with<F>(config_path: Option<PathBuf>, lookup: F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading quantity config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(lookup);
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load quantity config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(contents: &str) -> CoreResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Renders the configuration as a TOML document.
    pub fn to_toml_string(&self) -> CoreResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CoreResult<()> {
        validation::validate_precision(self.precision)?;

        if !self.default_min_quantity.is_finite() || self.default_min_quantity <= 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "default_min_quantity must be a positive number, got {}",
                self.default_min_quantity
            )));
        }

        if self.max_allowed_candidates == 0 {
            return Err(CoreError::InvalidConfig(
                "max_allowed_candidates must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Returns the arithmetic helper for this precision.
    pub fn calculator(&self) -> QuantityCalculator {
        QuantityCalculator::new(self.precision)
    }

    /// Applies overrides from any key/value source. Unparseable values are
    /// logged and ignored.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_PRECISION) {
            match raw.trim().parse::<u32>() {
                Ok(precision) => {
                    debug!(precision, "Overriding quantity precision from environment");
                    self.precision = precision;
                }
                Err(_) => warn!(value = %raw, "Ignoring unparseable {}", ENV_PRECISION),
            }
        }

        if let Some(raw) = lookup(ENV_DEFAULT_MIN) {
            match raw.trim().parse::<f64>() {
                Ok(min) => {
                    debug!(min, "Overriding default min quantity from environment");
                    self.default_min_quantity = min;
                }
                Err(_) => warn!(value = %raw, "Ignoring unparseable {}", ENV_DEFAULT_MIN),
            }
        }

        if let Some(raw) = lookup(ENV_MAX_CANDIDATES) {
            match raw.trim().parse::<usize>() {
                Ok(limit) => self.max_allowed_candidates = limit,
                Err(_) => warn!(value = %raw, "Ignoring unparseable {}", ENV_MAX_CANDIDATES),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "cartstep", "cartstep")
            .map(|dirs| dirs.config_dir().join("quantity.toml"))
    }
}
