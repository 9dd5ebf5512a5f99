//! Generator configuration.
//!
//! Every numeric knob the generator uses lives here. `Default` carries
//! the canonical values; `load()` reads `{data_dir}/generator.json`,
//! which ships with the same values.

use crate::{
    error::{GenError, GenResult},
    model::{FeatureUsage, RiskCategory, RiskFactor},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "generator.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRange {
    pub min: u64,
    pub max: u64, // inclusive
}

impl IntRange {
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }
}

/// Half-open `[min, max)`, drawn with `GenRng::uniform`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloatRange {
    pub min: f64,
    pub max: f64, // exclusive
}

impl FloatRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetaShape {
    pub alpha: u32,
    pub beta:  u32,
}

/// Additive nudges applied to the base risk draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskAdjustments {
    pub new_merchant_tenure_below: u32,
    pub new_merchant_delta:        f64,
    pub loyal_tenure_above:        u32,
    pub loyal_delta:               f64,
    pub small_business_delta:      f64,
    pub enterprise_delta:          f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    pub high:   f64,
    pub medium: f64,
}

impl RiskThresholds {
    pub fn categorize(&self, score: f64) -> RiskCategory {
        RiskCategory::bucket(score, self.high, self.medium)
    }
}

/// Per-category draw ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryPolicy {
    /// Number of risk factors, drawn only when the factor roll succeeds.
    pub factor_count:       IntRange,
    /// Probability that the merchant carries any risk factors at all.
    pub factor_probability: f64,
    pub support_tickets:    IntRange,
    pub trend:              FloatRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub tenure_months:        IntRange,
    pub base_risk_beta:       BetaShape,
    pub adjustments:          RiskAdjustments,
    pub thresholds:           RiskThresholds,
    pub high:                 CategoryPolicy,
    pub medium:               CategoryPolicy,
    pub low:                  CategoryPolicy,
    pub high_risk_usage_caps: FeatureUsage,
    pub base_volume:          IntRange,
    pub older_month_noise:    FloatRange,
    pub trend_floor:          f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            tenure_months: IntRange::new(1, 36),
            base_risk_beta: BetaShape { alpha: 2, beta: 5 },
            adjustments: RiskAdjustments {
                new_merchant_tenure_below: 3,
                new_merchant_delta:        0.20,
                loyal_tenure_above:        24,
                loyal_delta:               -0.10,
                small_business_delta:      0.05,
                enterprise_delta:          -0.05,
            },
            thresholds: RiskThresholds { high: 0.7, medium: 0.4 },
            high: CategoryPolicy {
                factor_count:       IntRange::new(2, 4),
                factor_probability: 1.0,
                support_tickets:    IntRange::new(5, 14),
                trend:              FloatRange::new(-0.15, -0.05),
            },
            medium: CategoryPolicy {
                factor_count:       IntRange::new(1, 2),
                factor_probability: 1.0,
                support_tickets:    IntRange::new(2, 6),
                trend:              FloatRange::new(-0.05, 0.05),
            },
            low: CategoryPolicy {
                factor_count:       IntRange::new(1, 1),
                factor_probability: 0.3,
                support_tickets:    IntRange::new(0, 2),
                trend:              FloatRange::new(0.05, 0.20),
            },
            high_risk_usage_caps: FeatureUsage {
                one_click:        50,
                subscription_api: 40,
                fraud_tools:      30,
                mobile_sdk:       20,
            },
            base_volume:       IntRange::new(5_000, 100_000),
            older_month_noise: FloatRange::new(0.85, 1.15),
            trend_floor:       0.5,
        }
    }
}

impl GeneratorConfig {
    /// Load from the data/ directory.
    /// In tests, use GeneratorConfig::default().
    pub fn load(data_dir: impl AsRef<Path>) -> GenResult<Self> {
        let path = data_dir.as_ref().join(CONFIG_FILE_NAME);
        let content = std::fs::read_to_string(&path)?;
        let config = Self::from_json_str(&content)?;
        log::info!("loaded generator config from {}", path.display());
        Ok(config)
    }

    /// Load from the data/ directory, falling back to defaults when the
    /// file does not exist. A file that exists but is malformed is an error.
    pub fn load_or_default(data_dir: impl AsRef<Path>) -> GenResult<Self> {
        let path = data_dir.as_ref().join(CONFIG_FILE_NAME);
        if path.exists() {
            Self::load(data_dir)
        } else {
            log::warn!("{} not found, using built-in defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn from_json_str(content: &str) -> GenResult<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn policy(&self, category: RiskCategory) -> &CategoryPolicy {
        match category {
            RiskCategory::High   => &self.high,
            RiskCategory::Medium => &self.medium,
            RiskCategory::Low    => &self.low,
        }
    }

    pub fn validate(&self) -> GenResult<()> {
        let invalid = |msg: String| Err(GenError::InvalidConfig(msg));

        check_int_range("tenure_months", &self.tenure_months)?;
        check_fits_u32("tenure_months", &self.tenure_months)?;
        if self.tenure_months.min == 0 {
            return invalid("tenure_months.min must be >= 1".into());
        }
        check_int_range("base_volume", &self.base_volume)?;
        check_float_range("older_month_noise", &self.older_month_noise)?;

        if self.base_risk_beta.alpha == 0 || self.base_risk_beta.beta == 0 {
            return invalid(format!(
                "base_risk_beta shapes must be >= 1, got ({}, {})",
                self.base_risk_beta.alpha, self.base_risk_beta.beta
            ));
        }

        let t = &self.thresholds;
        if !(0.0..=1.0).contains(&t.high) || !(0.0..=1.0).contains(&t.medium) || t.medium > t.high {
            return invalid(format!(
                "thresholds must satisfy 0 <= medium <= high <= 1, got medium={} high={}",
                t.medium, t.high
            ));
        }

        for category in RiskCategory::ALL {
            let policy = self.policy(category);
            let name = category.label();
            check_int_range(name, &policy.factor_count)?;
            check_int_range(name, &policy.support_tickets)?;
            check_fits_u32(name, &policy.support_tickets)?;
            check_float_range(name, &policy.trend)?;
            if !(0.0..=1.0).contains(&policy.factor_probability) {
                return invalid(format!(
                    "{name}.factor_probability must be in [0, 1], got {}",
                    policy.factor_probability
                ));
            }
            // Oversized factor counts are tolerated here and rejected at
            // sampling time as a constraint violation.
            if policy.factor_count.max > RiskFactor::ALL.len() as u64 {
                log::warn!(
                    "{name}.factor_count.max={} exceeds the {} known risk factors",
                    policy.factor_count.max,
                    RiskFactor::ALL.len()
                );
            }
        }

        if self.high_risk_usage_caps.as_array().iter().any(|&cap| cap > 100) {
            return invalid("high_risk_usage_caps must be percentages <= 100".into());
        }
        if !(0.0..=1.0).contains(&self.trend_floor) {
            return invalid(format!("trend_floor must be in [0, 1], got {}", self.trend_floor));
        }
        Ok(())
    }
}

fn check_int_range(name: &str, range: &IntRange) -> GenResult<()> {
    if range.min > range.max {
        return Err(GenError::InvalidConfig(format!(
            "{name}: min {} > max {}",
            range.min, range.max
        )));
    }
    if range.max - range.min == u64::MAX {
        return Err(GenError::InvalidConfig(format!("{name}: range spans all of u64")));
    }
    Ok(())
}

/// Tenure and ticket counts are stored as `u32`.
fn check_fits_u32(name: &str, range: &IntRange) -> GenResult<()> {
    if range.max > u64::from(u32::MAX) {
        return Err(GenError::InvalidConfig(format!(
            "{name}: max {} does not fit in u32",
            range.max
        )));
    }
    Ok(())
}

fn check_float_range(name: &str, range: &FloatRange) -> GenResult<()> {
    if !(range.min.is_finite() && range.max.is_finite()) || range.min > range.max {
        return Err(GenError::InvalidConfig(format!(
            "{name}: invalid range [{}, {})",
            range.min, range.max
        )));
    }
    Ok(())
}
