//! Synthetic merchant dataset generator.
//!
//! Every risk-dependent attribute (category, risk factors, usage caps,
//! support tickets, volume trend) flows from one per-merchant risk
//! score, so the profile table and the volume table never contradict
//! each other.
//!
//! DRAW ORDER (fixed; changing it changes every dataset for a seed):
//!   profiles, per merchant:
//!     industry, segment, account manager, tenure, base risk,
//!     [factor roll], factor count, factor labels, four usage draws,
//!     support tickets, base volume, volume trend
//!   then volume series, per merchant in profile order:
//!     six older-month noise draws (recent months draw nothing)

use crate::{
    calendar::{self, YearMonth},
    config::{GeneratorConfig, IntRange},
    dataset::Dataset,
    error::{GenError, GenResult},
    model::{
        AccountManager, FeatureUsage, Industry, MerchantProfile, MonthlyVolumeRecord,
        RiskCategory, RiskFactor, Segment,
    },
    rng::GenRng,
    types::{Volume, SERIES_MONTHS},
};
use chrono::NaiveDate;

/// Months at the start of each series drawn as noise around the baseline.
pub const NOISY_MONTHS: usize = 6;

/// Largest merchant count one run accepts; ids are four-digit `M####`.
pub const MAX_MERCHANTS: i64 = 9_999;

/// The categorical draws made before the risk score exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MerchantIdentity {
    pub sequence:        usize,
    pub industry:        Industry,
    pub segment:         Segment,
    pub account_manager: AccountManager,
    pub tenure_months:   u32,
}

pub struct DatasetGenerator {
    config: GeneratorConfig,
}

impl Default for DatasetGenerator {
    fn default() -> Self {
        Self {
            config: GeneratorConfig::default(),
        }
    }
}

impl DatasetGenerator {
    pub fn new(config: GeneratorConfig) -> GenResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate `count` merchant profiles and their 12-month volume series.
    ///
    /// `count` must lie in `1..=MAX_MERCHANTS`; anything else fails with
    /// `InvalidArgument` before any randomness is consumed.
    pub fn generate(&self, count: i64, rng: &mut GenRng, as_of: NaiveDate) -> GenResult<Dataset> {
        if !(1..=MAX_MERCHANTS).contains(&count) {
            return Err(GenError::InvalidArgument {
                name: "merchant count",
                reason: format!("must be in 1..={MAX_MERCHANTS}, got {count}"),
            });
        }
        let n = count as usize;

        let mut profiles = Vec::with_capacity(n);
        for sequence in 1..=n {
            profiles.push(self.draw_merchant(sequence, rng, as_of)?);
        }

        let months = calendar::trailing_months(as_of, SERIES_MONTHS);
        let mut volumes = Vec::with_capacity(n * SERIES_MONTHS);
        for profile in &profiles {
            volumes.extend(self.volume_series(profile, &months, rng));
        }

        let high = profiles.iter().filter(|p| p.risk_category == RiskCategory::High).count();
        let medium = profiles.iter().filter(|p| p.risk_category == RiskCategory::Medium).count();
        log::info!(
            "generated {n} merchants ({high} high, {medium} medium, {} low) and {} volume rows as of {as_of}",
            n - high - medium,
            volumes.len()
        );

        Dataset::new(as_of, rng.seed(), profiles, volumes)
    }

    /// Draw one merchant end to end.
    fn draw_merchant(
        &self,
        sequence: usize,
        rng: &mut GenRng,
        as_of: NaiveDate,
    ) -> GenResult<MerchantProfile> {
        let identity = MerchantIdentity {
            sequence,
            industry:        rng.pick(&Industry::ALL),
            segment:         rng.pick(&Segment::ALL),
            account_manager: rng.pick(&AccountManager::ALL),
            tenure_months:   draw_u32(rng, &self.config.tenure_months, "tenure_months")?,
        };

        let shape = self.config.base_risk_beta;
        let base_risk = rng.beta(shape.alpha, shape.beta)?;
        let risk_score = self.risk_score(base_risk, identity.tenure_months, identity.segment);

        let profile = self.profile_for_score(identity, risk_score, rng, as_of)?;
        log::debug!(
            "{} score={:.3} category={} factors={} trend={:+.3}",
            profile.merchant_id,
            profile.risk_score,
            profile.risk_category,
            profile.risk_factors.len(),
            profile.volume_trend
        );
        Ok(profile)
    }

    /// Apply tenure and segment adjustments to a base risk draw and clamp to [0, 1].
    pub fn risk_score(&self, base_risk: f64, tenure_months: u32, segment: Segment) -> f64 {
        let adj = &self.config.adjustments;
        let mut risk = base_risk;

        if tenure_months < adj.new_merchant_tenure_below {
            risk += adj.new_merchant_delta;
        } else if tenure_months > adj.loyal_tenure_above {
            risk += adj.loyal_delta;
        }

        match segment {
            Segment::SmallBusiness => risk += adj.small_business_delta,
            Segment::Enterprise    => risk += adj.enterprise_delta,
            Segment::MidMarket     => {}
        }

        risk.clamp(0.0, 1.0)
    }

    /// Derive every risk-dependent attribute from a fixed risk score.
    ///
    /// Consumes the stream in the documented order starting from the
    /// factor roll, so `draw_merchant` and direct callers agree.
    pub fn profile_for_score(
        &self,
        identity: MerchantIdentity,
        risk_score: f64,
        rng: &mut GenRng,
        as_of: NaiveDate,
    ) -> GenResult<MerchantProfile> {
        let risk_score = risk_score.clamp(0.0, 1.0);
        let risk_category = self.config.thresholds.categorize(risk_score);
        let policy = self.config.policy(risk_category);

        // A certain roll draws nothing, keeping High/Medium streams lean.
        let has_factors = policy.factor_probability >= 1.0 || rng.chance(policy.factor_probability);
        let factor_count = if has_factors {
            draw_in(rng, &policy.factor_count) as usize
        } else {
            0
        };
        let risk_factors = rng
            .sample_distinct(RiskFactor::ALL.len(), factor_count)?
            .into_iter()
            .map(|i| RiskFactor::ALL[i])
            .collect();

        let mut feature_usage = FeatureUsage {
            one_click:        draw_percent(rng),
            subscription_api: draw_percent(rng),
            fraud_tools:      draw_percent(rng),
            mobile_sdk:       draw_percent(rng),
        };
        if risk_category == RiskCategory::High {
            feature_usage = feature_usage.capped_at(self.config.high_risk_usage_caps);
        }

        let support_tickets = draw_u32(rng, &policy.support_tickets, "support_tickets")?;
        let monthly_volume_avg: Volume = draw_in(rng, &self.config.base_volume);
        let volume_trend = rng.uniform(policy.trend.min, policy.trend.max);
        let latest_volume = (monthly_volume_avg as f64 * (1.0 + volume_trend / 2.0)) as Volume;

        Ok(MerchantProfile {
            merchant_id: MerchantProfile::merchant_id_for(identity.sequence),
            merchant_name: MerchantProfile::merchant_name_for(identity.sequence),
            industry: identity.industry,
            segment: identity.segment,
            account_manager: identity.account_manager,
            tenure_months: identity.tenure_months,
            onboarding_date: calendar::onboarding_date(as_of, identity.tenure_months),
            risk_score,
            risk_category,
            risk_factors,
            feature_usage,
            support_tickets,
            monthly_volume_avg,
            latest_volume,
            volume_trend,
        })
    }

    /// Build one merchant's series: noise around the baseline for the
    /// older months, then a linear ramp along `volume_trend`.
    pub fn volume_series(
        &self,
        profile: &MerchantProfile,
        months: &[YearMonth],
        rng: &mut GenRng,
    ) -> Vec<MonthlyVolumeRecord> {
        let base = profile.monthly_volume_avg as f64;
        let noise = self.config.older_month_noise;

        months
            .iter()
            .enumerate()
            .map(|(m, &month)| {
                let volume = if m < NOISY_MONTHS {
                    base * rng.uniform(noise.min, noise.max)
                } else {
                    let ramp = (m + 1 - NOISY_MONTHS) as f64;
                    let trend_factor = 1.0 + ramp * (profile.volume_trend / NOISY_MONTHS as f64);
                    base * trend_factor.max(self.config.trend_floor)
                };
                MonthlyVolumeRecord {
                    merchant_id: profile.merchant_id.clone(),
                    month,
                    volume: volume as Volume,
                }
            })
            .collect()
    }
}

/// Generate with the default configuration.
pub fn generate(count: i64, rng: &mut GenRng, as_of: NaiveDate) -> GenResult<Dataset> {
    DatasetGenerator::default().generate(count, rng, as_of)
}

fn draw_in(rng: &mut GenRng, range: &IntRange) -> u64 {
    rng.range_inclusive(range.min, range.max)
}

fn draw_u32(rng: &mut GenRng, range: &IntRange, name: &str) -> GenResult<u32> {
    let value = draw_in(rng, range);
    u32::try_from(value)
        .map_err(|_| GenError::InvalidConfig(format!("{name} draw {value} does not fit in u32")))
}

fn draw_percent(rng: &mut GenRng) -> u8 {
    rng.range_inclusive(0, 100) as u8
}
