//! Dashboard queries over a generated dataset.
//!
//! Pure projections: filter, aggregate, rank. Nothing here mutates the
//! dataset or consumes randomness.

use crate::{
    dataset::Dataset,
    calendar::YearMonth,
    model::{
        AccountManager, Industry, MerchantProfile, MonthlyVolumeRecord, RiskCategory, RiskFactor,
        Segment,
    },
    types::Volume,
};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ── Filtering ───────────────────────────────────────────────────────────────

/// Allow-lists per dimension. An empty list admits everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantFilter {
    #[serde(default)]
    pub industries:       Vec<Industry>,
    #[serde(default)]
    pub segments:         Vec<Segment>,
    #[serde(default)]
    pub account_managers: Vec<AccountManager>,
    #[serde(default)]
    pub risk_categories:  Vec<RiskCategory>,
}

impl MerchantFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_industries(mut self, industries: impl IntoIterator<Item = Industry>) -> Self {
        self.industries = industries.into_iter().collect();
        self
    }

    pub fn with_segments(mut self, segments: impl IntoIterator<Item = Segment>) -> Self {
        self.segments = segments.into_iter().collect();
        self
    }

    pub fn with_account_managers(
        mut self,
        managers: impl IntoIterator<Item = AccountManager>,
    ) -> Self {
        self.account_managers = managers.into_iter().collect();
        self
    }

    pub fn with_risk_categories(
        mut self,
        categories: impl IntoIterator<Item = RiskCategory>,
    ) -> Self {
        self.risk_categories = categories.into_iter().collect();
        self
    }

    pub fn matches(&self, profile: &MerchantProfile) -> bool {
        admits(&self.industries, &profile.industry)
            && admits(&self.segments, &profile.segment)
            && admits(&self.account_managers, &profile.account_manager)
            && admits(&self.risk_categories, &profile.risk_category)
    }

    /// Matching profiles in dataset order.
    pub fn apply<'a>(&self, dataset: &'a Dataset) -> Vec<&'a MerchantProfile> {
        dataset.profiles().iter().filter(|p| self.matches(p)).collect()
    }
}

fn admits<T: PartialEq>(allowed: &[T], value: &T) -> bool {
    allowed.is_empty() || allowed.contains(value)
}

// ── Aggregates ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskSummary {
    pub merchant_count:    usize,
    pub high_risk_count:   usize,
    pub medium_risk_count: usize,
    pub low_risk_count:    usize,
    /// Sum of average monthly volume over High and Medium merchants.
    pub at_risk_volume:    Volume,
    pub avg_risk_score:    Option<f64>,
}

impl RiskSummary {
    pub fn from_profiles(profiles: &[&MerchantProfile]) -> Self {
        let count = |category: RiskCategory| profiles.iter().filter(|p| p.risk_category == category).count();
        let at_risk_volume = profiles
            .iter()
            .filter(|p| p.is_at_risk())
            .map(|p| p.monthly_volume_avg)
            .sum();
        let avg_risk_score = (!profiles.is_empty()).then(|| {
            profiles.iter().map(|p| p.risk_score).sum::<f64>() / profiles.len() as f64
        });

        Self {
            merchant_count: profiles.len(),
            high_risk_count: count(RiskCategory::High),
            medium_risk_count: count(RiskCategory::Medium),
            low_risk_count: count(RiskCategory::Low),
            at_risk_volume,
            avg_risk_score,
        }
    }
}

/// Occurrences of each risk factor, most common first. Ties keep the
/// enumeration order. Factors that never occur are omitted.
pub fn risk_factor_counts(profiles: &[&MerchantProfile]) -> Vec<(RiskFactor, usize)> {
    let mut tally: BTreeMap<RiskFactor, usize> = BTreeMap::new();
    for factor in profiles.iter().flat_map(|p| p.risk_factors.iter()) {
        *tally.entry(*factor).or_default() += 1;
    }
    let mut counts: Vec<_> = tally.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    counts
}

pub fn top_risk_factors(profiles: &[&MerchantProfile], k: usize) -> Vec<(RiskFactor, usize)> {
    let mut counts = risk_factor_counts(profiles);
    counts.truncate(k);
    counts
}

/// Highest risk first; equal scores fall back to merchant id.
pub fn rank_by_risk<'a>(profiles: &[&'a MerchantProfile]) -> Vec<&'a MerchantProfile> {
    let mut ranked = profiles.to_vec();
    ranked.sort_by(|a, b| {
        b.risk_score
            .total_cmp(&a.risk_score)
            .then_with(|| a.merchant_id.cmp(&b.merchant_id))
    });
    ranked
}

// ── Recommendations ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    HighPriorityIntervention,
    IncreasedMonitoring,
    GrowthOpportunity,
}

impl Recommendation {
    pub fn for_category(category: RiskCategory) -> Self {
        match category {
            RiskCategory::High   => Self::HighPriorityIntervention,
            RiskCategory::Medium => Self::IncreasedMonitoring,
            RiskCategory::Low    => Self::GrowthOpportunity,
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            Self::HighPriorityIntervention => "High priority intervention required",
            Self::IncreasedMonitoring      => "Increased monitoring recommended",
            Self::GrowthOpportunity        => "Stable account, growth opportunity",
        }
    }
}

/// Indicative payment rates shown on a merchant's deep-dive panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentHealth {
    pub success_rate:       f64,
    pub authorization_rate: f64,
    pub fraud_rate:         f64,
}

impl PaymentHealth {
    pub fn for_category(category: RiskCategory) -> Self {
        let (success_rate, authorization_rate, fraud_rate) = match category {
            RiskCategory::Low    => (0.94, 0.96, 0.01),
            RiskCategory::Medium => (0.90, 0.93, 0.03),
            RiskCategory::High   => (0.85, 0.88, 0.05),
        };
        Self { success_rate, authorization_rate, fraud_rate }
    }
}

// ── Volume history ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimePeriod {
    CurrentMonth,
    Last3Months,
    Last6Months,
    YearToDate,
    AllTime,
}

impl TimePeriod {
    /// The trailing part of a merchant's series (oldest first, ending at
    /// the generation month) that falls inside this period.
    pub fn window<'a>(
        &self,
        rows: &'a [MonthlyVolumeRecord],
        as_of: NaiveDate,
    ) -> &'a [MonthlyVolumeRecord] {
        let keep = match self {
            Self::CurrentMonth => 1,
            Self::Last3Months  => 3,
            Self::Last6Months  => 6,
            Self::YearToDate   => rows
                .iter()
                .rev()
                .take_while(|r| r.month.year == as_of.year())
                .count(),
            Self::AllTime      => rows.len(),
        };
        &rows[rows.len() - keep.min(rows.len())..]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Declining,
    Flat,
    Growing,
}

/// Relative change under which a series counts as flat.
pub const FLAT_BAND: f64 = 0.02;
/// Months averaged for the "recent" side of a trend comparison.
pub const RECENT_MONTHS: usize = 4;
/// Months averaged for the "older" side of a trend comparison.
pub const OLDER_MONTHS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeTrendSummary {
    pub older_mean:  f64,
    pub recent_mean: f64,
    pub change:      f64,
    pub direction:   TrendDirection,
}

impl VolumeTrendSummary {
    /// Compare the first six months with the last four. `None` when the
    /// series is too short or the older months average to zero.
    pub fn from_series(series: &[Volume]) -> Option<Self> {
        if series.len() < OLDER_MONTHS + RECENT_MONTHS {
            return None;
        }
        let mean = |xs: &[Volume]| xs.iter().map(|&v| v as f64).sum::<f64>() / xs.len() as f64;
        let older_mean = mean(&series[..OLDER_MONTHS]);
        let recent_mean = mean(&series[series.len() - RECENT_MONTHS..]);
        if older_mean == 0.0 {
            return None;
        }
        let change = recent_mean / older_mean - 1.0;
        let direction = if change < -FLAT_BAND {
            TrendDirection::Declining
        } else if change > FLAT_BAND {
            TrendDirection::Growing
        } else {
            TrendDirection::Flat
        };
        Some(Self { older_mean, recent_mean, change, direction })
    }
}

/// Headline figures for one merchant's series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeInsights {
    /// Latest month against the month two before it. `None` for fewer
    /// than three months or a zero base.
    pub recent_trend:  Option<f64>,
    /// Latest month against the first month. `None` for a zero base.
    pub overall_trend: Option<f64>,
    pub peak_volume:   Volume,
    /// Earliest month reaching the peak.
    pub peak_month:    YearMonth,
}

impl VolumeInsights {
    /// `rows` oldest first, as returned by `Dataset::volumes_for`.
    pub fn from_rows(rows: &[MonthlyVolumeRecord]) -> Option<Self> {
        let first = rows.first()?;
        let last = rows.last()?;
        let relative = |base: Volume| (base > 0).then(|| last.volume as f64 / base as f64 - 1.0);

        let recent_trend = rows
            .len()
            .checked_sub(3)
            .and_then(|i| relative(rows[i].volume));
        let overall_trend = relative(first.volume);
        let peak = rows
            .iter()
            .fold(first, |best, row| if row.volume > best.volume { row } else { best });

        Some(Self {
            recent_trend,
            overall_trend,
            peak_volume: peak.volume,
            peak_month: peak.month,
        })
    }
}
