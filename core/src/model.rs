//! Merchant profile and monthly volume records, plus the fixed
//! categorical enumerations they draw from.

use crate::{
    calendar::YearMonth,
    types::{MerchantId, Percent, Volume},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ── Enumerations ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Industry {
    #[serde(rename = "E-commerce")]
    ECommerce,
    Retail,
    #[serde(rename = "SaaS")]
    Saas,
    Hospitality,
    Healthcare,
    Education,
    Finance,
}

impl Industry {
    pub const ALL: [Industry; 7] = [
        Self::ECommerce,
        Self::Retail,
        Self::Saas,
        Self::Hospitality,
        Self::Healthcare,
        Self::Education,
        Self::Finance,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::ECommerce   => "E-commerce",
            Self::Retail      => "Retail",
            Self::Saas        => "SaaS",
            Self::Hospitality => "Hospitality",
            Self::Healthcare  => "Healthcare",
            Self::Education   => "Education",
            Self::Finance     => "Finance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Segment {
    #[serde(rename = "Small Business")]
    SmallBusiness,
    #[serde(rename = "Mid-Market")]
    MidMarket,
    Enterprise,
}

impl Segment {
    pub const ALL: [Segment; 3] = [Self::SmallBusiness, Self::MidMarket, Self::Enterprise];

    pub fn label(&self) -> &'static str {
        match self {
            Self::SmallBusiness => "Small Business",
            Self::MidMarket     => "Mid-Market",
            Self::Enterprise    => "Enterprise",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AccountManager {
    #[serde(rename = "Alex Thompson")]
    AlexThompson,
    #[serde(rename = "Samantha Lee")]
    SamanthaLee,
    #[serde(rename = "Marcus Johnson")]
    MarcusJohnson,
    #[serde(rename = "Rachel Chen")]
    RachelChen,
    #[serde(rename = "David Kim")]
    DavidKim,
}

impl AccountManager {
    pub const ALL: [AccountManager; 5] = [
        Self::AlexThompson,
        Self::SamanthaLee,
        Self::MarcusJohnson,
        Self::RachelChen,
        Self::DavidKim,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::AlexThompson  => "Alex Thompson",
            Self::SamanthaLee   => "Samantha Lee",
            Self::MarcusJohnson => "Marcus Johnson",
            Self::RachelChen    => "Rachel Chen",
            Self::DavidKim      => "David Kim",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskFactor {
    #[serde(rename = "Volume Drop >30%")]
    VolumeDrop,
    #[serde(rename = "Low Feature Adoption")]
    LowFeatureAdoption,
    #[serde(rename = "Payment Failures")]
    PaymentFailures,
    #[serde(rename = "Support Tickets Increase")]
    SupportTicketsIncrease,
    #[serde(rename = "Competitor Integration")]
    CompetitorIntegration,
    #[serde(rename = "Contract End Approaching")]
    ContractEndApproaching,
    #[serde(rename = "Price Sensitivity")]
    PriceSensitivity,
    #[serde(rename = "Account Inactivity")]
    AccountInactivity,
}

impl RiskFactor {
    pub const ALL: [RiskFactor; 8] = [
        Self::VolumeDrop,
        Self::LowFeatureAdoption,
        Self::PaymentFailures,
        Self::SupportTicketsIncrease,
        Self::CompetitorIntegration,
        Self::ContractEndApproaching,
        Self::PriceSensitivity,
        Self::AccountInactivity,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::VolumeDrop             => "Volume Drop >30%",
            Self::LowFeatureAdoption     => "Low Feature Adoption",
            Self::PaymentFailures        => "Payment Failures",
            Self::SupportTicketsIncrease => "Support Tickets Increase",
            Self::CompetitorIntegration  => "Competitor Integration",
            Self::ContractEndApproaching => "Contract End Approaching",
            Self::PriceSensitivity       => "Price Sensitivity",
            Self::AccountInactivity      => "Account Inactivity",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskCategory {
    High,
    Medium,
    Low,
}

/// Default lower bound (inclusive) of the High bucket.
pub const HIGH_RISK_THRESHOLD: f64 = 0.7;
/// Default lower bound (inclusive) of the Medium bucket.
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.4;

impl RiskCategory {
    pub const ALL: [RiskCategory; 3] = [Self::High, Self::Medium, Self::Low];

    /// Bucket a score with the default thresholds.
    pub fn from_score(score: f64) -> Self {
        Self::bucket(score, HIGH_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD)
    }

    /// Lower bounds are inclusive: `score == high` is High.
    pub fn bucket(score: f64, high: f64, medium: f64) -> Self {
        if score >= high {
            Self::High
        } else if score >= medium {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::High   => "High",
            Self::Medium => "Medium",
            Self::Low    => "Low",
        }
    }
}

macro_rules! impl_display_via_label {
    ($($t:ty),*) => {
        $(impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.label())
            }
        })*
    };
}

impl_display_via_label!(Industry, Segment, AccountManager, RiskFactor, RiskCategory);

// ── Records ─────────────────────────────────────────────────────────────────

/// Feature adoption percentages. Also used for the High-risk caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureUsage {
    pub one_click:        Percent,
    pub subscription_api: Percent,
    pub fraud_tools:      Percent,
    pub mobile_sdk:       Percent,
}

impl FeatureUsage {
    /// Component-wise minimum against a set of ceilings.
    pub fn capped_at(self, caps: FeatureUsage) -> Self {
        Self {
            one_click:        self.one_click.min(caps.one_click),
            subscription_api: self.subscription_api.min(caps.subscription_api),
            fraud_tools:      self.fraud_tools.min(caps.fraud_tools),
            mobile_sdk:       self.mobile_sdk.min(caps.mobile_sdk),
        }
    }

    pub fn as_array(&self) -> [Percent; 4] {
        [self.one_click, self.subscription_api, self.fraud_tools, self.mobile_sdk]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantProfile {
    pub merchant_id:        MerchantId,
    pub merchant_name:      String,
    pub industry:           Industry,
    pub segment:            Segment,
    pub account_manager:    AccountManager,
    pub tenure_months:      u32,
    pub onboarding_date:    NaiveDate,
    pub risk_score:         f64,
    pub risk_category:      RiskCategory,
    pub risk_factors:       Vec<RiskFactor>,
    pub feature_usage:      FeatureUsage,
    pub support_tickets:    u32,
    pub monthly_volume_avg: Volume,
    pub latest_volume:      Volume,
    pub volume_trend:       f64,
}

impl MerchantProfile {
    pub fn merchant_id_for(sequence: usize) -> MerchantId {
        format!("M{sequence:04}")
    }

    pub fn merchant_name_for(sequence: usize) -> String {
        format!("Merchant {sequence}")
    }

    /// High and Medium merchants count toward at-risk volume.
    pub fn is_at_risk(&self) -> bool {
        matches!(self.risk_category, RiskCategory::High | RiskCategory::Medium)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyVolumeRecord {
    pub merchant_id: MerchantId,
    pub month:       YearMonth,
    pub volume:      Volume,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_lower_bounds_are_inclusive() {
        assert_eq!(RiskCategory::from_score(0.70), RiskCategory::High);
        assert_eq!(RiskCategory::from_score(0.6999), RiskCategory::Medium);
        assert_eq!(RiskCategory::from_score(0.40), RiskCategory::Medium);
        assert_eq!(RiskCategory::from_score(0.3999), RiskCategory::Low);
        assert_eq!(RiskCategory::from_score(0.0), RiskCategory::Low);
        assert_eq!(RiskCategory::from_score(1.0), RiskCategory::High);
    }

    #[test]
    fn merchant_ids_are_zero_padded() {
        assert_eq!(MerchantProfile::merchant_id_for(1), "M0001");
        assert_eq!(MerchantProfile::merchant_id_for(42), "M0042");
        assert_eq!(MerchantProfile::merchant_name_for(42), "Merchant 42");
    }

    #[test]
    fn usage_caps_take_the_minimum() {
        let usage = FeatureUsage { one_click: 90, subscription_api: 10, fraud_tools: 30, mobile_sdk: 100 };
        let caps = FeatureUsage { one_click: 50, subscription_api: 40, fraud_tools: 30, mobile_sdk: 20 };
        let capped = usage.capped_at(caps);
        assert_eq!(capped.as_array(), [50, 10, 30, 20]);
        assert_eq!(capped.capped_at(caps), capped);
    }

    #[test]
    fn enums_serialize_with_display_labels() {
        assert_eq!(serde_json::to_string(&Segment::SmallBusiness).unwrap(), "\"Small Business\"");
        assert_eq!(serde_json::to_string(&RiskFactor::VolumeDrop).unwrap(), "\"Volume Drop >30%\"");
        assert_eq!(serde_json::to_string(&Industry::ECommerce).unwrap(), "\"E-commerce\"");
        for factor in RiskFactor::ALL {
            assert_eq!(
                serde_json::to_string(&factor).unwrap(),
                format!("\"{}\"", factor.label())
            );
        }
    }
}
