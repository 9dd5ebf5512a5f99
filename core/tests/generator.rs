//! Generator contract: shape, bounds, and the correlations that tie
//! every risk-dependent field to the risk score.

use chrono::NaiveDate;
use churnboard_core::{
    calendar::YearMonth,
    config::GeneratorConfig,
    generate,
    generator::{MerchantIdentity, MAX_MERCHANTS},
    model::{AccountManager, Industry, RiskCategory, Segment},
    Dataset, DatasetGenerator, GenError, GenRng,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

fn make_dataset(n: i64, seed: u64) -> Dataset {
    let mut rng = GenRng::new(seed);
    generate(n, &mut rng, as_of()).unwrap()
}

fn mean(xs: &[u64]) -> f64 {
    xs.iter().map(|&x| x as f64).sum::<f64>() / xs.len() as f64
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn produces_n_profiles_and_twelve_rows_each() {
    for n in [1, 7, 100] {
        let dataset = make_dataset(n, 42);
        assert_eq!(dataset.profiles().len(), n as usize);
        assert_eq!(dataset.volumes().len(), 12 * n as usize);
    }
}

#[test]
fn single_merchant_gets_a_full_series() {
    let dataset = make_dataset(1, 42);
    let profile = &dataset.profiles()[0];
    assert_eq!(profile.merchant_id, "M0001");
    assert_eq!(profile.merchant_name, "Merchant 1");
    assert_eq!(dataset.volumes_for("M0001").unwrap().len(), 12);
}

#[test]
fn zero_and_negative_counts_are_invalid() {
    let mut rng = GenRng::new(42);
    let untouched = rng.clone().next_u64();

    for n in [0, -1, -100] {
        match generate(n, &mut rng, as_of()) {
            Err(GenError::InvalidArgument { .. }) => {}
            other => panic!("generate({n}) should fail with InvalidArgument, got {other:?}"),
        }
    }
    // Rejection happens before any sampling.
    assert_eq!(rng.next_u64(), untouched);
}

#[test]
fn oversized_counts_are_invalid() {
    let mut rng = GenRng::new(42);
    let untouched = rng.clone().next_u64();

    for n in [MAX_MERCHANTS + 1, i64::MAX] {
        match generate(n, &mut rng, as_of()) {
            Err(GenError::InvalidArgument { name, .. }) => assert_eq!(name, "merchant count"),
            other => panic!("generate({n}) should fail with InvalidArgument, got {other:?}"),
        }
    }
    assert_eq!(rng.next_u64(), untouched);
}

#[test]
fn merchant_ids_are_sequential_and_unique() {
    let dataset = make_dataset(250, 7);
    for (i, p) in dataset.profiles().iter().enumerate() {
        assert_eq!(p.merchant_id, format!("M{:04}", i + 1));
    }
}

#[test]
fn scores_and_categories_are_consistent() {
    let dataset = make_dataset(500, 99);
    for p in dataset.profiles() {
        assert!(
            (0.0..=1.0).contains(&p.risk_score),
            "{} risk_score={} out of [0,1]",
            p.merchant_id,
            p.risk_score
        );
        assert_eq!(
            p.risk_category,
            RiskCategory::from_score(p.risk_score),
            "{} category disagrees with score {}",
            p.merchant_id,
            p.risk_score
        );
    }
}

#[test]
fn every_category_appears_in_a_large_sample() {
    let dataset = make_dataset(500, 99);
    for category in RiskCategory::ALL {
        assert!(
            dataset.profiles().iter().any(|p| p.risk_category == category),
            "no {category} merchants in 500 draws"
        );
    }
}

#[test]
fn high_risk_usage_respects_caps() {
    let dataset = make_dataset(500, 1337);
    let mut high = 0;
    for p in dataset.profiles() {
        let usage = p.feature_usage.as_array();
        assert!(usage.iter().all(|&u| u <= 100), "{} usage {usage:?}", p.merchant_id);
        if p.risk_category == RiskCategory::High {
            high += 1;
            let [one_click, subscription_api, fraud_tools, mobile_sdk] = usage;
            assert!(one_click <= 50, "{} one_click={one_click}", p.merchant_id);
            assert!(subscription_api <= 40, "{} subscription_api={subscription_api}", p.merchant_id);
            assert!(fraud_tools <= 30, "{} fraud_tools={fraud_tools}", p.merchant_id);
            assert!(mobile_sdk <= 20, "{} mobile_sdk={mobile_sdk}", p.merchant_id);
        }
    }
    assert!(high > 0, "expected some High merchants in 500 draws");
}

#[test]
fn risk_factor_counts_match_category_and_never_repeat() {
    let dataset = make_dataset(500, 2024);
    for p in dataset.profiles() {
        let count = p.risk_factors.len();
        let allowed = match p.risk_category {
            RiskCategory::High   => 2..=4,
            RiskCategory::Medium => 1..=2,
            RiskCategory::Low    => 0..=1,
        };
        assert!(
            allowed.contains(&count),
            "{} ({}) has {count} risk factors",
            p.merchant_id,
            p.risk_category
        );
        let mut unique = p.risk_factors.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), count, "{} has duplicate factors {:?}", p.merchant_id, p.risk_factors);
    }
}

#[test]
fn support_tickets_and_trend_follow_category() {
    let dataset = make_dataset(500, 5);
    for p in dataset.profiles() {
        let (tickets, trend) = match p.risk_category {
            RiskCategory::High   => (5..=14, -0.15..=-0.05),
            RiskCategory::Medium => (2..=6, -0.05..=0.05),
            RiskCategory::Low    => (0..=2, 0.05..=0.20),
        };
        assert!(tickets.contains(&p.support_tickets), "{} tickets={}", p.merchant_id, p.support_tickets);
        assert!(trend.contains(&p.volume_trend), "{} trend={}", p.merchant_id, p.volume_trend);
        assert!((5_000..=100_000).contains(&p.monthly_volume_avg));
        assert_eq!(
            p.latest_volume,
            (p.monthly_volume_avg as f64 * (1.0 + p.volume_trend / 2.0)) as u64
        );
    }
}

#[test]
fn tenure_and_onboarding_date_agree() {
    let dataset = make_dataset(200, 11);
    for p in dataset.profiles() {
        assert!((1..=36).contains(&p.tenure_months));
        let days = (as_of() - p.onboarding_date).num_days();
        assert_eq!(days, p.tenure_months as i64 * 30, "{}", p.merchant_id);
    }
}

#[test]
fn months_are_contiguous_and_end_at_generation_month() {
    let dataset = make_dataset(20, 3);
    let current = YearMonth::from_date(as_of());
    for p in dataset.profiles() {
        let rows = dataset.volumes_for(&p.merchant_id).unwrap();
        assert_eq!(rows.last().unwrap().month, current);
        for pair in rows.windows(2) {
            assert_eq!(
                pair[0].month.succ(),
                pair[1].month,
                "{}: {} is not followed by {}",
                p.merchant_id,
                pair[0].month,
                pair[1].month
            );
        }
    }
}

#[test]
fn high_risk_series_decline_in_recent_months() {
    let dataset = make_dataset(400, 77);
    let mut checked = 0;
    for p in dataset.profiles().iter().filter(|p| p.risk_category == RiskCategory::High) {
        let series = dataset.series_for(&p.merchant_id).unwrap();
        let older = mean(&series[..6]);
        let recent = mean(&series[8..]);
        assert!(
            recent < p.monthly_volume_avg as f64,
            "{} recent mean {recent:.0} should sit below baseline {}",
            p.merchant_id,
            p.monthly_volume_avg
        );
        assert!(
            recent <= older * 1.10,
            "{} recent mean {recent:.0} vs older mean {older:.0}",
            p.merchant_id
        );
        checked += 1;
    }
    assert!(checked > 0, "no High merchants to check");
}

#[test]
fn series_average_tracks_the_baseline() {
    let dataset = make_dataset(200, 8);
    for p in dataset.profiles() {
        let series = dataset.series_for(&p.merchant_id).unwrap();
        let ratio = mean(&series) / p.monthly_volume_avg as f64;
        assert!(
            (0.80..=1.20).contains(&ratio),
            "{} series mean / baseline = {ratio:.3}",
            p.merchant_id
        );
    }
}

/// A merchant whose adjusted score lands at 0.75 is High with
/// High-range tickets and capped usage.
#[test]
fn score_of_point_seven_five_is_high_risk() {
    let generator = DatasetGenerator::default();
    let score = generator.risk_score(0.70, 12, Segment::SmallBusiness);
    assert!((score - 0.75).abs() < 1e-12);

    for seed in 0..50 {
        let mut rng = GenRng::new(seed);
        let identity = MerchantIdentity {
            sequence: 1,
            industry: Industry::Saas,
            segment: Segment::SmallBusiness,
            account_manager: AccountManager::SamanthaLee,
            tenure_months: 12,
        };
        let p = generator.profile_for_score(identity, score, &mut rng, as_of()).unwrap();
        assert_eq!(p.risk_category, RiskCategory::High);
        assert!((5..=14).contains(&p.support_tickets));
        let [a, b, c, d] = p.feature_usage.as_array();
        assert!(a <= 50 && b <= 40 && c <= 30 && d <= 20, "seed {seed}: {:?}", p.feature_usage);
    }
}

#[test]
fn custom_config_shifts_thresholds() {
    let mut config = GeneratorConfig::default();
    config.thresholds.high = 0.0;
    config.thresholds.medium = 0.0;
    let generator = DatasetGenerator::new(config).unwrap();
    let mut rng = GenRng::new(4);
    let dataset = generator.generate(50, &mut rng, as_of()).unwrap();
    assert!(dataset.profiles().iter().all(|p| p.risk_category == RiskCategory::High));
}
