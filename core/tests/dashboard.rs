//! Dashboard projections over a generated dataset.

use chrono::NaiveDate;
use churnboard_core::{
    dashboard::{
        rank_by_risk, risk_factor_counts, top_risk_factors, MerchantFilter, RiskSummary,
        TimePeriod, TrendDirection, VolumeTrendSummary,
    },
    generate,
    model::{AccountManager, Industry, RiskCategory, Segment},
    Dataset, GenRng,
};

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

fn dataset() -> Dataset {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut rng = GenRng::new(42);
    generate(100, &mut rng, as_of()).unwrap()
}

#[test]
fn empty_filter_admits_everything() {
    let dataset = dataset();
    assert_eq!(MerchantFilter::all().apply(&dataset).len(), 100);
}

#[test]
fn filter_dimensions_combine_with_and() {
    let dataset = dataset();
    let filter = MerchantFilter::all()
        .with_segments([Segment::Enterprise, Segment::MidMarket])
        .with_risk_categories([RiskCategory::High, RiskCategory::Medium]);
    let selected = filter.apply(&dataset);

    for p in &selected {
        assert_ne!(p.segment, Segment::SmallBusiness);
        assert_ne!(p.risk_category, RiskCategory::Low);
    }
    let expected = dataset
        .profiles()
        .iter()
        .filter(|p| p.segment != Segment::SmallBusiness && p.risk_category != RiskCategory::Low)
        .count();
    assert_eq!(selected.len(), expected);
}

#[test]
fn filter_on_industry_and_manager() {
    let dataset = dataset();
    let filter = MerchantFilter::all()
        .with_industries([Industry::Finance])
        .with_account_managers([AccountManager::AlexThompson]);
    for p in filter.apply(&dataset) {
        assert_eq!(p.industry, Industry::Finance);
        assert_eq!(p.account_manager, AccountManager::AlexThompson);
    }
}

#[test]
fn summary_partitions_the_filtered_set() {
    let dataset = dataset();
    let profiles = MerchantFilter::all().apply(&dataset);
    let summary = RiskSummary::from_profiles(&profiles);

    assert_eq!(
        summary.high_risk_count + summary.medium_risk_count + summary.low_risk_count,
        summary.merchant_count
    );
    let at_risk: u64 = profiles
        .iter()
        .filter(|p| p.risk_category != RiskCategory::Low)
        .map(|p| p.monthly_volume_avg)
        .sum();
    assert_eq!(summary.at_risk_volume, at_risk);
    let avg = summary.avg_risk_score.unwrap();
    assert!((0.0..=1.0).contains(&avg));
}

#[test]
fn factor_tally_matches_profile_contents() {
    let dataset = dataset();
    let profiles = MerchantFilter::all().apply(&dataset);
    let total: usize = profiles.iter().map(|p| p.risk_factors.len()).sum();
    let tallied: usize = risk_factor_counts(&profiles).iter().map(|(_, c)| c).sum();
    assert_eq!(total, tallied);

    let top = top_risk_factors(&profiles, 5);
    assert!(top.len() <= 5);
    assert!(top.windows(2).all(|w| w[0].1 >= w[1].1));
}

#[test]
fn ranking_is_descending_by_score() {
    let dataset = dataset();
    let profiles = MerchantFilter::all().apply(&dataset);
    let ranked = rank_by_risk(&profiles);
    assert_eq!(ranked.len(), profiles.len());
    assert!(ranked.windows(2).all(|w| w[0].risk_score >= w[1].risk_score));
}

#[test]
fn time_windows_are_suffixes_of_the_series() {
    let dataset = dataset();
    let rows = dataset.volumes_for("M0001").unwrap();
    let last3 = TimePeriod::Last3Months.window(rows, as_of());
    assert_eq!(last3, &rows[9..]);
    // June as-of: January through June.
    assert_eq!(TimePeriod::YearToDate.window(rows, as_of()).len(), 6);
}

#[test]
fn high_risk_recent_months_sit_below_baseline() {
    let dataset = dataset();
    for p in dataset.profiles().iter().filter(|p| p.risk_category == RiskCategory::High) {
        let series = dataset.series_for(&p.merchant_id).unwrap();
        let trend = VolumeTrendSummary::from_series(&series).unwrap();
        assert!(
            trend.recent_mean < p.monthly_volume_avg as f64,
            "{} recent mean {:.0} vs baseline {}",
            p.merchant_id,
            trend.recent_mean,
            p.monthly_volume_avg
        );
    }
}

#[test]
fn growing_series_is_classified() {
    let growing = [100, 100, 100, 100, 100, 100, 105, 110, 115, 120, 125, 130];
    let summary = VolumeTrendSummary::from_series(&growing).unwrap();
    assert_eq!(summary.direction, TrendDirection::Growing);
    assert!(summary.change > 0.0);
}
