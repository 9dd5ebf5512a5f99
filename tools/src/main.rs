//! churnboard-runner: headless dataset generator for the churn dashboard.
//!
//! Usage:
//!   churnboard-runner --seed 42 --merchants 100
//!   churnboard-runner --seed 42 --as-of 2024-06-15 --json > dataset.json
//!   churnboard-runner --seed 42 --merchant "Merchant 7"

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use churnboard_core::{
    config::GeneratorConfig,
    dashboard::{
        rank_by_risk, top_risk_factors, MerchantFilter, PaymentHealth, Recommendation,
        RiskSummary, VolumeInsights,
    },
    Dataset, DatasetGenerator, GenRng,
};
use std::env;

#[derive(serde::Serialize)]
struct RunSummary<'a> {
    seed:          u64,
    generated_on:  NaiveDate,
    summary:       RiskSummary,
    top_factors:   Vec<(String, usize)>,
    top_merchants: Vec<&'a str>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64)?;
    let merchants = parse_arg(&args, "--merchants", 100i64)?;
    let as_of = match flag_value(&args, "--as-of") {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("--as-of expects YYYY-MM-DD, got '{raw}'"))?,
        None => chrono::Utc::now().date_naive(),
    };
    let data_dir = flag_value(&args, "--data-dir").unwrap_or("./data");
    let json_mode = args.iter().any(|a| a == "--json");
    let summary_json = args.iter().any(|a| a == "--summary-json");
    let merchant = flag_value(&args, "--merchant");

    let config = GeneratorConfig::load_or_default(data_dir)?;
    let generator = DatasetGenerator::new(config)?;
    let mut rng = GenRng::new(seed).with_name("runner");
    let dataset = generator.generate(merchants, &mut rng, as_of)?;

    if json_mode {
        println!("{}", dataset.to_json()?);
    } else if let Some(name) = merchant {
        print_merchant(&dataset, name)?;
    } else if summary_json {
        let summary = build_run_summary(&dataset);
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Churnboard dataset runner");
        println!("  seed:      {seed}");
        println!("  merchants: {merchants}");
        println!("  as of:     {as_of}");
        println!("  data_dir:  {data_dir}");
        println!();
        print_summary(&dataset);
    }

    Ok(())
}

fn build_run_summary(dataset: &Dataset) -> RunSummary<'_> {
    let profiles = MerchantFilter::all().apply(dataset);
    RunSummary {
        seed: dataset.seed,
        generated_on: dataset.generated_on,
        summary: RiskSummary::from_profiles(&profiles),
        top_factors: top_risk_factors(&profiles, 5)
            .into_iter()
            .map(|(factor, count)| (factor.label().to_string(), count))
            .collect(),
        top_merchants: rank_by_risk(&profiles)
            .into_iter()
            .take(10)
            .map(|p| p.merchant_id.as_str())
            .collect(),
    }
}

fn print_summary(dataset: &Dataset) {
    let profiles = MerchantFilter::all().apply(dataset);
    let summary = RiskSummary::from_profiles(&profiles);

    println!("=== RISK SUMMARY ===");
    println!("  merchants:      {}", summary.merchant_count);
    println!("  high risk:      {}", summary.high_risk_count);
    println!("  medium risk:    {}", summary.medium_risk_count);
    println!("  low risk:       {}", summary.low_risk_count);
    println!("  at-risk volume: ${}", summary.at_risk_volume);
    match summary.avg_risk_score {
        Some(avg) => println!("  avg risk score: {avg:.2}"),
        None => println!("  avg risk score: n/a"),
    }

    println!();
    println!("=== TOP RISK FACTORS ===");
    let factors = top_risk_factors(&profiles, 5);
    if factors.is_empty() {
        println!("  (No risk factors present)");
    }
    for (factor, count) in factors {
        println!("  {count:>4}  {factor}");
    }

    println!();
    println!("=== HIGHEST RISK MERCHANTS ===");
    for p in rank_by_risk(&profiles).into_iter().take(10) {
        println!(
            "  {} | {:<14} | {:.2} {:<6} | {:<14} | {} | ${}",
            p.merchant_id,
            p.merchant_name,
            p.risk_score,
            p.risk_category,
            p.account_manager,
            Recommendation::for_category(p.risk_category).headline(),
            p.monthly_volume_avg
        );
    }
}

/// Deep-dive for one merchant, looked up by display name or id.
fn print_merchant(dataset: &Dataset, name: &str) -> Result<()> {
    let Some(profile) = dataset.profile_by_name(name).or_else(|| dataset.profile(name)) else {
        bail!("no merchant named '{name}' in this dataset");
    };
    let rows = dataset
        .volumes_for(&profile.merchant_id)
        .with_context(|| format!("no volume series for {}", profile.merchant_id))?;

    println!("=== {} ({}) ===", profile.merchant_name, profile.merchant_id);
    println!("  industry:       {}", profile.industry);
    println!("  segment:        {}", profile.segment);
    println!("  manager:        {}", profile.account_manager);
    println!("  tenure:         {} months (since {})", profile.tenure_months, profile.onboarding_date);
    println!("  risk:           {:.2} {}", profile.risk_score, profile.risk_category);
    println!("  support:        {} tickets", profile.support_tickets);

    if let Some(insights) = VolumeInsights::from_rows(rows) {
        let pct = |t: Option<f64>| t.map_or("n/a".to_string(), |t| format!("{:+.1}%", t * 100.0));
        println!("  recent trend:   {}", pct(insights.recent_trend));
        println!("  overall trend:  {}", pct(insights.overall_trend));
        println!("  peak volume:    ${} in {}", insights.peak_volume, insights.peak_month);
    }

    let health = PaymentHealth::for_category(profile.risk_category);
    println!("  success rate:   {:.1}%", health.success_rate * 100.0);
    println!("  auth rate:      {:.1}%", health.authorization_rate * 100.0);
    println!("  fraud rate:     {:.1}%", health.fraud_rate * 100.0);

    println!();
    println!("{}", Recommendation::for_category(profile.risk_category).headline());
    for factor in &profile.risk_factors {
        println!("  - {factor}");
    }
    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> Result<T> {
    match flag_value(args, flag) {
        Some(raw) => match raw.parse() {
            Ok(value) => Ok(value),
            Err(_) => bail!("{flag} expects a number, got '{raw}'"),
        },
        None => Ok(default),
    }
}
