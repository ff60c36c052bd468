use crate::portfolio::{
    Card, Category, ConversionTable, PortfolioEngine, RateType, RewardRow, SpendProfile,
};

pub(super) fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

pub(super) fn engine() -> PortfolioEngine {
    PortfolioEngine::new(ConversionTable::builtin())
}

pub(super) fn card(name: &str, issuer: &str, annual_fee: f64, rewards: Vec<RewardRow>) -> Card {
    Card {
        name: name.to_string(),
        issuer: issuer.to_string(),
        annual_fee,
        min_score: 0,
        min_spend: 0.0,
        rewards,
    }
}

pub(super) fn percentage(value: f64, category: Category) -> RewardRow {
    RewardRow {
        value,
        rate_type: RateType::Percentage,
        unit: "cash back".to_string(),
        category,
    }
}

pub(super) fn multiplier(value: f64, unit: &str, category: Category) -> RewardRow {
    RewardRow {
        value,
        rate_type: RateType::Multiplier,
        unit: unit.to_string(),
        category,
    }
}

pub(super) fn trigger(value: f64, unit: &str, category: Category) -> RewardRow {
    RewardRow {
        value,
        rate_type: RateType::Trigger,
        unit: unit.to_string(),
        category,
    }
}

pub(super) fn travel_profile(amount: f64) -> SpendProfile {
    SpendProfile::new().with(Category::Travel, amount)
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}
