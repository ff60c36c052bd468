//! Card portfolio selection: reward valuation, trigger evaluation, the
//! mixed-integer solve, and the per-category audit breakdown.

pub mod domain;
mod explain;
mod solver;
mod triggers;
mod valuation;

#[cfg(test)]
mod tests;

use std::collections::{BTreeMap, BTreeSet};

use tracing::info;

pub use domain::{
    Card, Category, CategoryLine, RateType, RewardRow, Solution, SpendProfile, Trigger,
};
pub use solver::{SolveError, SolverSettings};
pub use triggers::{earned_bonuses, trigger_schedule};
pub use valuation::{category_rates, ConversionTable, ConversionTableError, DEFAULT_TABLE_KEY};

/// Error raised by [`PortfolioEngine::optimize`]. `Solve` is the "no
/// solution" outcome; a zero-value all-unassigned [`Solution`] is not an
/// error.
#[derive(Debug, thiserror::Error)]
pub enum OptimizeError {
    #[error("spend for {category} must be a non-negative amount (got {amount})")]
    NegativeSpend { category: Category, amount: f64 },
    #[error("catalog contains more than one card named \"{0}\"")]
    DuplicateCard(String),
    #[error(transparent)]
    Solve(#[from] SolveError),
}

/// Per-card artifacts derived ahead of the solve: best dollar-per-dollar
/// rates, earned trigger bonuses against the fixed profile, and eligibility.
#[derive(Debug, Clone)]
pub(crate) struct CardValuation {
    pub(crate) name: String,
    pub(crate) annual_fee: f64,
    pub(crate) eligible: bool,
    rates: BTreeMap<Category, f64>,
    bonuses: BTreeMap<Category, f64>,
}

impl CardValuation {
    fn derive(
        table: &ConversionTable,
        card: &Card,
        profile: &SpendProfile,
        credit_score: u16,
    ) -> Self {
        let schedule = trigger_schedule(table, card);

        Self {
            name: card.name.clone(),
            annual_fee: card.annual_fee,
            eligible: credit_score >= card.min_score,
            rates: category_rates(table, card),
            bonuses: earned_bonuses(&schedule, profile),
        }
    }

    pub(crate) fn rate(&self, category: Category) -> f64 {
        self.rates.get(&category).copied().unwrap_or(0.0)
    }

    pub(crate) fn bonus(&self, category: Category) -> f64 {
        self.bonuses.get(&category).copied().unwrap_or(0.0)
    }
}

/// Stateless engine applying one conversion table and solver settings to a
/// catalog and spend profile. Inputs are borrowed and never mutated; every
/// call returns a freshly owned [`Solution`].
#[derive(Debug, Clone, Default)]
pub struct PortfolioEngine {
    conversion: ConversionTable,
    settings: SolverSettings,
}

impl PortfolioEngine {
    pub fn new(conversion: ConversionTable) -> Self {
        Self::with_settings(conversion, SolverSettings::default())
    }

    pub fn with_settings(conversion: ConversionTable, settings: SolverSettings) -> Self {
        Self {
            conversion,
            settings,
        }
    }

    pub fn conversion(&self) -> &ConversionTable {
        &self.conversion
    }

    /// Select which cards to hold and which held card serves each profile
    /// category, maximizing rewards minus annual fees.
    pub fn optimize(
        &self,
        cards: &[Card],
        profile: &SpendProfile,
        credit_score: u16,
    ) -> Result<Solution, OptimizeError> {
        for (category, amount) in profile.entries() {
            if !(amount >= 0.0) {
                return Err(OptimizeError::NegativeSpend { category, amount });
            }
        }

        let mut names = BTreeSet::new();
        for card in cards {
            if !names.insert(card.name.as_str()) {
                return Err(OptimizeError::DuplicateCard(card.name.clone()));
            }
        }

        let valuations: Vec<CardValuation> = cards
            .iter()
            .map(|card| CardValuation::derive(&self.conversion, card, profile, credit_score))
            .collect();

        let choice = solver::solve(&valuations, profile, &self.settings)?;
        let solution = explain::build_solution(&valuations, profile, choice);

        info!(
            net_value = solution.net_value,
            held = solution.held.len(),
            "portfolio optimization complete"
        );

        Ok(solution)
    }
}
