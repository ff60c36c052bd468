use std::collections::{BTreeMap, BTreeSet};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use good_lp::{
    constraint, default_solver, variable, Expression, ProblemVariables, Solution as LpSolution,
    SolverModel, Variable,
};
use tracing::debug;

use super::domain::{Category, SpendProfile};
use super::CardValuation;

/// Controls for the mixed-integer solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverSettings {
    /// Deadline for one solve; `None` runs unbounded on the calling thread.
    pub timeout: Option<Duration>,
}

/// The solve ended without a provably optimal portfolio. Distinct from the
/// valid all-unassigned zero-value solution.
#[derive(Debug, thiserror::Error)]
pub enum SolveError {
    #[error("solver finished without a provably optimal portfolio: {0}")]
    Unsolved(String),
    #[error("solve abandoned after {0:?} without a proven optimum")]
    Timeout(Duration),
}

/// Raw portfolio decisions extracted from the solved model.
#[derive(Debug, Clone, Default)]
pub(crate) struct PortfolioChoice {
    pub(crate) held: BTreeSet<String>,
    pub(crate) assignment: BTreeMap<Category, Option<String>>,
}

impl PortfolioChoice {
    fn unassigned(profile: &SpendProfile) -> Self {
        Self {
            held: BTreeSet::new(),
            assignment: profile.categories().map(|category| (category, None)).collect(),
        }
    }
}

pub(crate) fn solve(
    cards: &[CardValuation],
    profile: &SpendProfile,
    settings: &SolverSettings,
) -> Result<PortfolioChoice, SolveError> {
    if cards.is_empty() || profile.is_empty() {
        return Ok(PortfolioChoice::unassigned(profile));
    }

    match settings.timeout {
        None => formulate_and_solve(cards, profile),
        Some(limit) => {
            let cards = cards.to_vec();
            let profile = profile.clone();
            let (sender, receiver) = mpsc::channel();

            thread::spawn(move || {
                let _ = sender.send(formulate_and_solve(&cards, &profile));
            });

            match receiver.recv_timeout(limit) {
                Ok(result) => result,
                Err(_) => Err(SolveError::Timeout(limit)),
            }
        }
    }
}

fn formulate_and_solve(
    cards: &[CardValuation],
    profile: &SpendProfile,
) -> Result<PortfolioChoice, SolveError> {
    let categories: Vec<Category> = profile.categories().collect();

    let mut vars = ProblemVariables::new();
    let hold: Vec<Variable> = cards.iter().map(|_| vars.add(variable().binary())).collect();
    let uses: Vec<Vec<Variable>> = cards
        .iter()
        .map(|_| {
            categories
                .iter()
                .map(|_| vars.add(variable().binary()))
                .collect()
        })
        .collect();

    // Objective: category rewards plus pre-evaluated trigger bonuses, minus
    // annual fees of held cards.
    let mut terms: Vec<Expression> = Vec::new();
    for (ci, card) in cards.iter().enumerate() {
        for (ki, category) in categories.iter().enumerate() {
            let gain = profile.amount(*category) * card.rate(*category) + card.bonus(*category);
            terms.push(gain * uses[ci][ki]);
        }
        terms.push(-card.annual_fee * hold[ci]);
    }
    let objective: Expression = terms.into_iter().sum();

    debug!(
        cards = cards.len(),
        categories = categories.len(),
        "formulating portfolio model"
    );

    let mut model = vars.maximise(objective).using(default_solver);

    // At most one card serves each category.
    for ki in 0..categories.len() {
        let serving: Expression = cards
            .iter()
            .enumerate()
            .map(|(ci, _)| Expression::from(uses[ci][ki]))
            .sum();
        model = model.with(constraint!(serving <= 1.0));
    }

    for (ci, card) in cards.iter().enumerate() {
        // A card can only serve categories while held.
        for ki in 0..categories.len() {
            model = model.with(constraint!(uses[ci][ki] <= hold[ci]));
        }

        // Holding an ineligible card is forbidden outright.
        let eligible = if card.eligible { 1.0 } else { 0.0 };
        model = model.with(constraint!(hold[ci] <= eligible));

        // A held card must serve at least one category, so a zero-fee card is
        // never reported held without doing anything.
        let served: Expression = (0..categories.len())
            .map(|ki| Expression::from(uses[ci][ki]))
            .sum();
        model = model.with(constraint!(served >= hold[ci]));
    }

    let solution = model
        .solve()
        .map_err(|err| SolveError::Unsolved(err.to_string()))?;

    let held = cards
        .iter()
        .enumerate()
        .filter(|(ci, _)| solution.value(hold[*ci]) > 0.5)
        .map(|(_, card)| card.name.clone())
        .collect();

    let assignment = categories
        .iter()
        .enumerate()
        .map(|(ki, category)| {
            let serving = cards
                .iter()
                .enumerate()
                .find(|(ci, _)| solution.value(uses[*ci][ki]) > 0.5)
                .map(|(_, card)| card.name.clone());
            (*category, serving)
        })
        .collect();

    Ok(PortfolioChoice { held, assignment })
}
