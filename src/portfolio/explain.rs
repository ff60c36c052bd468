use std::collections::{BTreeMap, BTreeSet};

use super::domain::{CategoryLine, SpendProfile, Solution};
use super::solver::PortfolioChoice;
use super::CardValuation;

/// Reconstruct the per-category audit breakdown from the solved choice.
///
/// Each held card's annual fee lands on the first category (in stable
/// `Category` order) that the card serves, so summing `net_contribution`
/// across the breakdown reproduces the objective value exactly.
pub(crate) fn build_solution(
    cards: &[CardValuation],
    profile: &SpendProfile,
    choice: PortfolioChoice,
) -> Solution {
    let by_name: BTreeMap<&str, &CardValuation> = cards
        .iter()
        .map(|card| (card.name.as_str(), card))
        .collect();

    let mut breakdown = BTreeMap::new();
    let mut fee_charged: BTreeSet<&str> = BTreeSet::new();
    let mut net_value = 0.0;

    for (category, spend) in profile.entries() {
        let assigned = choice
            .assignment
            .get(&category)
            .and_then(|name| name.as_deref())
            .and_then(|name| by_name.get(name).copied());

        let Some(card) = assigned else {
            breakdown.insert(category, CategoryLine::unassigned(spend));
            continue;
        };

        let rate = card.rate(category);
        let trigger_bonus = card.bonus(category);
        let raw_reward = spend * rate;
        let total_reward = raw_reward + trigger_bonus;

        let first_use = choice.held.contains(&card.name) && fee_charged.insert(card.name.as_str());
        let fee_attributed = if first_use { card.annual_fee } else { 0.0 };

        let net_contribution = total_reward - fee_attributed;
        net_value += net_contribution;

        breakdown.insert(
            category,
            CategoryLine {
                card: Some(card.name.clone()),
                spend,
                rate,
                trigger_bonus,
                raw_reward,
                total_reward,
                fee_attributed,
                net_contribution,
                formula: format!(
                    "{spend:.2} * {rate:.4} + {trigger_bonus:.2} - {fee_attributed:.2}"
                ),
            },
        );
    }

    Solution {
        held: choice.held,
        assignment: choice.assignment,
        net_value,
        breakdown,
    }
}
