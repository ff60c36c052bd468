use std::collections::BTreeMap;

use super::domain::{Card, Category, RateType, SpendProfile, Trigger};
use super::valuation::ConversionTable;

/// Triggers per category derived from a card's `Trigger` rows. The bonus is
/// the row value cashed out through the conversion table; the threshold is
/// the card-level minimum spend.
pub fn trigger_schedule(table: &ConversionTable, card: &Card) -> BTreeMap<Category, Vec<Trigger>> {
    let mut schedule: BTreeMap<Category, Vec<Trigger>> = BTreeMap::new();

    for row in &card.rewards {
        if row.rate_type != RateType::Trigger {
            continue;
        }

        let cents = table.cents_per_unit(&card.name, &card.issuer, &row.unit);
        schedule.entry(row.category).or_default().push(Trigger {
            min_spend: card.min_spend,
            bonus: row.value * (cents / 100.0),
        });
    }

    schedule
}

/// Total bonus earned per profile category against fixed spend.
///
/// Evaluated before the solve so the objective stays linear; every profile
/// category gets an entry, zero when nothing fires. Triggers on the same
/// category are independent and additive when each individually qualifies.
pub fn earned_bonuses(
    schedule: &BTreeMap<Category, Vec<Trigger>>,
    profile: &SpendProfile,
) -> BTreeMap<Category, f64> {
    let mut bonuses = BTreeMap::new();

    for (category, spend) in profile.entries() {
        let earned = schedule
            .get(&category)
            .map(|triggers| {
                triggers
                    .iter()
                    .filter(|trigger| spend >= trigger.min_spend)
                    .map(|trigger| trigger.bonus)
                    .sum()
            })
            .unwrap_or(0.0);

        bonuses.insert(category, earned);
    }

    bonuses
}
