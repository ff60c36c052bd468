use std::collections::BTreeMap;

use serde::Deserialize;

use super::domain::{Card, Category, RateType, RewardRow};

/// Key of the table consulted when neither a card nor an issuer override matches.
pub const DEFAULT_TABLE_KEY: &str = "default";

/// Raised when a conversion table is constructed without its reserved
/// `default` entry. This is a configuration defect, not a per-request error.
#[derive(Debug, thiserror::Error)]
pub enum ConversionTableError {
    #[error("conversion table is missing the reserved \"{DEFAULT_TABLE_KEY}\" entry")]
    MissingDefault,
}

/// Cents-per-unit valuations keyed by exact card name, then issuer, then the
/// reserved `default` table. Unit lookup is case-insensitive.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "BTreeMap<String, BTreeMap<String, f64>>")]
pub struct ConversionTable {
    tables: BTreeMap<String, BTreeMap<String, f64>>,
}

impl ConversionTable {
    pub fn new(
        tables: BTreeMap<String, BTreeMap<String, f64>>,
    ) -> Result<Self, ConversionTableError> {
        if !tables.contains_key(DEFAULT_TABLE_KEY) {
            return Err(ConversionTableError::MissingDefault);
        }

        let tables = tables
            .into_iter()
            .map(|(owner, units)| {
                let units = units
                    .into_iter()
                    .map(|(unit, cents)| (unit.trim().to_ascii_lowercase(), cents))
                    .collect();
                (owner, units)
            })
            .collect();

        Ok(Self { tables })
    }

    /// Published point valuations the engine ships with.
    pub fn builtin() -> Self {
        let mut tables = BTreeMap::new();
        tables.insert(
            DEFAULT_TABLE_KEY.to_string(),
            BTreeMap::from([("points".to_string(), 1.0), ("miles".to_string(), 1.0)]),
        );
        tables.insert(
            "American Express".to_string(),
            BTreeMap::from([("points".to_string(), 1.6)]),
        );
        tables.insert(
            "Capital One".to_string(),
            BTreeMap::from([("miles".to_string(), 1.6)]),
        );
        tables.insert(
            "Chase".to_string(),
            BTreeMap::from([("points".to_string(), 1.8)]),
        );
        tables.insert(
            "Citi".to_string(),
            BTreeMap::from([("points".to_string(), 1.6)]),
        );

        // Unit keys above are already lowercase and the default entry is present.
        Self { tables }
    }

    /// Cents of cash value per reward unit, resolved card name first, issuer
    /// second, the default table third, and 0.0 when nothing matches.
    pub fn cents_per_unit(&self, card_name: &str, issuer: &str, unit: &str) -> f64 {
        let unit = unit.trim().to_ascii_lowercase();

        for owner in [card_name, issuer, DEFAULT_TABLE_KEY] {
            if let Some(cents) = self.tables.get(owner).and_then(|units| units.get(&unit)) {
                return *cents;
            }
        }

        0.0
    }
}

impl Default for ConversionTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TryFrom<BTreeMap<String, BTreeMap<String, f64>>> for ConversionTable {
    type Error = ConversionTableError;

    fn try_from(tables: BTreeMap<String, BTreeMap<String, f64>>) -> Result<Self, Self::Error> {
        Self::new(tables)
    }
}

fn is_cash_unit(unit: &str) -> bool {
    let trimmed = unit.trim();
    trimmed.eq_ignore_ascii_case("cash back") || trimmed.eq_ignore_ascii_case("rewards")
}

/// Convert one reward row into dollars earned per dollar spent, or `None`
/// when the row carries no steady per-dollar rate.
pub(crate) fn dollar_rate(table: &ConversionTable, card: &Card, row: &RewardRow) -> Option<f64> {
    match row.rate_type {
        RateType::Percentage if is_cash_unit(&row.unit) => Some(row.value / 100.0),
        RateType::Multiplier | RateType::PerUnit => {
            let cents = table.cents_per_unit(&card.name, &card.issuer, &row.unit);
            Some(row.value * (cents / 100.0))
        }
        _ => None,
    }
}

/// Best dollars-per-dollar rate per category. Dominated rows are discarded; a
/// card with no valuable rows yields an empty map, never an error.
pub fn category_rates(table: &ConversionTable, card: &Card) -> BTreeMap<Category, f64> {
    let mut rates: BTreeMap<Category, f64> = BTreeMap::new();

    for row in &card.rewards {
        let Some(rate) = dollar_rate(table, card, row) else {
            continue;
        };

        let best = rates.entry(row.category).or_insert(rate);
        if rate > *best {
            *best = rate;
        }
    }

    rates
}
