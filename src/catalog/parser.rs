use std::io::Read;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::portfolio::{Card, Category, RateType, RewardRow};

/// Card record as the cleaner emits it: loosely-typed reward tuples under
/// either the published or the legacy column names.
#[derive(Debug, Deserialize)]
struct RawCard {
    name: String,
    issuer: String,
    #[serde(default, alias = "clean_annual_fee")]
    annual_fee: f64,
    #[serde(default, alias = "score")]
    min_score: u16,
    #[serde(default)]
    min_spend: f64,
    #[serde(default, alias = "clean_rewards")]
    rewards: Vec<Value>,
}

pub(crate) fn parse_cards<R: Read>(reader: R) -> Result<Vec<Card>, serde_json::Error> {
    let raw: Vec<RawCard> = serde_json::from_reader(reader)?;
    Ok(raw.into_iter().map(RawCard::into_card).collect())
}

impl RawCard {
    fn into_card(self) -> Card {
        let mut rewards = Vec::new();

        for row in &self.rewards {
            if row.is_null() {
                continue;
            }

            match reward_row(row) {
                Some(parsed) => rewards.push(parsed),
                None => warn!(card = %self.name, row = %row, "skipping malformed reward row"),
            }
        }

        Card {
            name: self.name,
            issuer: self.issuer,
            annual_fee: self.annual_fee,
            min_score: self.min_score,
            min_spend: self.min_spend,
            rewards,
        }
    }
}

/// Decode one `[value, rate_type, unit, category]` tuple; `None` on wrong
/// arity, wrong element types, or labels outside the closed vocabularies.
fn reward_row(row: &Value) -> Option<RewardRow> {
    let fields = row.as_array()?;
    if fields.len() != 4 {
        return None;
    }

    let value = fields[0].as_f64()?;
    let rate_type = RateType::parse(fields[1].as_str()?)?;
    let unit = fields[2].as_str()?.trim().to_string();
    let category = Category::parse(fields[3].as_str()?)?;

    Some(RewardRow {
        value,
        rate_type,
        unit,
        category,
    })
}
