use std::collections::HashMap;
use std::io::Read;

use serde::Deserialize;
use tracing::warn;

use crate::portfolio::{Card, Category, RateType, RewardRow};

/// One reward per record; the card columns repeat on every row of a card.
#[derive(Debug, Deserialize)]
struct RewardTableRow {
    #[serde(rename = "Card")]
    card: String,
    #[serde(rename = "Issuer")]
    issuer: String,
    #[serde(rename = "Annual Fee")]
    annual_fee: f64,
    #[serde(rename = "Min Score", default)]
    min_score: u16,
    #[serde(rename = "Min Spend", default)]
    min_spend: f64,
    #[serde(rename = "Value")]
    value: f64,
    #[serde(rename = "Rate Type")]
    rate_type: String,
    #[serde(rename = "Unit")]
    unit: String,
    #[serde(rename = "Category")]
    category: String,
}

pub(crate) fn parse_table<R: Read>(reader: R) -> Result<Vec<Card>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut cards: Vec<Card> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in csv_reader.deserialize::<RewardTableRow>() {
        let row = record?;

        let slot = match index.get(row.card.as_str()) {
            Some(&slot) => slot,
            None => {
                index.insert(row.card.clone(), cards.len());
                cards.push(Card {
                    name: row.card.clone(),
                    issuer: row.issuer.clone(),
                    annual_fee: row.annual_fee,
                    min_score: row.min_score,
                    min_spend: row.min_spend,
                    rewards: Vec::new(),
                });
                cards.len() - 1
            }
        };

        match (RateType::parse(&row.rate_type), Category::parse(&row.category)) {
            (Some(rate_type), Some(category)) => cards[slot].rewards.push(RewardRow {
                value: row.value,
                rate_type,
                unit: row.unit,
                category,
            }),
            _ => warn!(
                card = %row.card,
                rate_type = %row.rate_type,
                category = %row.category,
                "skipping reward row with labels outside the closed vocabulary"
            ),
        }
    }

    Ok(cards)
}
