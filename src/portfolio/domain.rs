use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Closed set of spending buckets shared by the card catalog and spend profiles.
///
/// The derived `Ord` follows declaration order and is the stable category
/// ordering used for fee attribution and breakdown iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Travel")]
    Travel,
    #[serde(rename = "Groceries & Dining")]
    GroceriesDining,
    #[serde(rename = "Gas & Utilities")]
    GasUtilities,
    #[serde(rename = "Retail & Entertainment")]
    RetailEntertainment,
    #[serde(rename = "All Purchases")]
    AllPurchases,
}

impl Category {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Travel,
            Self::GroceriesDining,
            Self::GasUtilities,
            Self::RetailEntertainment,
            Self::AllPurchases,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Travel => "Travel",
            Self::GroceriesDining => "Groceries & Dining",
            Self::GasUtilities => "Gas & Utilities",
            Self::RetailEntertainment => "Retail & Entertainment",
            Self::AllPurchases => "All Purchases",
        }
    }

    /// Match a catalog string against the closed vocabulary.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ordered()
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(trimmed))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a reward row's `value` is denominated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateType {
    Multiplier,
    Percentage,
    #[serde(rename = "Per Unit")]
    PerUnit,
    #[serde(rename = "Flat Amount")]
    FlatAmount,
    Trigger,
}

impl RateType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Multiplier => "Multiplier",
            Self::Percentage => "Percentage",
            Self::PerUnit => "Per Unit",
            Self::FlatAmount => "Flat Amount",
            Self::Trigger => "Trigger",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        [
            Self::Multiplier,
            Self::Percentage,
            Self::PerUnit,
            Self::FlatAmount,
            Self::Trigger,
        ]
        .into_iter()
        .find(|rate_type| rate_type.label().eq_ignore_ascii_case(trimmed))
    }
}

/// One cleaned reward definition as delivered by the upstream catalog cleaner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardRow {
    pub value: f64,
    pub rate_type: RateType,
    pub unit: String,
    pub category: Category,
}

/// A card record from the cleaned catalog. `name` is the unique key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    pub issuer: String,
    pub annual_fee: f64,
    /// Minimum credit score required to hold the card.
    #[serde(default)]
    pub min_score: u16,
    /// Spend threshold shared by this card's trigger rows.
    #[serde(default)]
    pub min_spend: f64,
    pub rewards: Vec<RewardRow>,
}

/// A spend-activated bonus attached to one (card, category) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    pub min_spend: f64,
    pub bonus: f64,
}

/// Fixed per-category spending for the evaluation period (one year by
/// convention; the caller annualizes). Categories left unset spend zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpendProfile {
    amounts: BTreeMap<Category, f64>,
}

impl SpendProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, category: Category, amount: f64) -> Self {
        self.set(category, amount);
        self
    }

    pub fn set(&mut self, category: Category, amount: f64) {
        self.amounts.insert(category, amount);
    }

    pub fn amount(&self, category: Category) -> f64 {
        self.amounts.get(&category).copied().unwrap_or(0.0)
    }

    /// Categories carrying an explicit entry, in stable `Category` order.
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.amounts.keys().copied()
    }

    pub fn entries(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        self.amounts.iter().map(|(category, amount)| (*category, *amount))
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }
}

/// Immutable result of one optimize call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// Names of the cards kept in the portfolio.
    pub held: BTreeSet<String>,
    /// Which held card serves each profile category, if any.
    pub assignment: BTreeMap<Category, Option<String>>,
    /// Total reward earned across all categories minus fees of all held cards.
    pub net_value: f64,
    pub breakdown: BTreeMap<Category, CategoryLine>,
}

/// Per-category audit line. Summing `net_contribution` across the breakdown
/// reproduces the solution's `net_value` exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryLine {
    pub card: Option<String>,
    pub spend: f64,
    pub rate: f64,
    pub trigger_bonus: f64,
    pub raw_reward: f64,
    pub total_reward: f64,
    /// The assigned card's annual fee, charged on its first category only.
    pub fee_attributed: f64,
    pub net_contribution: f64,
    /// Human-auditable arithmetic behind `net_contribution`.
    pub formula: String,
}

impl CategoryLine {
    pub(crate) fn unassigned(spend: f64) -> Self {
        Self {
            card: None,
            spend,
            rate: 0.0,
            trigger_bonus: 0.0,
            raw_reward: 0.0,
            total_reward: 0.0,
            fee_attributed: 0.0,
            net_contribution: 0.0,
            formula: "unassigned".to_string(),
        }
    }
}
