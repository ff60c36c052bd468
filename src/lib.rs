//! Net-value optimization for consumer credit card portfolios.
//!
//! Given a cleaned card catalog, a point-valuation table, and a fixed
//! per-category spend profile, the engine selects which cards to hold and
//! which held card serves each spending category, maximizing rewards minus
//! annual fees, and reconstructs a per-category audit breakdown of the
//! result.

pub mod catalog;
pub mod config;
pub mod portfolio;

pub use catalog::{CatalogImportError, CatalogImporter};
pub use config::{ConfigError, EngineConfig};
pub use portfolio::{
    Card, Category, CategoryLine, ConversionTable, OptimizeError, PortfolioEngine, RateType,
    RewardRow, SolveError, SolverSettings, Solution, SpendProfile, Trigger,
};
