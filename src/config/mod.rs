use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::time::Duration;

use crate::portfolio::{ConversionTable, ConversionTableError, PortfolioEngine, SolverSettings};

/// Optional solver deadline in milliseconds.
pub const SOLVE_TIMEOUT_VAR: &str = "CARDWISE_SOLVE_TIMEOUT_MS";
/// Optional path to a JSON conversion table; the builtin table applies when unset.
pub const CONVERSION_TABLE_VAR: &str = "CARDWISE_CONVERSION_TABLE";

/// Engine configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub conversion: ConversionTable,
    pub solver: SolverSettings,
}

impl EngineConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let solver = match env::var(SOLVE_TIMEOUT_VAR) {
            Ok(raw) => {
                let millis = raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidTimeout)?;
                SolverSettings {
                    timeout: Some(Duration::from_millis(millis)),
                }
            }
            Err(_) => SolverSettings::default(),
        };

        let conversion = match env::var(CONVERSION_TABLE_VAR) {
            Ok(path) => load_table(path.trim())?,
            Err(_) => ConversionTable::builtin(),
        };

        Ok(Self { conversion, solver })
    }

    pub fn into_engine(self) -> PortfolioEngine {
        PortfolioEngine::with_settings(self.conversion, self.solver)
    }
}

fn load_table(path: &str) -> Result<ConversionTable, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::UnreadableTable {
        path: path.to_string(),
        source,
    })?;

    let tables: BTreeMap<String, BTreeMap<String, f64>> =
        serde_json::from_str(&raw).map_err(|source| ConfigError::InvalidTable {
            path: path.to_string(),
            source,
        })?;

    Ok(ConversionTable::new(tables)?)
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidTimeout,
    UnreadableTable {
        path: String,
        source: std::io::Error,
    },
    InvalidTable {
        path: String,
        source: serde_json::Error,
    },
    Conversion(ConversionTableError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTimeout => {
                write!(f, "{SOLVE_TIMEOUT_VAR} must be a whole number of milliseconds")
            }
            ConfigError::UnreadableTable { path, .. } => {
                write!(f, "could not read conversion table at {path}")
            }
            ConfigError::InvalidTable { path, .. } => {
                write!(f, "conversion table at {path} is not a nested unit-to-cents map")
            }
            ConfigError::Conversion(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidTimeout => None,
            ConfigError::UnreadableTable { source, .. } => Some(source),
            ConfigError::InvalidTable { source, .. } => Some(source),
            ConfigError::Conversion(err) => Some(err),
        }
    }
}

impl From<ConversionTableError> for ConfigError {
    fn from(err: ConversionTableError) -> Self {
        Self::Conversion(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var(SOLVE_TIMEOUT_VAR);
        env::remove_var(CONVERSION_TABLE_VAR);
    }

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("cardwise-{}-{name}", std::process::id()));
        fs::write(&path, contents).expect("scratch table written");
        path
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();

        let config = EngineConfig::load().expect("config loads with defaults");

        assert_eq!(config.solver.timeout, None);
        assert_eq!(config.conversion, ConversionTable::builtin());
    }

    #[test]
    fn load_parses_solver_timeout() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var(SOLVE_TIMEOUT_VAR, "2500");

        let config = EngineConfig::load().expect("config loads");
        reset_env();

        assert_eq!(config.solver.timeout, Some(Duration::from_millis(2500)));
    }

    #[test]
    fn load_rejects_non_numeric_timeout() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var(SOLVE_TIMEOUT_VAR, "soon");

        let error = EngineConfig::load().expect_err("expected invalid timeout");
        reset_env();

        match error {
            ConfigError::InvalidTimeout => {}
            other => panic!("expected invalid timeout, got {other}"),
        }
    }

    #[test]
    fn load_reads_conversion_table_from_file() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let path = scratch_file(
            "table.json",
            r#"{"default": {"points": 1.2}, "Chase": {"points": 2.0}}"#,
        );
        env::set_var(CONVERSION_TABLE_VAR, &path);

        let config = EngineConfig::load().expect("config loads");
        reset_env();
        fs::remove_file(&path).ok();

        assert_eq!(config.conversion.cents_per_unit("", "Chase", "points"), 2.0);
        assert_eq!(config.conversion.cents_per_unit("", "Citi", "points"), 1.2);
    }

    #[test]
    fn load_fails_loudly_when_default_table_is_absent() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let path = scratch_file("no-default.json", r#"{"Chase": {"points": 2.0}}"#);
        env::set_var(CONVERSION_TABLE_VAR, &path);

        let error = EngineConfig::load().expect_err("expected missing default");
        reset_env();
        fs::remove_file(&path).ok();

        match error {
            ConfigError::Conversion(ConversionTableError::MissingDefault) => {}
            other => panic!("expected missing default table, got {other}"),
        }
    }

    #[test]
    fn load_fails_when_table_path_is_unreadable() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var(CONVERSION_TABLE_VAR, "./does-not-exist.json");

        let error = EngineConfig::load().expect_err("expected unreadable table");
        reset_env();

        match error {
            ConfigError::UnreadableTable { .. } => {}
            other => panic!("expected unreadable table, got {other}"),
        }
    }
}
