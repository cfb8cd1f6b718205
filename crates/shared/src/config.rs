//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::money::DEFAULT_BALANCE_TOLERANCE;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Ledger configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Schedule generation configuration.
    #[serde(default)]
    pub schedule: ScheduleConfig,
    /// Payment collection configuration.
    #[serde(default)]
    pub collection: CollectionConfig,
    /// Logging configuration.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Ledger configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Maximum accepted difference between debit and credit totals.
    #[serde(default = "default_balance_tolerance")]
    pub balance_tolerance: Decimal,
    /// Prefix of generated journal entry numbers.
    #[serde(default = "default_entry_number_prefix")]
    pub entry_number_prefix: String,
    /// Code of the account whose ledger is the cash book.
    #[serde(default = "default_cash_account_code")]
    pub cash_account_code: String,
}

fn default_balance_tolerance() -> Decimal {
    DEFAULT_BALANCE_TOLERANCE
}

fn default_entry_number_prefix() -> String {
    "JE".to_string()
}

fn default_cash_account_code() -> String {
    "1001".to_string()
}

fn default_receivable_account_code() -> String {
    "1200".to_string()
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            balance_tolerance: default_balance_tolerance(),
            entry_number_prefix: default_entry_number_prefix(),
            cash_account_code: default_cash_account_code(),
        }
    }
}

/// How rounding residue is handled when a schedule is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleRounding {
    /// Every obligation is rounded independently; the sum may drift by a few cents.
    #[default]
    None,
    /// The final obligation absorbs the rounding residue.
    ReconcileFinal,
}

/// Schedule generation configuration.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ScheduleConfig {
    /// Rounding policy.
    #[serde(default)]
    pub rounding: ScheduleRounding,
}

/// Payment collection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionConfig {
    /// Whether confirmed payments and processed refunds post journal entries.
    #[serde(default = "default_post_journal")]
    pub post_journal: bool,
    /// Account debited when a payment is received.
    #[serde(default = "default_cash_account_code")]
    pub cash_account_code: String,
    /// Account credited when a payment is received (customer advances).
    #[serde(default = "default_receivable_account_code")]
    pub receivable_account_code: String,
}

fn default_post_journal() -> bool {
    true
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            post_journal: default_post_journal(),
            cash_account_code: default_cash_account_code(),
            receivable_account_code: default_receivable_account_code(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("ESTATE").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// Parses configuration from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid configuration.
    pub fn from_toml(document: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(document, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.ledger.balance_tolerance, dec!(0.01));
        assert_eq!(config.ledger.entry_number_prefix, "JE");
        assert_eq!(config.ledger.cash_account_code, "1001");
        assert_eq!(config.schedule.rounding, ScheduleRounding::None);
        assert!(config.collection.post_journal);
        assert_eq!(config.collection.receivable_account_code, "1200");
        assert_eq!(config.telemetry.filter, "info");
        assert!(!config.telemetry.json);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.ledger.entry_number_prefix, "JE");
        assert_eq!(config.collection.cash_account_code, "1001");
    }

    #[test]
    fn test_from_toml_overrides() {
        let config = AppConfig::from_toml(
            r#"
            [ledger]
            entry_number_prefix = "JV"

            [schedule]
            rounding = "reconcile_final"

            [collection]
            post_journal = false

            [telemetry]
            json = true
            "#,
        )
        .unwrap();

        assert_eq!(config.ledger.entry_number_prefix, "JV");
        assert_eq!(config.ledger.balance_tolerance, dec!(0.01));
        assert_eq!(config.schedule.rounding, ScheduleRounding::ReconcileFinal);
        assert!(!config.collection.post_journal);
        assert!(config.telemetry.json);
    }
}
