//! Configuration management for arthik
//!
//! This module handles loading, validation, and management of
//! arthik configuration from YAML files.

pub mod error;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::ConfigError;

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8081
}

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Root of every data file
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
    /// Directory holding the transaction partitions (relative to data path)
    #[serde(default = "default_ledger_dir")]
    pub ledger_dir: String,
    #[serde(default = "default_accounts_file")]
    pub accounts_file: String,
    #[serde(default = "default_recurrence_file")]
    pub recurrence_file: String,
    #[serde(default = "default_reports_file")]
    pub reports_file: String,
    /// Append-only audit trail
    #[serde(default = "default_audit_file")]
    pub audit_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            ledger_dir: default_ledger_dir(),
            accounts_file: default_accounts_file(),
            recurrence_file: default_recurrence_file(),
            reports_file: default_reports_file(),
            audit_file: default_audit_file(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("./data")
}

fn default_ledger_dir() -> String {
    "ledger".to_string()
}

fn default_accounts_file() -> String {
    "accounts.csv".to_string()
}

fn default_recurrence_file() -> String {
    "recurrence.csv".to_string()
}

fn default_reports_file() -> String {
    "reports.csv".to_string()
}

fn default_audit_file() -> String {
    "audit.log".to_string()
}

/// How transactions are split across files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartitionScheme {
    /// One file per calendar month (`transactions_YYYYMM.csv`)
    Month,
    /// One file per calendar year (`transactions_YYYY.csv`)
    Year,
}

impl Default for PartitionScheme {
    fn default() -> Self {
        PartitionScheme::Month
    }
}

impl std::str::FromStr for PartitionScheme {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "month" | "monthly" => Ok(PartitionScheme::Month),
            "year" | "yearly" => Ok(PartitionScheme::Year),
            _ => Err(format!("Invalid partition scheme: {}", s)),
        }
    }
}

impl std::fmt::Display for PartitionScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartitionScheme::Month => write!(f, "month"),
            PartitionScheme::Year => write!(f, "year"),
        }
    }
}

/// Granularity of the net-worth history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportGranularity {
    /// One record per distinct transaction date
    Daily,
    /// One record per month, keyed by the last day of the month
    Monthly,
}

impl Default for ReportGranularity {
    fn default() -> Self {
        ReportGranularity::Monthly
    }
}

impl std::str::FromStr for ReportGranularity {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" | "day" => Ok(ReportGranularity::Daily),
            "monthly" | "month" => Ok(ReportGranularity::Monthly),
            _ => Err(format!("Invalid report granularity: {}", s)),
        }
    }
}

impl std::fmt::Display for ReportGranularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportGranularity::Daily => write!(f, "daily"),
            ReportGranularity::Monthly => write!(f, "monthly"),
        }
    }
}

/// An account created on first start when the account file is empty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultAccount {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub include_in_net_worth: bool,
}

impl DefaultAccount {
    fn new(name: &str, category: &str, include_in_net_worth: bool) -> Self {
        Self {
            name: name.to_string(),
            category: category.to_string(),
            include_in_net_worth,
        }
    }
}

/// Ledger engine behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default)]
    pub partition: PartitionScheme,
    #[serde(default)]
    pub report_granularity: ReportGranularity,
    /// Compare incremental balances with a full replay after every mutation
    #[serde(default = "default_true")]
    pub verify_incremental: bool,
    #[serde(default = "default_true")]
    pub seed_default_accounts: bool,
    #[serde(default = "default_accounts")]
    pub default_accounts: Vec<DefaultAccount>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            partition: PartitionScheme::default(),
            report_granularity: ReportGranularity::default(),
            verify_incremental: true,
            seed_default_accounts: true,
            default_accounts: default_accounts(),
        }
    }
}

fn default_accounts() -> Vec<DefaultAccount> {
    vec![
        DefaultAccount::new("Cash", "Assets", true),
        DefaultAccount::new("Bank Account", "Assets", true),
        DefaultAccount::new("Credit Card", "Liabilities", true),
        DefaultAccount::new("Salary", "Revenue", false),
        DefaultAccount::new("Dining", "Expenses", false),
        DefaultAccount::new("Transportation", "Expenses", false),
    ]
}

/// Input bounds enforced before values reach the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_max_amount")]
    pub max_amount: Decimal,
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,
    #[serde(default = "default_max_description_length")]
    pub max_description_length: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_amount: default_max_amount(),
            max_name_length: default_max_name_length(),
            max_description_length: default_max_description_length(),
        }
    }
}

fn default_max_amount() -> Decimal {
    Decimal::new(99_999_999_999, 2)
}

fn default_max_name_length() -> usize {
    50
}

fn default_max_description_length() -> usize {
    500
}

/// Periodic full recompute
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_interval_hours")]
    pub interval_hours: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_hours: default_interval_hours(),
        }
    }
}

fn default_interval_hours() -> u64 {
    24
}

fn default_true() -> bool {
    true
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Data file locations
    #[serde(default)]
    pub data: DataConfig,
    /// Engine settings
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Input bounds
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Periodic recompute
    #[serde(default)]
    pub batch: BatchConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: PathBuf) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            });
        }
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            message: e.to_string(),
        })?;
        Self::from_yaml(&content)
    }

    /// Load configuration, falling back to defaults when the file is absent
    pub fn load_or_default(path: PathBuf) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::FileNotFound { .. }) => Ok(Config::default()),
            other => other,
        }
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content).map_err(|e| ConfigError::InvalidYaml {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if self.limits.max_amount <= Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "limits.max_amount".to_string(),
                reason: "Maximum amount must be positive".to_string(),
            });
        }

        if self.limits.max_name_length == 0 || self.limits.max_description_length == 0 {
            return Err(ConfigError::InvalidValue {
                field: "limits".to_string(),
                reason: "Length limits must be greater than 0".to_string(),
            });
        }

        if self.batch.enabled && self.batch.interval_hours == 0 {
            return Err(ConfigError::InvalidValue {
                field: "batch.interval_hours".to_string(),
                reason: "Interval must be at least one hour".to_string(),
            });
        }

        let mut seen = std::collections::HashSet::new();
        for account in &self.ledger.default_accounts {
            if !seen.insert(account.name.as_str()) {
                return Err(ConfigError::ValidationError {
                    message: format!("Default account '{}' is listed twice", account.name),
                });
            }
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    pub fn data_path(&self) -> &Path {
        &self.data.path
    }

    /// Directory holding the transaction partitions
    pub fn ledger_path(&self) -> PathBuf {
        self.data.path.join(&self.data.ledger_dir)
    }

    pub fn accounts_path(&self) -> PathBuf {
        self.data.path.join(&self.data.accounts_file)
    }

    pub fn recurrence_path(&self) -> PathBuf {
        self.data.path.join(&self.data.recurrence_file)
    }

    pub fn reports_path(&self) -> PathBuf {
        self.data.path.join(&self.data.reports_file)
    }

    pub fn audit_path(&self) -> PathBuf {
        self.data.path.join(&self.data.audit_file)
    }

    /// Point every data file below `path`
    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data.path = path.into();
        self
    }
}
