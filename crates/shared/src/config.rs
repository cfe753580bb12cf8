//! Application configuration management.

use serde::Deserialize;

use crate::types::Currency;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Ledger configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Ledger configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Functional currency for this deployment.
    #[serde(default = "default_currency")]
    pub currency: Currency,
    /// Account codes the posting engine resolves at startup.
    #[serde(default)]
    pub accounts: PostingAccountCodes,
}

const fn default_currency() -> Currency {
    Currency::Usd
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            accounts: PostingAccountCodes::default(),
        }
    }
}

/// Structured codes of the accounts purchases and sales post against.
///
/// The defaults match the seeded chart of accounts.
#[derive(Debug, Clone, Deserialize)]
pub struct PostingAccountCodes {
    /// Accounts receivable (debited on sale).
    #[serde(default = "default_receivable")]
    pub receivable: String,
    /// Inventory asset (debited on purchase, credited on sale).
    #[serde(default = "default_inventory")]
    pub inventory: String,
    /// Accounts payable (credited on purchase).
    #[serde(default = "default_payable")]
    pub payable: String,
    /// Sales revenue (credited on sale).
    #[serde(default = "default_revenue")]
    pub revenue: String,
    /// Cost of goods sold (debited on sale).
    #[serde(default = "default_cogs")]
    pub cogs: String,
}

fn default_receivable() -> String {
    "1100".to_string()
}

fn default_inventory() -> String {
    "1200".to_string()
}

fn default_payable() -> String {
    "2000".to_string()
}

fn default_revenue() -> String {
    "4000".to_string()
}

fn default_cogs() -> String {
    "5000".to_string()
}

impl Default for PostingAccountCodes {
    fn default() -> Self {
        Self {
            receivable: default_receivable(),
            inventory: default_inventory(),
            payable: default_payable(),
            revenue: default_revenue(),
            cogs: default_cogs(),
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
            .add_source(config::Environment::with_prefix("KASIRA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
