use std::fmt;
use std::str::FromStr;

use crate::inventory::InventoryOptions;

pub const DEFAULT_TABLE_NAME: &str = "Inventory";

/// Deployment environment. Bulk clear/populate only run outside production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Development,
    Test,
    #[default]
    Production,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Production => "production",
        }
    }

    pub fn allows_bulk_operations(self) -> bool {
        !matches!(self, Environment::Production)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!(
                "unknown environment {other:?} (expected development, test or production)"
            )),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub table_name: String,
    pub environment: Environment,
    pub endpoint_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_string(),
            environment: Environment::default(),
            endpoint_url: None,
        }
    }
}

impl Config {
    pub fn inventory_options(&self) -> InventoryOptions {
        InventoryOptions {
            allow_bulk_operations: self.environment.allows_bulk_operations(),
        }
    }

    /// Static local credentials are only used against a custom endpoint
    /// outside production.
    pub fn uses_local_endpoint(&self) -> bool {
        self.endpoint_url.is_some() && self.environment != Environment::Production
    }
}
