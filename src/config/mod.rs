//! Collector configuration
//!
//! Loaded from a JSON file. Every key is optional:
//!
//! | key | default |
//! |---|---|
//! | `driver` | `"oci8"` |
//! | `server_url` | `"user/passw@localhost:port/sid"` |
//! | `queries` | `["SELECT count(*) FROM tablename"]` |
//! | `table_name` | `"noTableName"` |
//! | `tag_cols`, `int_fields`, `float_fields`, `bool_fields` | `[]` |
//! | `zeroize_null` | `false` |
//! | `interval_ms` | `10000` |
//!
//! Empty strings and an empty query list fall back to the defaults too.

mod errors;

pub use errors::{ConfigError, ConfigResult};

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::collector::{ColumnRoleConfig, NullPolicy, SqlQuery};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SqlQueryConfig {
    /// Database driver name
    #[serde(default = "default_driver")]
    pub driver: String,

    /// Connection string handed to the driver
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Queries run each cycle, in order
    #[serde(default = "default_queries")]
    pub queries: Vec<String>,

    /// Measurement name of every emitted record
    #[serde(default = "default_table_name")]
    pub table_name: String,

    /// Columns emitted as tags
    #[serde(default)]
    pub tag_cols: Vec<String>,

    /// Columns parsed as 64-bit integers
    #[serde(default)]
    pub int_fields: Vec<String>,

    /// Columns parsed as 64-bit floats
    #[serde(default)]
    pub float_fields: Vec<String>,

    /// Columns parsed as booleans
    #[serde(default)]
    pub bool_fields: Vec<String>,

    /// Emit zero values for NULL fields instead of omitting them
    #[serde(default)]
    pub zeroize_null: bool,

    /// Pause between cycles for `run`
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_driver() -> String {
    "oci8".to_string()
}

fn default_server_url() -> String {
    "user/passw@localhost:port/sid".to_string()
}

fn default_queries() -> Vec<String> {
    vec!["SELECT count(*) FROM tablename".to_string()]
}

fn default_table_name() -> String {
    "noTableName".to_string()
}

fn default_interval_ms() -> u64 {
    10_000
}

impl Default for SqlQueryConfig {
    fn default() -> Self {
        Self {
            driver: default_driver(),
            server_url: default_server_url(),
            queries: default_queries(),
            table_name: default_table_name(),
            tag_cols: Vec::new(),
            int_fields: Vec::new(),
            float_fields: Vec::new(),
            bool_fields: Vec::new(),
            zeroize_null: false,
            interval_ms: default_interval_ms(),
        }
    }
}

impl SqlQueryConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse, default and validate a JSON document
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let mut config: SqlQueryConfig = serde_json::from_str(content)?;
        config.apply_defaults();
        config.validate()?;
        Ok(config)
    }

    /// Replaces empty settings with their defaults
    pub fn apply_defaults(&mut self) {
        if self.driver.is_empty() {
            self.driver = default_driver();
        }
        if self.server_url.is_empty() {
            self.server_url = default_server_url();
        }
        if self.queries.is_empty() {
            self.queries = default_queries();
        }
        if self.table_name.is_empty() {
            self.table_name = default_table_name();
        }
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.interval_ms == 0 {
            return Err(ConfigError::invalid("interval_ms must be > 0"));
        }

        if let Some(pos) = self.queries.iter().position(|q| q.trim().is_empty()) {
            return Err(ConfigError::invalid(format!("queries[{}] is empty", pos)));
        }

        Ok(())
    }

    pub fn roles(&self) -> ColumnRoleConfig {
        ColumnRoleConfig::new(
            self.tag_cols.clone(),
            self.int_fields.clone(),
            self.float_fields.clone(),
            self.bool_fields.clone(),
        )
    }

    pub fn null_policy(&self) -> NullPolicy {
        NullPolicy::from_zeroize(self.zeroize_null)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Collector described by this configuration
    pub fn collector(&self) -> SqlQuery {
        SqlQuery::new(&self.table_name)
            .with_source(&self.driver, &self.server_url)
            .with_queries(self.queries.iter().cloned())
            .with_roles(self.roles())
            .with_null_policy(self.null_policy())
    }

    /// Example configuration printed by `sample-config`
    pub fn sample() -> Self {
        Self {
            driver: "sqlite".to_string(),
            server_url: "/var/lib/inventory/inventory.db".to_string(),
            queries: vec!["SELECT location, used_count, bandwidth_recv, is_active FROM links".to_string()],
            table_name: "links".to_string(),
            tag_cols: vec!["location".to_string()],
            int_fields: vec!["used_count".to_string()],
            float_fields: vec!["bandwidth_recv".to_string()],
            bool_fields: vec!["is_active".to_string()],
            zeroize_null: false,
            interval_ms: default_interval_ms(),
        }
    }
}
