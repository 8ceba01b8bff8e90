use std::{collections::HashMap, fmt, path::Path, time::Duration};

use config::{Config, Environment, File, FileFormat};
use serde_derive::{Deserialize, Serialize};

use crate::{model::DEFAULT_CONNECTION, Error, Result};

const ENV_PREFIX: &str = "MONGODB";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Everything needed to open one named connection.
///
/// The environment form maps `MONGODB_SERVER`, `MONGODB_DB`,
/// `MONGODB_USER_NAME`, `MONGODB_USER_PASSWORD` and `MONGODB_TIMEOUT`
/// onto the fields of the same (lowercased) name.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ConnectionOptions {
    #[serde(default)]
    pub name: String,
    pub server: String,
    pub db: String,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_password: Option<String>,
    /// Seconds allowed for each driver call.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl ConnectionOptions {
    pub fn new(name: &str, server: &str, db: &str) -> Self {
        Self {
            name: name.to_string(),
            server: server.to_string(),
            db: db.to_string(),
            user_name: None,
            user_password: None,
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Reads the `default` connection from `MONGODB_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_env_prefix(ENV_PREFIX)
    }

    pub(crate) fn from_env_prefix(prefix: &str) -> Result<Self> {
        let s = Config::builder()
            .add_source(Environment::with_prefix(prefix))
            .build()?;

        let mut options: ConnectionOptions = s.try_deserialize()?;
        options.name = DEFAULT_CONNECTION.to_string();
        options.validate()?;

        Ok(options)
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.trim().is_empty() {
            return Err(Error::Config(format!("connection '{}' has no server", self.name)));
        }

        if self.db.trim().is_empty() {
            return Err(Error::Config(format!("connection '{}' has no database", self.name)));
        }

        if self.timeout == 0 {
            return Err(Error::Config(format!(
                "connection '{}' must have a timeout greater than zero",
                self.name
            )));
        }

        Ok(())
    }
}

impl fmt::Debug for ConnectionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionOptions")
            .field("name", &self.name)
            .field("server", &self.server)
            .field("db", &self.db)
            .field("user_name", &self.user_name)
            .field("user_password", &self.user_password.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Named connections loaded from a settings file.
///
/// ```toml
/// [connections.default]
/// server = "mongodb://localhost:27017"
/// db = "app"
/// timeout = 5
/// ```
///
/// Connection names are case-insensitive and stored lowercased.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub connections: HashMap<String, ConnectionOptions>,
}

impl Settings {
    pub fn new(config_path: &Path) -> Result<Self> {
        let s = Config::builder()
            .add_source(File::from(config_path))
            .build()?;

        Self::from_config(s)
    }

    pub fn from_toml(source: &str) -> Result<Self> {
        let s = Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?;

        Self::from_config(s)
    }

    fn from_config(s: Config) -> Result<Self> {
        let mut settings: Settings = s.try_deserialize()?;

        for (name, options) in settings.connections.iter_mut() {
            options.name = name.clone();
            options.validate()?;
        }

        Ok(settings)
    }
}
