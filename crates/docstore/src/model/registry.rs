use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    settings::{ConnectionOptions, Settings},
    Error, Result,
};

use super::{MongoClient, DEFAULT_CONNECTION};

#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    /// The `default` connection.
    async fn get_connection(&self) -> Result<MongoClient>;

    async fn get_client_by_name(&self, name: &str) -> Result<MongoClient>;
}

/// Lazily opened connections, at most one per name.
///
/// Options come from [`Settings`]; a `default` entry missing from the settings
/// is read from the `MONGODB_*` environment the first time it is asked for.
/// Handles stay cached for the lifetime of the registry and a failed connect
/// leaves nothing behind, so the next call tries again.
#[derive(Default)]
pub struct ConnectionRegistry {
    configured: HashMap<String, ConnectionOptions>,
    clients: Mutex<HashMap<String, MongoClient>>,
}

impl ConnectionRegistry {
    pub fn new(settings: Settings) -> Self {
        Self {
            configured: settings.connections,
            clients: Mutex::new(HashMap::new()),
        }
    }

    pub fn configure(&mut self, options: ConnectionOptions) {
        self.configured.insert(options.name.clone(), options);
    }

    pub fn configured_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.configured.keys().cloned().collect();
        names.sort();
        names
    }

    pub async fn cached(&self, name: &str) -> Option<MongoClient> {
        self.clients.lock().await.get(name).cloned()
    }

    /// Caches an already opened handle under its name. If one is cached
    /// there already, that one is kept and returned.
    #[cfg(test)]
    pub(crate) async fn adopt(&self, client: MongoClient) -> MongoClient {
        self.clients
            .lock()
            .await
            .entry(client.name().to_string())
            .or_insert(client)
            .clone()
    }

    /// Returns the handle cached under `options.name`, connecting with
    /// `options` when there is none yet.
    pub async fn get_client(&self, options: ConnectionOptions) -> Result<MongoClient> {
        let mut clients = self.clients.lock().await;

        if let Some(client) = clients.get(&options.name) {
            tracing::debug!(connection = %options.name, "reusing cached connection");
            return Ok(client.clone());
        }

        let client = MongoClient::connect(options).await?;
        clients.insert(client.name().to_string(), client.clone());

        Ok(client)
    }

    fn options_for(&self, name: &str) -> Result<ConnectionOptions> {
        match self.configured.get(name) {
            Some(options) => Ok(options.clone()),
            None if name == DEFAULT_CONNECTION => ConnectionOptions::from_env(),
            None => Err(Error::UnknownConnection(name.to_string())),
        }
    }
}

#[async_trait]
impl ConnectionProvider for ConnectionRegistry {
    async fn get_connection(&self) -> Result<MongoClient> {
        self.get_client_by_name(DEFAULT_CONNECTION).await
    }

    async fn get_client_by_name(&self, name: &str) -> Result<MongoClient> {
        if let Some(client) = self.cached(name).await {
            return Ok(client);
        }

        let options = self.options_for(name)?;
        self.get_client(options).await
    }
}
