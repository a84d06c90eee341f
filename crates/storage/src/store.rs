use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::fs::atomic_write;
use crate::global::{compute_default_base, compute_store_path};

/// Keys the assistant persists between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKey {
    ApiKey,
    Resume,
}

impl StoreKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::ApiKey => "openai_api_key",
            StoreKey::Resume => "user_resume",
        }
    }
}

/// Flat JSON-file key/value store for the credential and resume context.
///
/// Read at startup, written on save, removed on reset. Every mutation
/// rewrites the whole file atomically; the store is tiny by construction.
#[derive(Debug, Clone)]
pub struct ContextStore {
    path: PathBuf,
}

impl ContextStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the platform data dir, e.g. `~/.local/share/candor/`.
    pub fn at_default_base() -> Result<Self, crate::Error> {
        let base = compute_default_base()?;
        Ok(Self::new(compute_store_path(&base)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn get(&self, key: StoreKey) -> Result<Option<String>, crate::Error> {
        let entries = self.load().await?;
        Ok(entries
            .get(key.as_str())
            .and_then(Value::as_str)
            .map(String::from))
    }

    pub async fn set(&self, key: StoreKey, value: impl Into<String>) -> Result<(), crate::Error> {
        let mut entries = self.load().await?;
        entries.insert(key.as_str().to_string(), Value::String(value.into()));
        self.persist(&entries).await
    }

    pub async fn remove(&self, key: StoreKey) -> Result<(), crate::Error> {
        let mut entries = self.load().await?;
        if entries.remove(key.as_str()).is_some() {
            self.persist(&entries).await?;
        }
        Ok(())
    }

    async fn load(&self) -> Result<Map<String, Value>, crate::Error> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Map::new());
            }
            Err(err) => return Err(err.into()),
        };

        Ok(serde_json::from_str(&raw)?)
    }

    async fn persist(&self, entries: &Map<String, Value>) -> Result<(), crate::Error> {
        let serialized = serde_json::to_string_pretty(&Value::Object(entries.clone()))?;
        atomic_write(&self.path, &serialized).await?;
        Ok(())
    }
}
