use crate::backend::{Backend, PetziBackend, SCHEME};
use crate::error::{AppError, Result};
use crate::sheets::GoogleAuthenticator;
use std::collections::HashMap;
use tracing::debug;
use url::Url;

pub type BackendFactory = Box<dyn Fn(&str) -> Result<Box<dyn Backend>> + Send + Sync>;

/// Maps a protocol name to the factory building its backend from a URI.
#[derive(Default)]
pub struct BackendRegistry {
    factories: HashMap<String, BackendFactory>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every backend this crate ships.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(SCHEME, |uri| {
            let backend = PetziBackend::from_uri(uri, GoogleAuthenticator::new())?;
            Ok(Box::new(backend))
        });
        registry
    }

    /// Register a factory, replacing any previous one for the protocol.
    pub fn register<F>(&mut self, protocol: &str, factory: F)
    where
        F: Fn(&str) -> Result<Box<dyn Backend>> + Send + Sync + 'static,
    {
        self.factories
            .insert(protocol.to_string(), Box::new(factory));
    }

    pub fn protocols(&self) -> Vec<&str> {
        let mut protocols: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        protocols.sort_unstable();
        protocols
    }

    /// Build the backend matching the URI scheme.
    pub fn open(&self, uri: &str) -> Result<Box<dyn Backend>> {
        let url = Url::parse(uri)
            .map_err(|e| AppError::Config(format!("Invalid connection URI '{}': {}", uri, e)))?;

        let factory = self.factories.get(url.scheme()).ok_or_else(|| {
            AppError::Config(format!(
                "No backend registered for protocol '{}' (known: {})",
                url.scheme(),
                self.protocols().join(", ")
            ))
        })?;

        debug!(protocol = url.scheme(), "Opening backend");
        factory(uri)
    }
}
