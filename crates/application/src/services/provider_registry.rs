//! Provider registry - Maps providers to clients and capabilities to models
//!
//! Populated once at startup and read-only afterwards. Every lookup fails
//! closed: a missing client or model is a configuration error, never a
//! silent fallback to another provider.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use domain::{AiProvider, Capability};
use tracing::debug;

use crate::error::ApplicationError;
use crate::ports::AiClientPort;

/// A resolved client and model for one capability of one provider
#[derive(Clone)]
pub struct ModelBinding {
    pub provider: AiProvider,
    pub capability: Capability,
    pub model: String,
    pub client: Arc<dyn AiClientPort>,
}

impl fmt::Debug for ModelBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelBinding")
            .field("provider", &self.provider)
            .field("capability", &self.capability)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

/// Read-only lookup of provider clients and model bindings
pub struct ProviderRegistry {
    clients: HashMap<AiProvider, Arc<dyn AiClientPort>>,
    models: HashMap<(AiProvider, Capability), String>,
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.providers())
            .field("models", &self.models)
            .finish_non_exhaustive()
    }
}

impl ProviderRegistry {
    pub fn builder() -> ProviderRegistryBuilder {
        ProviderRegistryBuilder::default()
    }

    /// Client registered for `provider`
    pub fn resolve_client(
        &self,
        provider: AiProvider,
    ) -> Result<Arc<dyn AiClientPort>, ApplicationError> {
        self.clients.get(&provider).cloned().ok_or_else(|| {
            ApplicationError::Configuration(format!("Unsupported AI provider: {provider}"))
        })
    }

    /// Model bound to `capability` for `provider`
    pub fn resolve_model(
        &self,
        provider: AiProvider,
        capability: Capability,
    ) -> Result<&str, ApplicationError> {
        self.models
            .get(&(provider, capability))
            .map(String::as_str)
            .ok_or_else(|| {
                ApplicationError::Configuration(format!(
                    "Model not configured for provider {provider} and capability {capability}"
                ))
            })
    }

    /// Client and model for one capability, checked together
    pub fn resolve(
        &self,
        provider: AiProvider,
        capability: Capability,
    ) -> Result<ModelBinding, ApplicationError> {
        let client = self.resolve_client(provider)?;
        let model = self.resolve_model(provider, capability)?.to_string();

        debug!(%provider, %capability, %model, "Resolved model binding");

        Ok(ModelBinding {
            provider,
            capability,
            model,
            client,
        })
    }

    /// Fail unless `(provider, capability)` can be resolved
    pub fn require(
        &self,
        provider: AiProvider,
        capability: Capability,
    ) -> Result<(), ApplicationError> {
        self.resolve(provider, capability).map(|_| ())
    }

    /// Registered providers, sorted
    pub fn providers(&self) -> Vec<AiProvider> {
        let mut providers: Vec<_> = self.clients.keys().copied().collect();
        providers.sort();
        providers
    }

    /// All bindings as `provider -> capability -> model`, sorted
    pub fn summary(&self) -> BTreeMap<AiProvider, BTreeMap<Capability, String>> {
        let mut summary: BTreeMap<AiProvider, BTreeMap<Capability, String>> = BTreeMap::new();
        for ((provider, capability), model) in &self.models {
            summary
                .entry(*provider)
                .or_default()
                .insert(*capability, model.clone());
        }
        summary
    }
}

/// Builder for [`ProviderRegistry`]
#[derive(Default)]
pub struct ProviderRegistryBuilder {
    clients: HashMap<AiProvider, Arc<dyn AiClientPort>>,
    models: HashMap<(AiProvider, Capability), String>,
}

impl fmt::Debug for ProviderRegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistryBuilder")
            .field("models", &self.models)
            .finish_non_exhaustive()
    }
}

impl ProviderRegistryBuilder {
    /// Register the client for `provider`
    #[must_use]
    pub fn client(mut self, provider: AiProvider, client: Arc<dyn AiClientPort>) -> Self {
        self.clients.insert(provider, client);
        self
    }

    /// Bind `model` to `capability` for `provider`
    #[must_use]
    pub fn model(
        mut self,
        provider: AiProvider,
        capability: Capability,
        model: impl Into<String>,
    ) -> Self {
        self.models.insert((provider, capability), model.into());
        self
    }

    /// Validate and freeze the registry
    ///
    /// Every model binding must name a registered provider and a non-empty
    /// model.
    pub fn build(self) -> Result<ProviderRegistry, ApplicationError> {
        for ((provider, capability), model) in &self.models {
            if model.trim().is_empty() {
                return Err(ApplicationError::Configuration(format!(
                    "Empty model name for provider {provider} and capability {capability}"
                )));
            }
            if !self.clients.contains_key(provider) {
                return Err(ApplicationError::Configuration(format!(
                    "Model bound for provider {provider} but no client is registered"
                )));
            }
        }

        for (provider, client) in &self.clients {
            if client.provider() != *provider {
                return Err(ApplicationError::Configuration(format!(
                    "Client for {} registered under {provider}",
                    client.provider()
                )));
            }
        }

        Ok(ProviderRegistry {
            clients: self.clients,
            models: self.models,
        })
    }
}
