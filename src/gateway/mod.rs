//! Model gateway: one request/response contract over heterogeneous backends.
//!
//! Backends are registered once at startup from configuration; entries whose
//! credential is absent are skipped with a warning so the gateway degrades to
//! the available set instead of failing. After registration the registry is
//! read-only and safe to share across concurrent dialogues.

pub mod chat_completions;
pub mod http;
pub mod ollama;

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use bon::Builder;
use tracing::{debug, warn};

use crate::config::{ModelDescriptor, ProviderKind};
use crate::error::{GenerationCause, PatientSimError, Result};
use crate::types::ModelMessage;

use chat_completions::ChatCompletionsTransport;
use ollama::OllamaTransport;

/// Per-call sampling overrides; unset fields fall back to the registered
/// descriptor's defaults.
#[derive(Debug, Clone, Copy, Default, Builder)]
pub struct GenerationOptions {
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

/// A fully resolved request handed to a transport.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub model_name: String,
    pub messages: Vec<ModelMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// One backend transport.
///
/// Implementations normalize their provider's response shape into plain text
/// and never touch caller-supplied state; the call is pure request→response
/// modulo the remote side effect.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn chat(&self, request: &TransportRequest)
        -> std::result::Result<String, GenerationCause>;
}

struct RegisteredBackend {
    descriptor: ModelDescriptor,
    transport: Box<dyn Transport>,
}

/// Registry of resolved backends plus the shared generation contract.
pub struct ModelGateway {
    backends: HashMap<String, RegisteredBackend>,
    request_timeout: Duration,
}

impl ModelGateway {
    /// Create an empty gateway. Backends are added with [`register`] or in
    /// bulk via [`from_config`].
    ///
    /// [`register`]: ModelGateway::register
    /// [`from_config`]: ModelGateway::from_config
    pub fn new(request_timeout: Duration) -> Self {
        Self {
            backends: HashMap::new(),
            request_timeout,
        }
    }

    /// Build the registry from configuration.
    ///
    /// A backend whose required credential is missing is skipped with a
    /// warning rather than failing startup.
    pub fn from_config(
        models: &HashMap<String, ModelDescriptor>,
        request_timeout: Duration,
    ) -> Self {
        let mut gateway = Self::new(request_timeout);
        for (model_id, descriptor) in models {
            match build_transport(descriptor) {
                Ok(transport) => {
                    debug!(%model_id, provider = %descriptor.provider, "registered backend");
                    gateway.register(model_id.clone(), descriptor.clone(), transport);
                }
                Err(reason) => {
                    warn!(%model_id, %reason, "skipping backend");
                }
            }
        }
        gateway
    }

    /// Register a backend with an explicit transport. Used by [`from_config`]
    /// and by tests or embedders that bring their own transport.
    ///
    /// [`from_config`]: ModelGateway::from_config
    pub fn register(
        &mut self,
        model_id: impl Into<String>,
        descriptor: ModelDescriptor,
        transport: Box<dyn Transport>,
    ) {
        self.backends.insert(
            model_id.into(),
            RegisteredBackend {
                descriptor,
                transport,
            },
        );
    }

    /// Generate a reply from the given backend.
    ///
    /// `messages` is the full prompt context, system instruction first. The
    /// call is timeout-bounded; a timeout surfaces as a distinct generation
    /// cause. There is no internal retry; retry policy belongs to callers.
    pub async fn generate(
        &self,
        model_id: &str,
        messages: &[ModelMessage],
        options: GenerationOptions,
    ) -> Result<String> {
        let backend = self
            .backends
            .get(model_id)
            .ok_or_else(|| PatientSimError::ModelNotFound(model_id.to_string()))?;

        let request = TransportRequest {
            model_name: backend.descriptor.model_name.clone(),
            messages: messages.to_vec(),
            temperature: options
                .temperature
                .unwrap_or(backend.descriptor.temperature),
            max_tokens: options.max_tokens.unwrap_or(backend.descriptor.max_tokens),
        };

        debug!(
            model_id,
            context_len = request.messages.len(),
            "dispatching generation"
        );

        match tokio::time::timeout(self.request_timeout, backend.transport.chat(&request)).await {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(cause)) => Err(PatientSimError::generation(model_id, cause)),
            Err(_) => Err(PatientSimError::generation(
                model_id,
                GenerationCause::Timeout(self.request_timeout.as_millis() as u64),
            )),
        }
    }

    /// Model identifiers that resolved successfully, sorted.
    pub fn list_available(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.backends.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Minimal round-trip health check.
    ///
    /// An empty reply still counts as success; only a failed call does not.
    pub async fn test_connection(&self, model_id: &str) -> bool {
        let probe = [ModelMessage::user("Say hi")];
        let options = GenerationOptions::builder().max_tokens(50).build();
        match self.generate(model_id, &probe, options).await {
            Ok(_) => true,
            Err(e) => {
                warn!(model_id, error = %e, "connection test failed");
                false
            }
        }
    }
}

/// Resolve a descriptor into a live transport, or a reason to skip it.
fn build_transport(
    descriptor: &ModelDescriptor,
) -> std::result::Result<Box<dyn Transport>, String> {
    match descriptor.provider {
        ProviderKind::OpenAiCompatible => {
            let env_name = descriptor
                .api_key_env
                .as_deref()
                .ok_or_else(|| "api_key_env is required for remote providers".to_string())?;
            let api_key = std::env::var(env_name)
                .map_err(|_| format!("credential {env_name} not found in environment"))?;
            let base_url = descriptor
                .base_url
                .clone()
                .unwrap_or_else(|| chat_completions::DEFAULT_BASE_URL.to_string());
            Ok(Box::new(ChatCompletionsTransport::new(api_key, base_url)))
        }
        ProviderKind::Ollama => {
            let base_url = descriptor
                .base_url
                .clone()
                .unwrap_or_else(|| ollama::DEFAULT_BASE_URL.to_string());
            Ok(Box::new(OllamaTransport::new(base_url)))
        }
    }
}
