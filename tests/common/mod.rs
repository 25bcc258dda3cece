//! Shared test helpers: stub transports and gateway builders.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use patientsim::config::{ModelDescriptor, ProviderKind};
use patientsim::error::GenerationCause;
use patientsim::gateway::{ModelGateway, Transport, TransportRequest};

enum StubReply {
    Text(String),
    Failure,
}

/// A transport that replays canned replies and records every request.
///
/// With an empty queue it falls back to a default reply, so long dialogues
/// don't need one queued entry per turn.
pub struct StubTransport {
    replies: Mutex<VecDeque<StubReply>>,
    requests: Mutex<Vec<TransportRequest>>,
    default_reply: String,
    delay: Option<Duration>,
}

impl StubTransport {
    pub fn new() -> Arc<Self> {
        Self::with_default_reply("stub reply")
    }

    pub fn with_default_reply(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            default_reply: reply.to_string(),
            delay: None,
        })
    }

    /// A transport that sleeps before answering, for timeout tests.
    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            default_reply: "slow reply".to_string(),
            delay: Some(delay),
        })
    }

    pub fn queue_reply(&self, text: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(StubReply::Text(text.to_string()));
    }

    pub fn queue_failure(&self) {
        self.replies.lock().unwrap().push_back(StubReply::Failure);
    }

    /// Requests seen so far, oldest first.
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn chat(&self, request: &TransportRequest) -> Result<String, GenerationCause> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.requests.lock().unwrap().push(request.clone());

        match self.replies.lock().unwrap().pop_front() {
            Some(StubReply::Text(text)) => Ok(text),
            Some(StubReply::Failure) => Err(GenerationCause::Api {
                status: 500,
                message: "stub failure".to_string(),
            }),
            None => Ok(self.default_reply.clone()),
        }
    }
}

/// Newtype so a shared [`StubTransport`] handle can be registered as a
/// `Box<dyn Transport>`. The orphan rules forbid implementing the foreign
/// `Transport` trait for `Arc<StubTransport>` directly (`Arc` is not a
/// fundamental type), so we wrap the shared handle in a local type.
pub struct SharedStub(pub Arc<StubTransport>);

#[async_trait]
impl Transport for SharedStub {
    async fn chat(&self, request: &TransportRequest) -> Result<String, GenerationCause> {
        self.0.chat(request).await
    }
}

/// Descriptor for a stub backend.
pub fn stub_descriptor(model_name: &str) -> ModelDescriptor {
    ModelDescriptor {
        provider: ProviderKind::OpenAiCompatible,
        api_key_env: None,
        base_url: None,
        model_name: model_name.to_string(),
        temperature: 0.7,
        max_tokens: 256,
    }
}

/// Gateway with the given stub backends registered.
pub fn stub_gateway(backends: &[(&str, Arc<StubTransport>)]) -> Arc<ModelGateway> {
    let mut gateway = ModelGateway::new(Duration::from_secs(5));
    for (model_id, transport) in backends {
        gateway.register(
            model_id.to_string(),
            stub_descriptor(model_id),
            Box::new(SharedStub(Arc::clone(transport))),
        );
    }
    Arc::new(gateway)
}
