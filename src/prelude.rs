//! Commonly used types, re-exported for convenience.

pub use crate::agent::{DoctorAgent, PatientAgent};
pub use crate::config::{ModelDescriptor, ProviderKind, SimConfig};
pub use crate::error::{GenerationCause, PatientSimError, Result};
pub use crate::gateway::{GenerationOptions, ModelGateway, Transport, TransportRequest};
pub use crate::orchestrator::{DialogueOrchestrator, DialoguePhase};
pub use crate::runner::BatchRunner;
pub use crate::types::{DialogueRecord, ModelMessage, PatientProfile, Role, Speaker, TranscriptEntry};
