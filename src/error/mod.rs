//! Error types for patientsim.

use thiserror::Error;

/// Primary error type for all patientsim operations.
#[derive(Error, Debug)]
pub enum PatientSimError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Model not registered: {0}")]
    ModelNotFound(String),

    #[error("Generation failed for backend '{backend}': {cause}")]
    Generation {
        backend: String,
        #[source]
        cause: GenerationCause,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Why a single gateway call failed.
#[derive(Error, Debug)]
pub enum GenerationCause {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("backend returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("malformed response payload: {0}")]
    MalformedResponse(String),

    #[error("timed out after {0}ms")]
    Timeout(u64),
}

impl PatientSimError {
    /// Tag a call failure with the backend it came from.
    pub fn generation(backend: impl Into<String>, cause: GenerationCause) -> Self {
        Self::Generation {
            backend: backend.into(),
            cause,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, PatientSimError>;
