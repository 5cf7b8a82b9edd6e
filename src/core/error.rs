use thiserror::Error;

/// Failure reported by a decision service for a single prompt.
///
/// Always recovered at the call site: the unit or leader that issued the
/// call substitutes a placeholder decision and the tick continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecisionServiceError {
    #[error("decision service unavailable: {0}")]
    Unavailable(String),

    #[error("decision request failed: {0}")]
    Request(String),

    #[error("decision service returned an empty response")]
    EmptyResponse,
}

#[derive(Error, Debug)]
pub enum SimError {
    #[error("{unit} failed during tick processing: {reason}")]
    UnitProcessing { unit: String, reason: String },

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
