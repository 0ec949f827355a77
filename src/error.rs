use thiserror::Error;

/// Main error type for the planning pipeline
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Model API error: {0}")]
    Model(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Failed to parse model output: {message}")]
    Parse {
        message: String,
        /// Raw model text kept for diagnosis
        raw: String,
    },

    #[error("API error from {provider}: {message}")]
    Api {
        provider: &'static str,
        message: String,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PlannerError>;

impl PlannerError {
    /// True for failures the enrichment pass absorbs into placeholders
    /// rather than propagating. Generation-side failures are terminal.
    pub fn is_degradable(&self) -> bool {
        matches!(self, PlannerError::Http(_) | PlannerError::Api { .. })
    }

    /// Get the error code for structured responses
    pub fn error_code(&self) -> &'static str {
        match self {
            PlannerError::Config(_) => "CONFIG_ERROR",
            PlannerError::Model(_) => "MODEL_ERROR",
            PlannerError::Http(_) => "HTTP_ERROR",
            PlannerError::Serialization(_) => "SERIALIZATION_ERROR",
            PlannerError::Validation(_) => "VALIDATION_ERROR",
            PlannerError::Parse { .. } => "PARSE_ERROR",
            PlannerError::Api { .. } => "API_ERROR",
        }
    }
}
