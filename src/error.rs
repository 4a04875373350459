use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No prompt provided")]
    MissingPrompt,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Failed to execute agent: {0}")]
    AgentError(String),

    #[error("LLM error: {0}")]
    LLMError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl Error {
    /// HTTP status the API handler maps this error to
    pub fn status_code(&self) -> u16 {
        match self {
            Error::MissingPrompt | Error::InvalidRequest(_) => 400,
            _ => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::MissingPrompt.status_code(), 400);
        assert_eq!(Error::AgentError("boom".to_string()).status_code(), 500);
        assert_eq!(Error::LLMError("quota".to_string()).status_code(), 500);
    }

    #[test]
    fn test_agent_error_message() {
        let err = Error::AgentError("browser launch failed".to_string());
        assert_eq!(err.to_string(), "Failed to execute agent: browser launch failed");
    }
}
