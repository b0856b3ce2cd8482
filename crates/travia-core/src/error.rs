use thiserror::Error;

/// Top-level error type for the Travia system.
///
/// Each variant wraps a subsystem-specific error. Subsystem crates define
/// their own error types and implement `From<SubsystemError> for TraviaError`
/// so that the `?` operator works seamlessly across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TraviaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Travel API error: {0}")]
    Travel(String),

    #[error("Agent error: {0}")]
    Agent(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for TraviaError {
    fn from(err: toml::de::Error) -> Self {
        TraviaError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for TraviaError {
    fn from(err: toml::ser::Error) -> Self {
        TraviaError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for TraviaError {
    fn from(err: serde_json::Error) -> Self {
        TraviaError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Travia operations.
pub type Result<T> = std::result::Result<T, TraviaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TraviaError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: TraviaError = io_err.into();
        assert!(matches!(err, TraviaError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_from_toml_de() {
        let bad_toml = "invalid = [[[";
        let parsed: std::result::Result<toml::Value, _> = toml::from_str(bad_toml);
        let err: TraviaError = parsed.unwrap_err().into();
        assert!(matches!(err, TraviaError::Config(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let parsed: std::result::Result<serde_json::Value, _> =
            serde_json::from_str("{ invalid json }");
        let err: TraviaError = parsed.unwrap_err().into();
        assert!(matches!(err, TraviaError::Serialization(_)));
    }

    #[test]
    fn test_error_display_subsystems() {
        let cases: Vec<(TraviaError, &str)> = vec![
            (
                TraviaError::Llm("model not loaded".to_string()),
                "LLM error: model not loaded",
            ),
            (
                TraviaError::Travel("token expired".to_string()),
                "Travel API error: token expired",
            ),
            (
                TraviaError::Agent("no route".to_string()),
                "Agent error: no route",
            ),
            (
                TraviaError::Session("not found".to_string()),
                "Session error: not found",
            ),
            (
                TraviaError::Api("bind failed".to_string()),
                "API error: bind failed",
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_result_type_with_question_mark() {
        fn inner() -> Result<String> {
            let io_result: std::result::Result<i32, std::io::Error> = Ok(42);
            let _value = io_result?;
            Ok("success".to_string())
        }
        assert_eq!(inner().unwrap(), "success");
    }
}
