use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnnotatorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("An unknown variant classification has been encountered: {0}")]
    UnknownVariantClassification(String),

    #[error("HGVSp_Short is missing for event {index}, cannot proceed")]
    MissingProteinChange { index: usize },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Error making OncoKB API request: {message}")]
    Api { status: u16, message: String },

    #[error("Error making OncoKB API request: {0}")]
    ApiStatus(u16),

    #[error("Error reading OncoKB API response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("OncoKB response id {0:?} does not match an event in the batch")]
    UnmatchedResponse(String),

    #[error("MAF error: {0}")]
    Maf(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AnnotatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_surfaces_service_message() {
        let err = AnnotatorError::Api { status: 400, message: "Invalid gene".to_string() };
        assert_eq!(err.to_string(), "Error making OncoKB API request: Invalid gene");
    }

    #[test]
    fn test_status_only_error_names_code() {
        assert!(AnnotatorError::ApiStatus(503).to_string().ends_with("503"));
    }
}
