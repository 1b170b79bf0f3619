use thiserror::Error;

/// Errors that can occur while loading stands or projecting their growth.
#[derive(Error, Debug)]
pub enum ForestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Excel error: {0}")]
    Excel(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Missing input: {0}")]
    MissingInput(String),

    /// A formula was evaluated outside its numeric domain, e.g. the logarithm
    /// of a non-positive basal area. Fails a single stand, never the batch.
    #[error("Domain error in stand {stand_id}: {message}")]
    DomainError { stand_id: String, message: String },
}

impl ForestError {
    /// Build a domain error that is not yet attributed to a stand.
    ///
    /// The engine re-labels it with the stand id via [`ForestError::for_stand`].
    pub fn domain(message: impl Into<String>) -> Self {
        ForestError::DomainError {
            stand_id: String::new(),
            message: message.into(),
        }
    }

    /// Attach a stand id to a domain error. Other variants pass through.
    pub fn for_stand(self, id: &str) -> Self {
        match self {
            ForestError::DomainError { message, .. } => ForestError::DomainError {
                stand_id: id.to_string(),
                message,
            },
            other => other,
        }
    }
}

impl From<calamine::Error> for ForestError {
    fn from(e: calamine::Error) -> Self {
        ForestError::Excel(e.to_string())
    }
}

impl From<calamine::XlsxError> for ForestError {
    fn from(e: calamine::XlsxError) -> Self {
        ForestError::Excel(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for ForestError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        ForestError::Excel(e.to_string())
    }
}

impl From<toml::de::Error> for ForestError {
    fn from(e: toml::de::Error) -> Self {
        ForestError::Config(e.to_string())
    }
}
