use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatalensError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Source '{name}' unavailable: {message}")]
    SourceUnavailable { name: String, message: String },

    #[error("Render error: {0}")]
    Render(String),

    #[error("Environment variable error: {0}")]
    Env(#[from] std::env::VarError),
}

impl DatalensError {
    /// Fatal loader failure: the remote source could not be read at all.
    pub fn source_unavailable(name: &str, message: impl Into<String>) -> Self {
        DatalensError::SourceUnavailable {
            name: name.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DatalensError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_unavailable_names_the_failing_source() {
        let err = DatalensError::source_unavailable("sheets", "not published");
        assert_eq!(err.to_string(), "Source 'sheets' unavailable: not published");
    }
}
