use thiserror::Error;

/// Failures at the data-file edge. The core never produces these: unknown
/// synergy keys and malformed records are normal fallbacks, not errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("unable to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to parse json '{path}': {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unable to parse yaml '{path}': {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unexpected layout in '{path}': {message}")]
    Shape { path: String, message: String },
}

pub type Result<T> = std::result::Result<T, DataError>;
