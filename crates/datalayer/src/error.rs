use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    /// `id` is reserved for record identity and never goes through attribute semantics.
    #[error("`{name}` is reserved for record identity and cannot be an attribute of {model}")]
    ReservedName { model: String, name: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unknown attribute `{name}` on {model}")]
    UnknownAttribute { model: String, name: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] confique::Error),
}

pub type Result<T> = std::result::Result<T, DataError>;
