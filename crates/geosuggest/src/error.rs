use thiserror::Error;

pub use crate::client::TransportError;

#[derive(Error, Debug)]
pub enum GeosuggestError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("Detail lookup error: {0}")]
    DetailLookup(#[from] DetailLookupError),
    #[error("Model error: {0}")]
    Model(#[from] geosuggest_model::ModelError),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Init Logging error: {0}")]
    InitLoggingError(#[from] tracing_subscriber::filter::ParseError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failure to turn a selected suggestion into a complete feature.
#[derive(Error, Debug)]
pub enum DetailLookupError {
    #[error("Place details lookup for {id} failed: {source}")]
    Transport {
        id: String,
        #[source]
        source: TransportError,
    },
    #[error("Place details lookup for {id} returned no features")]
    NoFeatures { id: String },
    #[error("Place details lookup for {id} returned a feature without properties")]
    Unadaptable { id: String },
}

/// Failure inside the suggestion pipeline, handed to the coordinator's error hook.
#[derive(Error, Debug)]
pub enum CoordinatorError {
    #[error("Error loading suggestions for {query:?}: {source}")]
    Transport {
        query: String,
        #[source]
        source: TransportError,
    },
}

pub type Result<T> = std::result::Result<T, GeosuggestError>;
