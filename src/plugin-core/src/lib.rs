use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("failed to decode selector annotation: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to parse replicas value {value:?}: {source}")]
    Parse {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("unsupported resource kind {0:?}")]
    UnsupportedKind(String),

    #[error("failed to convert {kind} between unstructured and typed form: {source}")]
    Conversion {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("restore item action {0:?} is not registered")]
    UnknownAction(String),

    #[error("Metrics Error: {0}")]
    Metrics(#[source] prometheus::Error),
}
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub fn metric_label(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation",
            Error::Decode(_) => "decode",
            Error::Parse { .. } => "parse",
            Error::UnsupportedKind(_) => "unsupported_kind",
            Error::Conversion { .. } => "conversion",
            Error::UnknownAction(_) => "unknown_action",
            Error::Metrics(_) => "metrics",
        }
    }
}

/// Restore item action contract shared by the host and the actions
pub mod action;
pub use crate::action::*;

pub mod unstructured;
pub use crate::unstructured::Unstructured;

/// Host server the actions are registered with
pub mod server;
pub use crate::server::Server;

pub mod config;

/// Log integrations
pub mod telemetry;

/// Metrics
mod metrics;
pub use metrics::Metrics;
