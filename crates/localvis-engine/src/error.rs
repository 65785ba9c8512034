use localvis_core::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("unknown weight table '{0}'")]
    UnknownWeightTable(String),
}
