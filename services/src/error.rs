use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// A create call is missing a field the entity kind requires.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// A supplied value failed entity-level validation.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Db(#[from] DbErr),

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}
