use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("index {0} not found")]
    NotFound(i32),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Db(#[from] DbErr),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
