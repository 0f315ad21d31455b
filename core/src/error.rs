use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type RosterResult<T> = Result<T, RosterError>;
