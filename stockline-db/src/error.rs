use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlite(#[from] tokio_rusqlite::rusqlite::Error),

    #[error("database connection error: {0}")]
    Connection(#[from] tokio_rusqlite::Error),

    #[error("no {0} found")]
    EmptyList(&'static str),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0} not found or already deleted")]
    DeleteNoEffect(&'static str),

    #[error("no fields to update")]
    NothingToUpdate,

    #[error("no update performed, check the id and the supplied fields")]
    UpdateNoEffect,
}

pub type Result<T> = std::result::Result<T, DbError>;
