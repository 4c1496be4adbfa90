use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("store unavailable at {path}: {source}")]
    StoreUnavailable {
        path: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("query error: {0}")]
    Query(#[from] sqlx::Error),

    #[error("empty dataset: {0}")]
    EmptyDataset(&'static str),

    #[error("no market has more than 1000 qualifying snapshots")]
    NoQualifyingMarket,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
