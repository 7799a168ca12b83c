use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("source database not found: {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("invalid trade {symbol}: {reason}")]
    InvalidRecord { symbol: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
