use std::path::PathBuf;

/// Errors raised while reading or writing title CSV files.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column '{0}'")]
    MissingColumn(String),

    #[error("Row {0} is out of range")]
    RowOutOfRange(usize),
}
