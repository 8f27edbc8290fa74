use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("expected column `{column}` is absent")]
    Schema { column: String },

    #[error("fetching {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("export failed: {0}")]
    Export(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    pub fn missing_column(column: impl Into<String>) -> Self {
        PipelineError::Schema {
            column: column.into(),
        }
    }
}

impl From<arrow::error::ArrowError> for PipelineError {
    fn from(e: arrow::error::ArrowError) -> Self {
        PipelineError::Export(e.to_string())
    }
}

impl From<parquet::errors::ParquetError> for PipelineError {
    fn from(e: parquet::errors::ParquetError) -> Self {
        PipelineError::Export(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
