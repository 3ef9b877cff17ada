use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    #[error("Configuration file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("Pattern Error: Section '{section}', Pattern '{pattern}': {reason}")]
    PatternResolution {
        section: String,
        pattern: String,
        reason: String,
    },

    #[error("File Read Error: Path '{path}', Error: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Output Write Error: Path '{path}', Error: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Walk Error: {0}")]
    Walk(String),

    #[error("Glob Pattern Error: {0}")]
    Glob(String),

    #[error("TOML Parsing Error: {0}")]
    TomlParse(String),

    #[error("Data Loading Error: {0}")]
    DataLoading(String),
}

impl From<serde_yml::Error> for AppError {
    fn from(err: serde_yml::Error) -> Self {
        AppError::DataLoading(format!("YAML decoding error: {}", err))
    }
}

impl AppError {
    /// Only a missing section file stops the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::ConfigNotFound { .. })
    }
}
