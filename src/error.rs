use thiserror::Error;

/// Errors surfaced by the library.
/// Field-level anomalies (bad amounts, missing columns, dangling categories) are
/// normalized away and never show up here.
#[derive(Error, Debug)]
pub enum FinancerError {
    #[error("CSV syntax error: {message}")]
    Syntax { line: Option<u64>, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl From<csv::Error> for FinancerError {
    fn from(err: csv::Error) -> Self {
        FinancerError::Syntax {
            line: err.position().map(|pos| pos.line()),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FinancerError>;
