
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LweForgeError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Thread Pool Error: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error("Search Range Error: stop ({stop}) must not be smaller than start ({start})")]
    SearchRange { start: i64, stop: i64 },

    #[error("Insufficient Samples: estimate requires m ≈ {required:e}, more than available")]
    InsufficientSamples { required: f64 },

    #[error("Configuration Error: {0}")]
    Config(String),
}

pub type LfResult<T> = Result<T, LweForgeError>;
