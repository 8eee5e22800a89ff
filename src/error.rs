use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while training, loading or bootstrapping a model.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load configuration: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Archive download failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Archive extraction failed: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Failed to serialize artifact: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("Failed to deserialize artifact: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    #[error("Training failed: {0}")]
    Training(#[from] linfa_logistic::error::Error),

    #[error("Training corpus is empty")]
    EmptyCorpus,

    #[error("Model directory {0} is absent and no archive URL is configured")]
    NoArchiveSource(PathBuf),

    #[error("Artifact `{name}` not found under {dir}")]
    ArtifactMissing { name: String, dir: PathBuf },

    #[error("Artifact `{name}` found more than once under {dir}")]
    AmbiguousArtifact { name: String, dir: PathBuf },

    #[error(
        "Classifier was trained against vectorizer {expected:016x} but the loaded vectorizer is {found:016x}"
    )]
    ArtifactMismatch { expected: u64, found: u64 },
}

impl From<figment::Error> for Error {
    fn from(e: figment::Error) -> Self {
        Error::Config(Box::new(e))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
