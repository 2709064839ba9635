use burn::data::dataset::source::huggingface::ImporterError;

/// Errors raised while loading, splitting and encoding the review corpus.
///
/// Library failures are wrapped without reinterpretation so the caller sees the
/// message the underlying crate produced.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("failed to load dataset: {0}")]
    Import(#[from] ImporterError),

    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] burn::config::ConfigError),

    #[error("label {0} is not a binary sentiment label")]
    InvalidLabel(usize),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("tensor data conversion failed: {0}")]
    Tensor(String),

    #[error("{0} batches violated the label or length bounds")]
    CheckFailed(usize),

    #[error("data module used before setup()")]
    NotSetUp,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<tokenizers::Error> for DataError {
    fn from(err: tokenizers::Error) -> Self {
        Self::Tokenizer(err.to_string())
    }
}
