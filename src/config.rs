use crate::error::DataError;
use burn::config::Config;

/// Everything the data module needs besides the tokenizer.
#[derive(Config, Debug)]
pub struct ImdbDataModuleConfig {
    /// Hugging Face dataset identifier
    #[config(default = "String::from(\"stanfordnlp/imdb\")")]
    pub dataset: String,
    /// Where downloaded splits are cached
    #[config(default = "String::from(\"./data/\")")]
    pub cache_dir: String,
    #[config(default = 32)]
    pub batch_size: usize,
    /// Loader worker threads; 0 iterates on the calling thread
    #[config(default = 4)]
    pub num_workers: usize,
    /// Upper bound on token ids per review, special tokens included
    #[config(default = 512)]
    pub max_len: usize,
    /// Seed of the validation/test split
    #[config(default = 42)]
    pub split_seed: u64,
    /// Seed of the per-loader shuffle
    #[config(default = 42)]
    pub shuffle_seed: u64,
}

impl ImdbDataModuleConfig {
    pub fn validate(&self) -> Result<(), DataError> {
        if self.batch_size == 0 {
            return Err(DataError::InvalidConfig(
                "batch size must be positive".to_string(),
            ));
        }
        if self.max_len == 0 {
            return Err(DataError::InvalidConfig(
                "max length must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn load_file(path: &str) -> Result<Self, DataError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }
}
