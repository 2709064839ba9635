pub use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::ImdbDataModuleConfig;
use crate::data::{CharTokenizer, PretrainedTokenizer, Tokenizer};
use crate::error::DataError;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up the data module and report split sizes and first batch shapes
    Inspect {
        #[command(flatten)]
        data: DataArgs,

        /// Print the report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Encode a single review and print its token ids
    Encode {
        /// Review text
        #[arg(short, long)]
        text: String,

        #[command(flatten)]
        data: DataArgs,
    },

    /// Iterate every batch of one phase and verify labels and sequence lengths
    Check {
        /// Phase whose data loader is iterated
        #[arg(short, long, value_enum, default_value_t = Phase::Train)]
        phase: Phase,

        #[command(flatten)]
        data: DataArgs,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Phase {
    Train,
    Validation,
    Test,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    Ndarray,
    Wgpu,
}

#[derive(Args, Clone, Debug)]
pub struct DataArgs {
    /// JSON data module config; the flags below override its values
    #[arg(long)]
    pub config: Option<String>,

    /// Hugging Face dataset identifier
    #[arg(long)]
    pub dataset: Option<String>,

    /// Directory for the downloaded dataset cache
    #[arg(long)]
    pub cache_dir: Option<String>,

    /// Reviews per batch
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Data loader worker threads (0 iterates on the main thread)
    #[arg(long)]
    pub num_workers: Option<usize>,

    /// Maximum number of token ids per review
    #[arg(long)]
    pub max_len: Option<usize>,

    /// Seed of the validation/test split
    #[arg(long)]
    pub seed: Option<u64>,

    /// Pretrained tokenizer on the Hugging Face hub, or "char" for the character tokenizer
    #[arg(long, default_value = "bert-base-cased")]
    pub tokenizer: String,

    /// Local tokenizer.json, takes precedence over --tokenizer
    #[arg(long)]
    pub tokenizer_file: Option<String>,

    /// Tensor backend the batches are built on
    #[arg(long, value_enum, default_value_t = BackendKind::Ndarray)]
    pub backend: BackendKind,
}

impl DataArgs {
    pub fn module_config(&self) -> Result<ImdbDataModuleConfig, DataError> {
        let mut config = match &self.config {
            Some(path) => ImdbDataModuleConfig::load_file(path)?,
            None => ImdbDataModuleConfig::new(),
        };

        if let Some(dataset) = &self.dataset {
            config.dataset = dataset.clone();
        }
        if let Some(cache_dir) = &self.cache_dir {
            config.cache_dir = cache_dir.clone();
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
        if let Some(num_workers) = self.num_workers {
            config.num_workers = num_workers;
        }
        if let Some(max_len) = self.max_len {
            config.max_len = max_len;
        }
        if let Some(seed) = self.seed {
            config.split_seed = seed;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn tokenizer(&self) -> Result<Arc<dyn Tokenizer>, DataError> {
        if let Some(path) = &self.tokenizer_file {
            return Ok(Arc::new(PretrainedTokenizer::from_file(path)?));
        }

        match self.tokenizer.as_str() {
            "char" => Ok(Arc::new(CharTokenizer::default())),
            identifier => Ok(Arc::new(PretrainedTokenizer::from_pretrained(identifier)?)),
        }
    }
}
