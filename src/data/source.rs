use super::dataset::SentimentItem;
use crate::error::DataError;
use burn::data::dataset::{
    source::huggingface::HuggingfaceDatasetLoader, Dataset, InMemDataset, SqliteDataset,
};
use std::sync::Arc;

/// The two labelled partitions published with the corpus.
#[derive(Clone)]
pub struct SentimentCorpus {
    pub train: Arc<dyn Dataset<SentimentItem>>,
    pub test: Arc<dyn Dataset<SentimentItem>>,
}

/// Where the raw reviews come from.
pub trait SentimentSource: Send + Sync {
    fn load(&self) -> Result<SentimentCorpus, DataError>;
}

/// Downloads a Hugging Face dataset and caches it as SQLite under `cache_dir`.
#[derive(new, Clone, Debug)]
pub struct HuggingfaceSource {
    name: String,
    cache_dir: String,
}

impl HuggingfaceSource {
    fn split(&self, split: &str) -> Result<SqliteDataset<SentimentItem>, DataError> {
        tracing::info!(dataset = %self.name, split, "loading split");
        let dataset = HuggingfaceDatasetLoader::new(&self.name)
            .with_base_dir(&self.cache_dir)
            .dataset(split)?;
        Ok(dataset)
    }
}

impl SentimentSource for HuggingfaceSource {
    fn load(&self) -> Result<SentimentCorpus, DataError> {
        Ok(SentimentCorpus {
            train: Arc::new(self.split("train")?),
            test: Arc::new(self.split("test")?),
        })
    }
}

/// Reviews held in memory, for local corpora and tests.
#[derive(new, Clone, Debug)]
pub struct InMemorySource {
    train: Vec<SentimentItem>,
    test: Vec<SentimentItem>,
}

impl SentimentSource for InMemorySource {
    fn load(&self) -> Result<SentimentCorpus, DataError> {
        Ok(SentimentCorpus {
            train: Arc::new(InMemDataset::new(self.train.clone())),
            test: Arc::new(InMemDataset::new(self.test.clone())),
        })
    }
}
