use super::{
    batcher::{SentimentBatch, SentimentBatcher},
    dataset::{train_test_split, EncodedSample, ImdbDataset, SentimentItem},
    source::SentimentSource,
    tokenizer::Tokenizer,
};
use crate::{config::ImdbDataModuleConfig, error::DataError};
use burn::{
    data::dataloader::{DataLoader, DataLoaderBuilder},
    data::dataset::Dataset,
    prelude::*,
};
use serde::Serialize;
use std::sync::Arc;

/// Share of the published test partition held out as the test set; the rest validates.
const HELD_OUT_FRACTION: f64 = 0.5;

#[derive(Clone)]
struct Splits {
    train: ImdbDataset,
    validation: ImdbDataset,
    test: ImdbDataset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SplitSizes {
    pub train: usize,
    pub validation: usize,
    pub test: usize,
}

/// Loads the review corpus once and hands out a data loader per training phase.
pub struct ImdbDataModule<B: Backend> {
    config: ImdbDataModuleConfig,
    tokenizer: Arc<dyn Tokenizer>,
    source: Box<dyn SentimentSource>,
    device: B::Device,
    splits: Option<Splits>,
}

impl<B: Backend> ImdbDataModule<B> {
    pub fn new(
        config: ImdbDataModuleConfig,
        tokenizer: Arc<dyn Tokenizer>,
        source: Box<dyn SentimentSource>,
        device: B::Device,
    ) -> Result<Self, DataError> {
        config.validate()?;
        Ok(Self {
            config,
            tokenizer,
            source,
            device,
            splits: None,
        })
    }

    pub fn config(&self) -> &ImdbDataModuleConfig {
        &self.config
    }

    /// Download hook; sources fetch and cache on their own during [`Self::setup`].
    pub fn prepare_data(&self) {}

    /// Loads the corpus and splits its test partition in half.
    ///
    /// Only the first call does any work; later calls keep the existing split.
    pub fn setup(&mut self) -> Result<(), DataError> {
        if self.splits.is_some() {
            tracing::debug!("data module already set up");
            return Ok(());
        }

        let corpus = self.source.load()?;
        // The "train" side of the cut is held out for testing, the other half validates.
        let (test, validation) = train_test_split::<_, SentimentItem>(
            corpus.test,
            HELD_OUT_FRACTION,
            self.config.split_seed,
        );

        let max_len = self.config.max_len;
        let splits = Splits {
            train: ImdbDataset::new(corpus.train, self.tokenizer.clone(), max_len),
            validation: ImdbDataset::new(Arc::new(validation), self.tokenizer.clone(), max_len),
            test: ImdbDataset::new(Arc::new(test), self.tokenizer.clone(), max_len),
        };

        tracing::info!(
            train = splits.train.len(),
            validation = splits.validation.len(),
            test = splits.test.len(),
            max_len,
            "data module ready"
        );

        self.splits = Some(splits);
        Ok(())
    }

    fn splits(&self) -> Result<&Splits, DataError> {
        self.splits.as_ref().ok_or(DataError::NotSetUp)
    }

    pub fn split_sizes(&self) -> Result<SplitSizes, DataError> {
        let splits = self.splits()?;
        Ok(SplitSizes {
            train: splits.train.len(),
            validation: splits.validation.len(),
            test: splits.test.len(),
        })
    }

    pub fn train_dataset(&self) -> Result<ImdbDataset, DataError> {
        Ok(self.splits()?.train.clone())
    }

    pub fn val_dataset(&self) -> Result<ImdbDataset, DataError> {
        Ok(self.splits()?.validation.clone())
    }

    /// The held-out half of the published test partition.
    pub fn test_dataset(&self) -> Result<ImdbDataset, DataError> {
        Ok(self.splits()?.test.clone())
    }

    pub fn train_dataloader(&self) -> Result<Arc<dyn DataLoader<SentimentBatch<B>>>, DataError> {
        let dataset = self.train_dataset()?;
        Ok(self.dataloader("train", dataset, true))
    }

    pub fn val_dataloader(&self) -> Result<Arc<dyn DataLoader<SentimentBatch<B>>>, DataError> {
        let dataset = self.val_dataset()?;
        Ok(self.dataloader("validation", dataset, false))
    }

    /// Shuffled loader over the **training** split, not over [`Self::test_dataset`].
    ///
    /// Mirrors the test loader this module replaces, which iterated the training split.
    pub fn test_dataloader(&self) -> Result<Arc<dyn DataLoader<SentimentBatch<B>>>, DataError> {
        tracing::warn!("test loader iterates the training split, not the held-out test split");
        let dataset = self.train_dataset()?;
        Ok(self.dataloader("test", dataset, true))
    }

    fn dataloader(
        &self,
        phase: &str,
        dataset: ImdbDataset,
        shuffle: bool,
    ) -> Arc<dyn DataLoader<SentimentBatch<B>>> {
        tracing::debug!(
            phase,
            items = dataset.len(),
            batch_size = self.config.batch_size,
            num_workers = self.config.num_workers,
            shuffle,
            "building data loader"
        );

        let batcher = SentimentBatcher::<B>::new(self.device.clone(), self.tokenizer.pad_token());
        let mut builder = DataLoaderBuilder::<EncodedSample, SentimentBatch<B>>::new(batcher)
            .batch_size(self.config.batch_size);
        if shuffle {
            builder = builder.shuffle(self.config.shuffle_seed);
        }
        if self.config.num_workers > 0 {
            builder = builder.num_workers(self.config.num_workers);
        }

        builder.build(dataset)
    }
}
