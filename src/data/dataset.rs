mod split;

pub use split::{train_test_split, SplitDataset};

use super::tokenizer::Tokenizer;
use crate::error::DataError;
use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// HTML line break left in the scraped review text.
pub const LINE_BREAK_ARTIFACT: &str = "<br/>";

/// A raw review as stored by the dataset source.
#[derive(new, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SentimentItem {
    pub text: String,
    pub label: usize,
}

/// A review after tokenization, ready for collation.
#[derive(new, Clone, Debug, PartialEq)]
pub struct EncodedSample {
    pub token_ids: Vec<usize>,
    pub label: usize,
}

/// Removes every HTML line-break artifact from a review.
pub fn clean_text(text: &str) -> String {
    text.replace(LINE_BREAK_ARTIFACT, "")
}

/// Strips line-break artifacts and tokenizes `item`, truncating to `max_len` ids.
pub fn encode_sample(
    item: &SentimentItem,
    tokenizer: &dyn Tokenizer,
    max_len: usize,
) -> Result<EncodedSample, DataError> {
    if item.label > 1 {
        return Err(DataError::InvalidLabel(item.label));
    }

    let token_ids = tokenizer.encode(&clean_text(&item.text), max_len)?;

    Ok(EncodedSample::new(token_ids, item.label))
}

/// Encodes the reviews of one split on demand; nothing is cached.
#[derive(Clone)]
pub struct ImdbDataset {
    dataset: Arc<dyn Dataset<SentimentItem>>,
    tokenizer: Arc<dyn Tokenizer>,
    max_len: usize,
}

impl ImdbDataset {
    pub fn new(
        dataset: Arc<dyn Dataset<SentimentItem>>,
        tokenizer: Arc<dyn Tokenizer>,
        max_len: usize,
    ) -> Self {
        Self {
            dataset,
            tokenizer,
            max_len,
        }
    }

    pub fn raw(&self, index: usize) -> Option<SentimentItem> {
        self.dataset.get(index)
    }

    /// Like [`Dataset::get`], but hands encoding failures back to the caller.
    pub fn try_get(&self, index: usize) -> Option<Result<EncodedSample, DataError>> {
        self.raw(index)
            .map(|item| encode_sample(&item, self.tokenizer.as_ref(), self.max_len))
    }
}

impl Dataset<EncodedSample> for ImdbDataset {
    fn get(&self, index: usize) -> Option<EncodedSample> {
        // Data loaders cannot carry errors, so a malformed review is fatal.
        self.try_get(index).map(|encoded| {
            encoded.unwrap_or_else(|err| panic!("failed to encode review {index}: {err}"))
        })
    }

    fn len(&self) -> usize {
        self.dataset.len()
    }
}
