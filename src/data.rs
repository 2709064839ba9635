mod batcher;
mod dataset;
mod module;
mod source;
pub mod tokenizer;

pub use batcher::{SentimentBatch, SentimentBatcher};
pub use dataset::{
    clean_text, encode_sample, train_test_split, EncodedSample, ImdbDataset, SentimentItem,
    SplitDataset, LINE_BREAK_ARTIFACT,
};
pub use module::{ImdbDataModule, SplitSizes};
pub use source::{HuggingfaceSource, InMemorySource, SentimentCorpus, SentimentSource};
pub use tokenizer::{CharTokenizer, PretrainedTokenizer, Tokenizer};
