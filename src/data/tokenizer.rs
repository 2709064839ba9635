mod character;
mod pretrained;

pub use character::CharTokenizer;
pub use pretrained::PretrainedTokenizer;

use crate::error::DataError;

/// Text to token ids, shared by every dataset wrapper and batcher of a module.
pub trait Tokenizer: Send + Sync {
    /// Encodes `value` with special tokens, truncated to at most `max_length` ids.
    fn encode(&self, value: &str, max_length: usize) -> Result<Vec<usize>, DataError>;
    fn decode(&self, tokens: &[usize]) -> Result<String, DataError>;
    fn vocab_size(&self) -> usize;
    fn pad_token(&self) -> usize;
}
