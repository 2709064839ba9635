use super::Tokenizer;
use crate::error::DataError;
use std::path::Path;
use std::str::FromStr;
use tokenizers::{PostProcessor, TruncationDirection};

/// Hugging Face tokenizer, loaded from the hub, a `tokenizer.json` file or a JSON string.
pub struct PretrainedTokenizer {
    tokenizer: tokenizers::Tokenizer,
    pad_token: usize,
}

impl PretrainedTokenizer {
    pub fn from_pretrained(identifier: &str) -> Result<Self, DataError> {
        tracing::info!(identifier, "loading pretrained tokenizer");
        let tokenizer = tokenizers::Tokenizer::from_pretrained(identifier, None)?;
        Self::new(tokenizer)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "loading tokenizer file");
        let tokenizer = tokenizers::Tokenizer::from_file(path)?;
        Self::new(tokenizer)
    }

    pub fn from_json(json: &str) -> Result<Self, DataError> {
        let tokenizer = tokenizers::Tokenizer::from_str(json)?;
        Self::new(tokenizer)
    }

    /// Takes over the pad id, then clears the tokenizer's own padding and truncation
    /// so `max_length` alone bounds the encoded length.
    pub fn new(mut tokenizer: tokenizers::Tokenizer) -> Result<Self, DataError> {
        // Falls back to 0, the filler value of the usual sequence padding helpers.
        let pad_token = tokenizer
            .get_padding()
            .map(|padding| padding.pad_id)
            .or_else(|| tokenizer.token_to_id("[PAD]"))
            .or_else(|| tokenizer.token_to_id("<pad>"))
            .unwrap_or(0) as usize;

        tokenizer.with_padding(None);
        tokenizer.with_truncation(None)?;

        Ok(Self {
            tokenizer,
            pad_token,
        })
    }
}

impl Tokenizer for PretrainedTokenizer {
    fn encode(&self, value: &str, max_length: usize) -> Result<Vec<usize>, DataError> {
        let mut encoding = self.tokenizer.encode(value, false)?;

        // Truncate the content first so the special tokens always survive.
        let added = self
            .tokenizer
            .get_post_processor()
            .map_or(0, |processor| processor.added_tokens(false));
        if max_length < added {
            return Err(DataError::Tokenizer(format!(
                "max length {max_length} cannot hold {added} special tokens"
            )));
        }
        encoding.truncate(max_length - added, 0, TruncationDirection::Right);

        let encoding = self.tokenizer.post_process(encoding, None, true)?;
        Ok(encoding.get_ids().iter().map(|&id| id as usize).collect())
    }

    fn decode(&self, tokens: &[usize]) -> Result<String, DataError> {
        let ids: Vec<u32> = tokens.iter().map(|&id| id as u32).collect();
        Ok(self.tokenizer.decode(&ids, true)?)
    }

    fn vocab_size(&self) -> usize {
        self.tokenizer.get_vocab_size(true)
    }

    fn pad_token(&self) -> usize {
        self.pad_token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORD_LEVEL: &str = r#"{
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [
            {"id": 0, "content": "[PAD]", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
            {"id": 1, "content": "[UNK]", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
            {"id": 2, "content": "[CLS]", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
            {"id": 3, "content": "[SEP]", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true}
        ],
        "normalizer": null,
        "pre_tokenizer": {"type": "Whitespace"},
        "post_processor": {"type": "BertProcessing", "sep": ["[SEP]", 3], "cls": ["[CLS]", 2]},
        "decoder": null,
        "model": {
            "type": "WordLevel",
            "vocab": {
                "[PAD]": 0, "[UNK]": 1, "[CLS]": 2, "[SEP]": 3,
                "this": 4, "movie": 5, "was": 6, "great": 7,
                "a": 8, "truly": 9, "awful": 10, "film": 11
            },
            "unk_token": "[UNK]"
        }
    }"#;

    #[test]
    fn test_encode_adds_special_tokens() {
        let tokenizer = PretrainedTokenizer::from_json(WORD_LEVEL).unwrap();

        let tokens = tokenizer.encode("this movie was great", 16).unwrap();
        assert_eq!(tokens, vec![2, 4, 5, 6, 7, 3]);
        assert_eq!(tokenizer.pad_token(), 0);
        assert!(tokenizer.vocab_size() >= 12);
    }

    #[test]
    fn test_encode_truncates_to_max_length() {
        let tokenizer = PretrainedTokenizer::from_json(WORD_LEVEL).unwrap();

        let tokens = tokenizer
            .encode("this movie was a truly awful film", 5)
            .unwrap();
        assert_eq!(tokens, vec![2, 4, 5, 6, 3]);
        assert_eq!(tokenizer.decode(&tokens).unwrap(), "this movie was");
    }

    #[test]
    fn test_ignores_fixed_padding_from_json() {
        let json = WORD_LEVEL.replace(
            r#""padding": null"#,
            r#""padding": {"strategy": {"Fixed": 16}, "direction": "Right", "pad_to_multiple_of": null, "pad_id": 0, "pad_type_id": 0, "pad_token": "[PAD]"}"#,
        );
        let tokenizer = PretrainedTokenizer::from_json(&json).unwrap();

        let tokens = tokenizer
            .encode("this movie was a truly awful film", 5)
            .unwrap();
        assert_eq!(tokens, vec![2, 4, 5, 6, 3]);
        assert_eq!(tokenizer.pad_token(), 0);
    }

    #[test]
    fn test_ignores_truncation_from_json() {
        let json = WORD_LEVEL.replace(
            r#""truncation": null"#,
            r#""truncation": {"direction": "Right", "max_length": 3, "strategy": "LongestFirst", "stride": 0}"#,
        );
        let tokenizer = PretrainedTokenizer::from_json(&json).unwrap();

        let tokens = tokenizer
            .encode("this movie was a truly awful film", 8)
            .unwrap();
        assert_eq!(tokens, vec![2, 4, 5, 6, 8, 9, 10, 3]);
    }

    #[test]
    fn test_max_length_below_special_tokens() {
        let tokenizer = PretrainedTokenizer::from_json(WORD_LEVEL).unwrap();
        assert!(tokenizer.encode("this movie", 1).is_err());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            PretrainedTokenizer::from_json("{ not a tokenizer"),
            Err(DataError::Tokenizer(_))
        ));
    }
}
