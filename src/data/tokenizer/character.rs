use super::Tokenizer;
use crate::error::DataError;
use std::collections::HashMap;

/// ASCII character vocabulary with start, end and pad tokens appended.
///
/// Needs no download, which makes it the tokenizer of choice for offline runs.
pub struct CharTokenizer {
    char_to_id: HashMap<char, usize>,
    id_to_char: HashMap<usize, char>,
    vocab_size: usize,
}

impl Default for CharTokenizer {
    fn default() -> Self {
        let mut chars: Vec<char> = (32..127).map(|i| i as u8 as char).collect();
        chars.push('\n');

        let char_to_id: HashMap<char, usize> =
            chars.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        let id_to_char: HashMap<usize, char> =
            chars.iter().enumerate().map(|(i, &c)| (i, c)).collect();

        // [START], [END], [PAD]
        let vocab_size = chars.len() + 3;

        Self {
            char_to_id,
            id_to_char,
            vocab_size,
        }
    }
}

impl CharTokenizer {
    pub fn start_token(&self) -> usize {
        self.vocab_size - 3
    }

    pub fn end_token(&self) -> usize {
        self.vocab_size - 2
    }

    /// Id used for characters outside the vocabulary.
    fn unknown_token(&self) -> usize {
        self.char_to_id[&' ']
    }
}

impl Tokenizer for CharTokenizer {
    fn encode(&self, value: &str, max_length: usize) -> Result<Vec<usize>, DataError> {
        if max_length < 2 {
            return Err(DataError::Tokenizer(format!(
                "max length {max_length} cannot hold the start and end tokens"
            )));
        }

        let mut tokens = Vec::with_capacity(max_length.min(value.len() + 2));
        tokens.push(self.start_token());
        tokens.extend(
            value
                .chars()
                .take(max_length - 2)
                .map(|c| *self.char_to_id.get(&c).unwrap_or(&self.unknown_token())),
        );
        tokens.push(self.end_token());

        Ok(tokens)
    }

    fn decode(&self, tokens: &[usize]) -> Result<String, DataError> {
        Ok(tokens
            .iter()
            .filter_map(|id| self.id_to_char.get(id).copied())
            .collect())
    }

    fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    fn pad_token(&self) -> usize {
        self.vocab_size - 1
    }
}
