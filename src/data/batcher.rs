use super::dataset::EncodedSample;
use burn::{data::dataloader::batcher::Batcher, prelude::*};

/// Right-pads encoded reviews to the longest one in the batch and stacks their labels.
#[derive(Clone, new)]
pub struct SentimentBatcher<B: Backend> {
    device: B::Device,
    pad_token: usize,
}

#[derive(Debug, Clone, new)]
pub struct SentimentBatch<B: Backend> {
    pub tokens: Tensor<B, 2, Int>,    // Token ids [batch_size, seq_len]
    pub labels: Tensor<B, 1, Int>,    // Sentiment labels [batch_size]
    pub mask_pad: Tensor<B, 2, Bool>, // True where the position is padding [batch_size, seq_len]
}

impl<B: Backend> Batcher<EncodedSample, SentimentBatch<B>> for SentimentBatcher<B> {
    fn batch(&self, items: Vec<EncodedSample>) -> SentimentBatch<B> {
        let batch_size = items.len();
        // Sequences are already truncated, so only pad to the batch maximum.
        let seq_len = items
            .iter()
            .map(|item| item.token_ids.len())
            .max()
            .unwrap_or(0);

        let mut tokens = Vec::with_capacity(batch_size * seq_len);
        let mut mask_pad = Vec::with_capacity(batch_size * seq_len);
        let mut labels = Vec::with_capacity(batch_size);

        // The mask follows row lengths, so a real token equal to the pad id stays unmasked.
        for item in items {
            let len = item.token_ids.len();
            tokens.extend(
                item.token_ids
                    .into_iter()
                    .chain(std::iter::repeat(self.pad_token).take(seq_len - len))
                    .map(|id| (id as i64).elem::<B::IntElem>()),
            );
            mask_pad.extend((0..seq_len).map(|position| position >= len));
            labels.push((item.label as i64).elem::<B::IntElem>());
        }

        SentimentBatch::new(
            Tensor::from_data(TensorData::new(tokens, [batch_size, seq_len]), &self.device),
            Tensor::from_data(TensorData::new(labels, [batch_size]), &self.device),
            Tensor::from_data(TensorData::new(mask_pad, [batch_size, seq_len]), &self.device),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    const PAD: usize = 99;

    fn batcher() -> SentimentBatcher<TestBackend> {
        let device = <TestBackend as Backend>::Device::default();
        SentimentBatcher::new(device, PAD)
    }

    #[test]
    fn test_batch_shapes() {
        let items = vec![
            EncodedSample::new(vec![1, 2, 3], 0),
            EncodedSample::new(vec![4, 5, 6, 7, 8], 1),
        ];

        let batch = batcher().batch(items);
        assert_eq!(batch.tokens.dims(), [2, 5]);
        assert_eq!(batch.labels.dims(), [2]);
        assert_eq!(batch.mask_pad.dims(), [2, 5]);
    }

    #[test]
    fn test_padding_appended_to_shorter_rows() {
        let items = vec![
            EncodedSample::new(vec![1, 2, 3], 0),
            EncodedSample::new(vec![4, 5, 6, 7, 8], 1),
        ];

        let batch = batcher().batch(items);
        let tokens: Vec<i64> = batch
            .tokens
            .into_data()
            .convert::<i64>()
            .to_vec()
            .unwrap();
        let pad = PAD as i64;
        assert_eq!(tokens, vec![1, 2, 3, pad, pad, 4, 5, 6, 7, 8]);

        let mask: Vec<bool> = batch.mask_pad.into_data().to_vec().unwrap();
        assert_eq!(
            mask,
            vec![false, false, false, true, true, false, false, false, false, false]
        );
    }

    #[test]
    fn test_empty_row_is_fully_padded() {
        let items = vec![
            EncodedSample::new(vec![], 0),
            EncodedSample::new(vec![4, 5], 1),
        ];

        let batch = batcher().batch(items);
        assert_eq!(batch.tokens.dims(), [2, 2]);

        let tokens: Vec<i64> = batch
            .tokens
            .into_data()
            .convert::<i64>()
            .to_vec()
            .unwrap();
        let pad = PAD as i64;
        assert_eq!(tokens, vec![pad, pad, 4, 5]);

        let mask: Vec<bool> = batch.mask_pad.into_data().to_vec().unwrap();
        assert_eq!(mask, vec![true, true, false, false]);
    }

    #[test]
    fn test_token_equal_to_pad_id_is_not_masked() {
        let batcher = SentimentBatcher::<TestBackend>::new(Default::default(), 0);
        let items = vec![
            EncodedSample::new(vec![0, 7, 8], 1),
            EncodedSample::new(vec![9], 0),
        ];

        let batch = batcher.batch(items);
        let mask: Vec<bool> = batch.mask_pad.into_data().to_vec().unwrap();
        assert_eq!(mask, vec![false, false, false, false, true, true]);
    }

    #[test]
    fn test_labels_keep_batch_order() {
        let items = vec![
            EncodedSample::new(vec![1], 1),
            EncodedSample::new(vec![2, 3], 0),
            EncodedSample::new(vec![4, 5, 6], 1),
        ];

        let batch = batcher().batch(items);
        let labels: Vec<i64> = batch
            .labels
            .into_data()
            .convert::<i64>()
            .to_vec()
            .unwrap();
        assert_eq!(labels, vec![1, 0, 1]);
        assert_eq!(batch.tokens.dims(), [3, 3]);
    }
}
