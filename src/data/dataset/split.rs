use burn::data::dataset::Dataset;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::Arc;

/// A view over a subset of a shared dataset, addressed through an index list.
pub struct SplitDataset<D: ?Sized> {
    dataset: Arc<D>,
    indices: Vec<usize>,
}

impl<D: ?Sized> SplitDataset<D> {
    pub fn new(dataset: Arc<D>, indices: Vec<usize>) -> Self {
        Self { dataset, indices }
    }
}

impl<D: ?Sized> Clone for SplitDataset<D> {
    fn clone(&self) -> Self {
        Self {
            dataset: self.dataset.clone(),
            indices: self.indices.clone(),
        }
    }
}

impl<D, I> Dataset<I> for SplitDataset<D>
where
    D: Dataset<I> + ?Sized,
    I: Send + Sync,
{
    fn get(&self, index: usize) -> Option<I> {
        self.indices
            .get(index)
            .and_then(|&position| self.dataset.get(position))
    }

    fn len(&self) -> usize {
        self.indices.len()
    }
}

/// Shuffles `dataset` with a seeded RNG and cuts it in two.
///
/// The second part receives `ceil(len * test_fraction)` items and the first one
/// the remainder, so every item lands in exactly one part.
pub fn train_test_split<D, I>(
    dataset: Arc<D>,
    test_fraction: f64,
    seed: u64,
) -> (SplitDataset<D>, SplitDataset<D>)
where
    D: Dataset<I> + ?Sized,
{
    let len = dataset.len();
    let test_len = ((len as f64) * test_fraction.clamp(0.0, 1.0)).ceil() as usize;
    let test_len = test_len.min(len);

    let mut indices: Vec<usize> = (0..len).collect();
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test_indices = indices.split_off(len - test_len);

    tracing::debug!(
        train = indices.len(),
        test = test_indices.len(),
        seed,
        "split dataset"
    );

    (
        SplitDataset::new(dataset.clone(), indices),
        SplitDataset::new(dataset, test_indices),
    )
}
