#[macro_use]
extern crate derive_new;

use burn::data::dataset::Dataset;
use burn::prelude::*;
use serde::Serialize;

pub mod cli;
pub mod config;
pub mod data;
pub mod error;

use cli::*;
use data::*;
use error::DataError;

type NdArrayBackend = burn::backend::NdArray<f32>;
type WgpuBackend = burn::backend::Wgpu;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("imdb_sentiment_data=info")),
        )
        .init();

    let cli = Cli::parse();

    let backend = match &cli.command {
        Commands::Inspect { data, .. }
        | Commands::Encode { data, .. }
        | Commands::Check { data, .. } => data.backend,
    };

    match backend {
        BackendKind::Ndarray => run::<NdArrayBackend>(cli.command, Default::default())?,
        BackendKind::Wgpu => run::<WgpuBackend>(cli.command, Default::default())?,
    }
    Ok(())
}

fn run<B: Backend>(command: Commands, device: B::Device) -> Result<(), DataError> {
    match command {
        Commands::Inspect { data, json } => inspect::<B>(&data, json, device),
        Commands::Encode { text, data } => encode(&text, &data),
        Commands::Check { phase, data } => check::<B>(phase, &data, device),
    }
}

fn setup_module<B: Backend>(
    args: &DataArgs,
    device: B::Device,
) -> Result<ImdbDataModule<B>, DataError> {
    let config = args.module_config()?;
    let source = HuggingfaceSource::new(config.dataset.clone(), config.cache_dir.clone());
    let mut module = ImdbDataModule::new(config, args.tokenizer()?, Box::new(source), device)?;

    module.prepare_data();
    module.setup()?;
    Ok(module)
}

#[derive(Serialize)]
struct BatchShape {
    phase: &'static str,
    tokens: [usize; 2],
    labels: usize,
}

#[derive(Serialize)]
struct InspectReport {
    dataset: String,
    batch_size: usize,
    max_len: usize,
    splits: SplitSizes,
    first_batches: Vec<BatchShape>,
}

fn inspect<B: Backend>(args: &DataArgs, json: bool, device: B::Device) -> Result<(), DataError> {
    let module = setup_module::<B>(args, device)?;

    let loaders = [
        ("train", module.train_dataloader()?),
        ("validation", module.val_dataloader()?),
        ("test", module.test_dataloader()?),
    ];

    let mut first_batches = Vec::with_capacity(loaders.len());
    for (phase, loader) in loaders {
        if let Some(batch) = loader.iter().next() {
            first_batches.push(BatchShape {
                phase,
                tokens: batch.tokens.dims(),
                labels: batch.labels.dims()[0],
            });
        }
    }

    let report = InspectReport {
        dataset: module.config().dataset.clone(),
        batch_size: module.config().batch_size,
        max_len: module.config().max_len,
        splits: module.split_sizes()?,
        first_batches,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("\nDataset: {}", report.dataset);
    println!("{}", "-".repeat(60));
    println!("  Train:      {:>8}", report.splits.train);
    println!("  Validation: {:>8}", report.splits.validation);
    println!("  Test:       {:>8}", report.splits.test);
    println!("\nFirst batches (batch size {}, max length {}):", report.batch_size, report.max_len);
    for shape in &report.first_batches {
        println!(
            "  {:<12} tokens [{}, {}]  labels [{}]",
            shape.phase, shape.tokens[0], shape.tokens[1], shape.labels
        );
    }
    println!("{}", "-".repeat(60));
    Ok(())
}

fn encode(text: &str, args: &DataArgs) -> Result<(), DataError> {
    let config = args.module_config()?;
    let tokenizer = args.tokenizer()?;

    let tokens = tokenizer.encode(&clean_text(text), config.max_len)?;
    println!(
        "Token ids ({} of max {}, vocabulary {}): {:?}",
        tokens.len(),
        config.max_len,
        tokenizer.vocab_size(),
        tokens
    );
    println!("Decoded: {}", tokenizer.decode(&tokens)?);
    Ok(())
}

fn check<B: Backend>(phase: Phase, args: &DataArgs, device: B::Device) -> Result<(), DataError> {
    let module = setup_module::<B>(args, device)?;
    let max_len = module.config().max_len;

    let (loader, total_items) = match phase {
        Phase::Train => (module.train_dataloader()?, module.train_dataset()?.len()),
        Phase::Validation => (module.val_dataloader()?, module.val_dataset()?.len()),
        // The test loader walks the training split.
        Phase::Test => (module.test_dataloader()?, module.train_dataset()?.len()),
    };

    let mut progress = ProgressIndicator::new(phase, total_items);
    let mut violations = 0;

    for batch in loader.iter() {
        let [batch_size, seq_len] = batch.tokens.dims();
        if seq_len > max_len {
            tracing::error!(seq_len, max_len, "batch exceeds the maximum length");
            violations += 1;
        }

        let labels: Vec<i64> = batch
            .labels
            .into_data()
            .convert::<i64>()
            .to_vec()
            .map_err(|err| DataError::Tensor(format!("{err:?}")))?;
        if let Some(label) = labels.iter().find(|&&label| label != 0 && label != 1) {
            tracing::error!(label, "batch holds a non-binary label");
            violations += 1;
        }

        progress.update(batch_size)?;
    }
    progress.finish()?;

    if violations > 0 {
        return Err(DataError::CheckFailed(violations));
    }
    println!("All {} items passed.", progress.processed);
    Ok(())
}

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};
use std::time::Instant;

const UPDATE_FREQUENCY: usize = 50;

pub struct ProgressIndicator {
    start_time: Instant,
    phase: Phase,
    total_items: usize,
    processed: usize,
    batches: usize,
}

impl ProgressIndicator {
    pub fn new(phase: Phase, total_items: usize) -> Self {
        Self {
            start_time: Instant::now(),
            phase,
            total_items,
            processed: 0,
            batches: 0,
        }
    }

    pub fn update(&mut self, batch_size: usize) -> io::Result<()> {
        self.processed += batch_size;
        self.batches += 1;
        if self.batches % UPDATE_FREQUENCY != 1 {
            return Ok(());
        }
        self.print()
    }

    pub fn finish(&mut self) -> io::Result<()> {
        self.print()?;
        println!();
        Ok(())
    }

    fn print(&self) -> io::Result<()> {
        execute!(
            io::stdout(),
            cursor::MoveToColumn(0),
            Clear(ClearType::CurrentLine)
        )?;

        let elapsed = self.start_time.elapsed();
        let progress = (self.processed as f32 / self.total_items.max(1) as f32 * 100.0) as usize;

        print!(
            "{:?} | Batches: {} | Items: {}/{} | ({:.1}s) | {}%",
            self.phase,
            self.batches,
            self.processed,
            self.total_items,
            elapsed.as_secs_f32(),
            progress,
        );

        io::stdout().flush()
    }
}
