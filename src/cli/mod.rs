// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// clap and hands each subcommand to its Layer 2 use case.
//
//   encode-captions     → EncodeUseCase
//   extract-vocab       → ExtractVocabUseCase
//   filter-annotations  → FilterUseCase
//   make-test-dummy     → DummyUseCase
//   convert-features    → ConvertFeaturesUseCase

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::Commands;

use crate::application::{
    dummy_use_case::DummyUseCase,
    encode_use_case::EncodeUseCase,
    features_use_case::ConvertFeaturesUseCase,
    filter_use_case::FilterUseCase,
    vocab_use_case::ExtractVocabUseCase,
};

#[derive(Parser, Debug)]
#[command(
    name = "caption-prepro",
    version,
    about = "Preprocessing for image captioning: vocab, annotations, label arrays, region features."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::EncodeCaptions(args) => {
                let encoded = EncodeUseCase::new(args.into()).execute()?;
                println!(
                    "Encoded {} captions for {} images.",
                    encoded.caption_count(),
                    encoded.image_count
                );
            }
            Commands::ExtractVocab(args) => {
                let words = ExtractVocabUseCase::new(args.into()).execute()?;
                println!("Wrote vocabulary of {} words.", words);
            }
            Commands::FilterAnnotations(args) => {
                let report = FilterUseCase::new(args.into()).execute()?;
                for (split, stats) in report {
                    println!(
                        "{}: {} captions / {} images kept",
                        split, stats.annotations_kept, stats.images_kept
                    );
                }
            }
            Commands::MakeTestDummy(args) => {
                let written = DummyUseCase::new(args.into()).execute()?;
                println!("Wrote {} dummy captions.", written);
            }
            Commands::ConvertFeatures(args) => {
                let converted = ConvertFeaturesUseCase::new(args.into()).execute()?;
                println!("Converted features for {} images.", converted);
            }
        }
        Ok(())
    }
}
