// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines one subcommand per preprocessing step and all of
// their configurable flags.
//
// Enum-like flags (`--splits`, `--image-order`) go through the
// `FromStr` / `Display` impls of the domain types, so clap
// reports the accepted names on a typo.

use clap::{Args, Subcommand};

use crate::application::{
    dummy_use_case::DummyConfig,
    encode_use_case::EncodeConfig,
    features_use_case::ConvertFeaturesConfig,
    filter_use_case::FilterConfig,
    vocab_use_case::ExtractVocabConfig,
};
use crate::data::loader::ImageOrder;
use crate::domain::image::Split;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Encode captions into padded label arrays plus per-image metadata
    EncodeCaptions(EncodeArgs),

    /// Extract the vocabulary of a training run's infos file
    ExtractVocab(ExtractVocabArgs),

    /// Drop rejected and precanned captions from annotation files
    FilterAnnotations(FilterArgs),

    /// Give every image of a split one placeholder caption
    MakeTestDummy(DummyArgs),

    /// Convert bottom-up attention TSV features into numpy files
    ConvertFeatures(ConvertFeaturesArgs),
}

// ─── encode-captions ─────────────────────────────────────────────────────────
#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Directory holding <split>.json annotation files
    #[arg(long, default_value = "data")]
    pub annotations_dir: String,

    /// Base vocabulary, {"ix_to_word": {"1": ..., ...}}
    #[arg(long, default_value = "data/cocotalk_vocab.json")]
    pub vocab: String,

    /// Metadata output prefix; writes <prefix>_pretrained.json
    #[arg(long, default_value = "data/vizwiztalk")]
    pub output_json: String,

    /// Label output prefix; writes <prefix>_pretrained_label.npz
    #[arg(long, default_value = "data/vizwiztalk")]
    pub output_labels: String,

    /// Prefixed to every image file path in the metadata
    #[arg(long, default_value = "")]
    pub images_root: String,

    /// Captions longer than this are truncated
    #[arg(long, default_value_t = 16)]
    pub max_length: usize,

    /// Only words occurring more often than this are added by --extend-vocab
    #[arg(long, default_value_t = 5)]
    pub word_count_threshold: usize,

    /// Append frequent unknown training words to the base vocabulary
    #[arg(long)]
    pub extend_vocab: bool,

    /// Splits to encode, in output order
    #[arg(long, value_delimiter = ',', default_values_t = [Split::Train, Split::Val, Split::Test])]
    pub splits: Vec<Split>,

    /// Image order within a split: first-caption, image-list or id
    #[arg(long, default_value_t = ImageOrder::FirstCaption)]
    pub image_order: ImageOrder,

    /// Image ids whose captions are skipped
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<u64>,
}

impl From<EncodeArgs> for EncodeConfig {
    fn from(a: EncodeArgs) -> Self {
        EncodeConfig {
            annotations_dir:      a.annotations_dir,
            vocab_path:           a.vocab,
            output_json:          a.output_json,
            output_labels:        a.output_labels,
            images_root:          a.images_root,
            max_length:           a.max_length,
            word_count_threshold: a.word_count_threshold,
            extend_vocab:         a.extend_vocab,
            splits:               a.splits,
            image_order:          a.image_order,
            exclude:              a.exclude,
        }
    }
}

// ─── extract-vocab ───────────────────────────────────────────────────────────
#[derive(Args, Debug)]
pub struct ExtractVocabArgs {
    /// Infos file of a training run (.pkl or .json)
    #[arg(long, default_value = "log/log_aoanet_rl/infos_aoanet.pkl")]
    pub infos: String,

    /// Where to write the ix_to_word vocabulary
    #[arg(long, default_value = "data/cocotalk_vocab.json")]
    pub output: String,
}

impl From<ExtractVocabArgs> for ExtractVocabConfig {
    fn from(a: ExtractVocabArgs) -> Self {
        ExtractVocabConfig {
            infos_path:  a.infos,
            output_path: a.output,
        }
    }
}

// ─── filter-annotations ──────────────────────────────────────────────────────
#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Directory holding the raw <split>.json files
    #[arg(long, default_value = "annotations")]
    pub input_dir: String,

    /// Directory for the filtered <split>.json files
    #[arg(long, default_value = "data")]
    pub output_dir: String,

    #[arg(long, value_delimiter = ',', default_values_t = [Split::Train, Split::Val])]
    pub splits: Vec<Split>,
}

impl From<FilterArgs> for FilterConfig {
    fn from(a: FilterArgs) -> Self {
        FilterConfig {
            input_dir:  a.input_dir,
            output_dir: a.output_dir,
            splits:     a.splits,
        }
    }
}

// ─── make-test-dummy ─────────────────────────────────────────────────────────
#[derive(Args, Debug)]
pub struct DummyArgs {
    #[arg(long, default_value = "annotations")]
    pub input_dir: String,

    #[arg(long, default_value = "data")]
    pub output_dir: String,

    #[arg(long, value_delimiter = ',', default_values_t = [Split::Test])]
    pub splits: Vec<Split>,

    /// Id of the first placeholder caption
    #[arg(long, default_value_t = 155905)]
    pub first_caption_id: u64,
}

impl From<DummyArgs> for DummyConfig {
    fn from(a: DummyArgs) -> Self {
        DummyConfig {
            input_dir:        a.input_dir,
            output_dir:       a.output_dir,
            splits:           a.splits,
            first_caption_id: a.first_caption_id,
        }
    }
}

// ─── convert-features ────────────────────────────────────────────────────────
#[derive(Args, Debug)]
pub struct ConvertFeaturesArgs {
    /// Directory holding the TSV files
    #[arg(long, default_value = "data/tsv")]
    pub input_dir: String,

    /// TSV file names inside --input-dir
    #[arg(
        long,
        value_delimiter = ',',
        default_values_t = ConvertFeaturesConfig::default().inputs,
    )]
    pub inputs: Vec<String>,

    /// Output prefix; writes <prefix>_att, <prefix>_fc and <prefix>_box
    #[arg(long, default_value = "data/vizwizbu")]
    pub output_dir: String,
}

impl From<ConvertFeaturesArgs> for ConvertFeaturesConfig {
    fn from(a: ConvertFeaturesArgs) -> Self {
        ConvertFeaturesConfig {
            input_dir:  a.input_dir,
            inputs:     a.inputs,
            output_dir: a.output_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::cli::Cli;
    use crate::cli::commands::Commands;
    use clap::Parser;

    #[test]
    fn test_encode_defaults() {
        let cli = Cli::try_parse_from(["caption-prepro", "encode-captions"]).unwrap();
        let Commands::EncodeCaptions(args) = cli.command else { panic!("wrong subcommand") };

        assert_eq!(args.max_length, 16);
        assert_eq!(args.splits.len(), 3);
        assert!(!args.extend_vocab);
        assert!(args.exclude.is_empty());
    }

    #[test]
    fn test_encode_lists_and_order() {
        let cli = Cli::try_parse_from([
            "caption-prepro",
            "encode-captions",
            "--splits",
            "test",
            "--exclude",
            "3,9",
            "--image-order",
            "id",
        ])
        .unwrap();
        let Commands::EncodeCaptions(args) = cli.command else { panic!("wrong subcommand") };

        assert_eq!(args.splits, vec![crate::domain::image::Split::Test]);
        assert_eq!(args.exclude, vec![3, 9]);
        assert_eq!(args.image_order, crate::data::loader::ImageOrder::Id);
    }

    #[test]
    fn test_unknown_split_is_rejected() {
        assert!(Cli::try_parse_from(["caption-prepro", "filter-annotations", "--splits", "dev"]).is_err());
    }

    #[test]
    fn test_feature_inputs_default() {
        let cli = Cli::try_parse_from(["caption-prepro", "convert-features"]).unwrap();
        let Commands::ConvertFeatures(args) = cli.command else { panic!("wrong subcommand") };
        assert_eq!(args.inputs.len(), 3);
    }
}
