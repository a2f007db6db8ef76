// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// One use case per subcommand. Each owns a plain config struct
// and coordinates the data and infra layers; none of them
// parses arguments or prints results (that's Layer 1).

// Caption encoding into label arrays + metadata
pub mod encode_use_case;

// Vocabulary extraction from a training infos file
pub mod vocab_use_case;

// Removal of rejected / precanned captions
pub mod filter_use_case;

// Placeholder captions for test splits
pub mod dummy_use_case;

// Region-feature TSV → numpy conversion
pub mod features_use_case;
