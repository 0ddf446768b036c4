//! CLI module - Command line interface definitions and handlers

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::hash::HashAlgorithm;

/// sniffhash - content sniffing and perceptual image fingerprints
///
/// Classifies files by their leading bytes and computes ahash/dhash
/// fingerprints for raster images.
#[derive(Parser, Debug)]
#[command(name = "sniffhash")]
#[command(version)]
#[command(about = "Byte-signature MIME sniffing and perceptual image hashing", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (default: platform config dir)
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Output format for machine parsing
    #[arg(long, value_enum, global = true, default_value = "human")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the MIME type of each file
    Sniff(SniffArgs),

    /// Fingerprint an image
    Hash(HashArgs),

    /// Sniff a file and fingerprint it if it is an image
    Analyze(AnalyzeArgs),

    /// Hamming distance between two images' fingerprints
    Compare(CompareArgs),

    /// Classify every file under a directory
    Scan(ScanArgs),

    /// Print the sample config or create the config file
    Config(ConfigArgs),
}

#[derive(Debug, Clone, Parser)]
pub struct SniffArgs {
    /// Files to classify
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Parser)]
pub struct HashArgs {
    /// Image file (JPEG, PNG, GIF, WebP, BMP)
    #[arg(required = true)]
    pub image: PathBuf,

    /// Side length to downsample to (default: from config)
    #[arg(long, short)]
    pub size: Option<u32>,

    /// Fingerprint algorithm
    #[arg(long, short, value_enum, default_value = "difference")]
    pub algorithm: AlgorithmArg,
}

#[derive(Debug, Clone, Parser)]
pub struct AnalyzeArgs {
    /// File to analyze
    #[arg(required = true)]
    pub file: PathBuf,

    /// Side length to downsample to (default: from config)
    #[arg(long, short)]
    pub size: Option<u32>,
}

#[derive(Debug, Clone, Parser)]
pub struct CompareArgs {
    /// First image
    #[arg(required = true)]
    pub a: PathBuf,

    /// Second image
    #[arg(required = true)]
    pub b: PathBuf,

    /// Side length to downsample to (default: from config)
    #[arg(long, short)]
    pub size: Option<u32>,

    /// Fingerprint algorithm
    #[arg(long, short, value_enum, default_value = "difference")]
    pub algorithm: AlgorithmArg,

    /// Report the pair as similar when the distance is at most this many bits
    #[arg(long, short)]
    pub threshold: Option<u32>,
}

#[derive(Debug, Clone, Parser)]
pub struct ScanArgs {
    /// Directory to scan
    #[arg(required = true)]
    pub root: PathBuf,

    /// Fingerprint images found during the scan
    #[arg(long)]
    pub hash: bool,

    /// Maximum depth to traverse
    #[arg(long, short)]
    pub depth: Option<usize>,

    /// Include hidden files and directories
    #[arg(long)]
    pub include_hidden: bool,

    /// Number of parallel workers (default: from config, then CPU count)
    #[arg(long, short)]
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Parser)]
pub struct ConfigArgs {
    /// Write the default config file if it does not exist
    #[arg(long)]
    pub init: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human readable (default)
    Human,
    /// JSON output
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AlgorithmArg {
    /// Mean threshold (ahash)
    Average,
    /// Horizontal and vertical gradients (dhash)
    Difference,
    /// Horizontal gradient only
    Horizontal,
    /// Vertical gradient only
    Vertical,
}

impl From<AlgorithmArg> for HashAlgorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Average => HashAlgorithm::Average,
            AlgorithmArg::Difference => HashAlgorithm::Difference,
            AlgorithmArg::Horizontal => HashAlgorithm::DifferenceHorizontal,
            AlgorithmArg::Vertical => HashAlgorithm::DifferenceVertical,
        }
    }
}
