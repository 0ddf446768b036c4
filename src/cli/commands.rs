//! Command handlers - one function per subcommand

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use super::{
    AnalyzeArgs, Commands, CompareArgs, ConfigArgs, HashArgs, OutputFormat, ScanArgs, SniffArgs,
};
use crate::analyze::analyze_blob;
use crate::config::{generate_sample_config, Config};
use crate::hash::{Fingerprint, HashAlgorithm, PixelSampler};
use crate::scan::{scan, ScanOptions};
use crate::sniff;

/// Dispatch a parsed command
pub fn run(
    command: Commands,
    config: &Config,
    config_path: &Path,
    output: OutputFormat,
) -> Result<()> {
    match command {
        Commands::Sniff(args) => run_sniff(&args, output),
        Commands::Hash(args) => run_hash(&args, config, output),
        Commands::Analyze(args) => run_analyze(&args, config, output),
        Commands::Compare(args) => run_compare(&args, config, output),
        Commands::Scan(args) => run_scan(&args, config, output),
        Commands::Config(args) => run_config(&args, config_path),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Debug, Serialize)]
struct SniffLine {
    path: String,
    mime: String,
}

fn run_sniff(args: &SniffArgs, output: OutputFormat) -> Result<()> {
    let mut lines = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let mime = sniff::classify_reader(file)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        lines.push(SniffLine {
            path: path.display().to_string(),
            mime: mime.to_string(),
        });
    }

    match output {
        OutputFormat::Human => {
            for line in &lines {
                println!("{}: {}", line.path, line.mime);
            }
            Ok(())
        }
        OutputFormat::Json => print_json(&lines),
    }
}

fn load_sampler(path: &Path) -> Result<PixelSampler> {
    let data = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    PixelSampler::from_bytes(&data).with_context(|| format!("Failed to decode {}", path.display()))
}

fn fingerprint_file(path: &Path, algorithm: HashAlgorithm, side: u32) -> Result<Fingerprint> {
    let sampler = load_sampler(path)?;
    algorithm
        .compute_sampled(&sampler, side)
        .with_context(|| format!("Failed to fingerprint {}", path.display()))
}

fn run_hash(args: &HashArgs, config: &Config, output: OutputFormat) -> Result<()> {
    let side = args.size.unwrap_or(config.hash.size);
    let fingerprint = fingerprint_file(&args.image, args.algorithm.into(), side)?;

    match output {
        OutputFormat::Human => {
            println!("{}", fingerprint.to_hex());
            Ok(())
        }
        OutputFormat::Json => print_json(&serde_json::json!({
            "path": args.image.display().to_string(),
            "algorithm": fingerprint.algorithm.name(),
            "size": fingerprint.side,
            "hash": fingerprint.to_hex(),
        })),
    }
}

fn run_analyze(args: &AnalyzeArgs, config: &Config, output: OutputFormat) -> Result<()> {
    let data = std::fs::read(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let mut settings = config.hash;
    if let Some(size) = args.size {
        settings.size = size;
    }
    let report = analyze_blob(&data, &settings);

    match output {
        OutputFormat::Human => {
            println!("{}", args.file.display());
            println!("  type:  {}", report.mime);
            println!(
                "  size:  {}",
                humansize::format_size(report.size, humansize::BINARY)
            );
            if let Some(ahash) = &report.ahash {
                println!("  ahash: {}", ahash);
            }
            if let Some(dhash) = &report.dhash {
                println!("  dhash: {}", dhash);
            }
            Ok(())
        }
        OutputFormat::Json => print_json(&report),
    }
}

#[derive(Debug, Serialize)]
struct CompareResult {
    algorithm: String,
    size: u32,
    a: String,
    b: String,
    distance: u32,
    bits: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    similar: Option<bool>,
}

fn run_compare(args: &CompareArgs, config: &Config, output: OutputFormat) -> Result<()> {
    let side = args.size.unwrap_or(config.hash.size);
    let algorithm: HashAlgorithm = args.algorithm.into();

    let (a, b) = rayon::join(
        || fingerprint_file(&args.a, algorithm, side),
        || fingerprint_file(&args.b, algorithm, side),
    );
    let (a, b) = (a?, b?);
    let distance = a.hamming_distance(&b)?;

    let result = CompareResult {
        algorithm: algorithm.name().to_string(),
        size: side,
        a: a.to_hex(),
        b: b.to_hex(),
        distance,
        bits: a.bit_len(),
        similar: args.threshold.map(|t| distance <= t),
    };

    match output {
        OutputFormat::Human => {
            println!(
                "{} distance: {} / {} bits",
                result.algorithm, result.distance, result.bits
            );
            if let Some(similar) = result.similar {
                println!("{}", if similar { "similar" } else { "different" });
            }
            Ok(())
        }
        OutputFormat::Json => print_json(&result),
    }
}

fn run_scan(args: &ScanArgs, config: &Config, output: OutputFormat) -> Result<()> {
    let mut options = ScanOptions::from_config(args.root.clone(), config);
    options.hash.enabled = args.hash;
    if args.include_hidden {
        options.skip_hidden = false;
    }
    if args.depth.is_some() {
        options.max_depth = args.depth;
    }
    if let Some(workers) = args.workers {
        options.workers = workers;
    }
    options.progress = output == OutputFormat::Human;

    let report = scan(&options)?;
    match output {
        OutputFormat::Human => {
            print!("{}", report.to_human_string());
            Ok(())
        }
        OutputFormat::Json => print_json(&report),
    }
}

fn run_config(args: &ConfigArgs, config_path: &Path) -> Result<()> {
    if args.init {
        if Config::ensure_exists_at(config_path)? {
            println!("Wrote {}", config_path.display());
        } else {
            println!("{} already exists", config_path.display());
        }
    } else {
        print!("{}", generate_sample_config());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::AlgorithmArg;
    use image::{DynamicImage, GrayImage, ImageOutputFormat, Luma};
    use std::io::Cursor;
    use tempfile::tempdir;

    fn write_png(path: &Path, shade: u8) {
        let img = GrayImage::from_fn(24, 24, |x, y| Luma([shade.wrapping_add((x * y) as u8)]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageLuma8(img)
            .write_to(&mut out, ImageOutputFormat::Png)
            .unwrap();
        std::fs::write(path, out.into_inner()).unwrap();
    }

    #[test]
    fn test_fingerprint_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("img.png");
        write_png(&path, 10);

        let fp = fingerprint_file(&path, HashAlgorithm::Difference, 8).unwrap();
        assert_eq!(fp.bytes.len(), 16);
        let missing = dir.path().join("missing.png");
        assert!(fingerprint_file(&missing, HashAlgorithm::Average, 8).is_err());
    }

    #[test]
    fn test_compare_identical_files() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        write_png(&a, 40);
        write_png(&b, 40);

        let args = CompareArgs {
            a,
            b,
            size: Some(8),
            algorithm: AlgorithmArg::Average,
            threshold: Some(0),
        };
        run_compare(&args, &Config::default(), OutputFormat::Json).unwrap();
    }

    #[test]
    fn test_config_init() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sniffhash").join("config.toml");
        run_config(&ConfigArgs { init: true }, &path).unwrap();
        assert!(path.exists());
        run_config(&ConfigArgs { init: true }, &path).unwrap();
    }

    #[test]
    fn test_sniff_missing_file_errors() {
        let args = SniffArgs {
            files: vec!["/nonexistent/sniffhash/file".into()],
        };
        assert!(run_sniff(&args, OutputFormat::Human).is_err());
    }
}
