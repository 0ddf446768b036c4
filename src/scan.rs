//! Scan module - Re-classify every file under a directory
//!
//! Walks the tree with walkdir, then classifies files in parallel with rayon.
//! Only the first [`SNIFF_LEN`](crate::sniff::SNIFF_LEN) bytes of each file
//! are read unless fingerprinting is on and the file sniffs as an image.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use walkdir::{DirEntry, WalkDir};

use crate::analyze::{analyze_classified, is_hashable};
use crate::config::{Config, HashConfig};
use crate::sniff::{self, SNIFF_LEN};

/// Scanner configuration options
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Directory to scan
    pub root: PathBuf,
    /// Skip hidden files and directories
    pub skip_hidden: bool,
    /// Maximum traversal depth
    pub max_depth: Option<usize>,
    /// Fingerprint settings; images are only read in full when enabled
    pub hash: HashConfig,
    /// Number of parallel workers
    pub workers: usize,
    /// Draw a progress bar on stderr
    pub progress: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            skip_hidden: true,
            max_depth: None,
            hash: HashConfig {
                enabled: false,
                ..HashConfig::default()
            },
            workers: num_cpus::get(),
            progress: false,
        }
    }
}

impl ScanOptions {
    /// Options for `root` seeded from config
    pub fn from_config(root: PathBuf, config: &Config) -> Self {
        Self {
            root,
            skip_hidden: config.scan.skip_hidden,
            max_depth: (config.scan.max_depth > 0).then_some(config.scan.max_depth),
            hash: config.hash,
            workers: config.effective_workers(),
            progress: false,
        }
    }
}

/// One classified file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanEntry {
    pub path: PathBuf,
    pub size: u64,
    pub mime: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ahash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhash: Option<String>,
}

/// Result of a scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub root: PathBuf,
    /// Classified files, sorted by path
    pub files: Vec<ScanEntry>,
    /// Files that could not be read
    pub errors: usize,
    pub bytes_total: u64,
    /// File count per MIME type
    pub by_type: BTreeMap<String, usize>,
    pub duration_ms: u64,
    pub generated_at: DateTime<Utc>,
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

/// Collect regular files under the root (single-threaded walk)
fn collect_files(options: &ScanOptions) -> Vec<PathBuf> {
    let mut walker = WalkDir::new(&options.root).follow_links(false);
    if let Some(depth) = options.max_depth {
        walker = walker.max_depth(depth);
    }

    let root = options.root.clone();
    let skip_hidden = options.skip_hidden;
    walker
        .into_iter()
        .filter_entry(move |e| !skip_hidden || e.path() == root || !is_hidden(e))
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!("Skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(DirEntry::into_path)
        .collect()
}

/// Classify a single file, fingerprinting it when it is a hashable image.
///
/// The file is opened once: the head is sniffed, and only a hashable image
/// is read on to the end.
pub fn scan_file(path: &Path, hash: &HashConfig) -> Result<ScanEntry> {
    let mut file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let size = file
        .metadata()
        .with_context(|| format!("Failed to stat {}", path.display()))?
        .len();

    let mut data = Vec::with_capacity(SNIFF_LEN);
    (&mut file)
        .take(SNIFF_LEN as u64)
        .read_to_end(&mut data)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mime = sniff::classify(&data);

    let mut entry = ScanEntry {
        path: path.to_path_buf(),
        size,
        mime: mime.to_string(),
        ahash: None,
        dhash: None,
    };

    if hash.enabled && is_hashable(mime) {
        file.read_to_end(&mut data)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let report = analyze_classified(&data, mime, hash);
        entry.ahash = report.ahash;
        entry.dhash = report.dhash;
    }

    Ok(entry)
}

/// Walk `options.root` and classify every regular file
pub fn scan(options: &ScanOptions) -> Result<ScanReport> {
    let start = Instant::now();

    if !options.root.is_dir() {
        anyhow::bail!("Not a directory: {}", options.root.display());
    }

    let paths = collect_files(options);
    tracing::info!(
        "Scanning {} files under {}",
        paths.len(),
        options.root.display()
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.workers)
        .build()
        .context("Failed to build scan thread pool")?;

    let pb = if options.progress {
        ProgressBar::new(paths.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .context("Invalid progress template")?
            .progress_chars("█▓▒░"),
    );

    let errors = AtomicUsize::new(0);
    let mut files: Vec<ScanEntry> = pool.install(|| {
        paths
            .par_iter()
            .progress_with(pb.clone())
            .filter_map(|path| match scan_file(path, &options.hash) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    errors.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!("Error processing {}: {:#}", path.display(), e);
                    None
                }
            })
            .collect()
    });
    pb.finish_and_clear();
    files.sort_by(|a, b| a.path.cmp(&b.path));

    let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
    for entry in &files {
        *by_type.entry(entry.mime.clone()).or_default() += 1;
    }

    Ok(ScanReport {
        root: options.root.clone(),
        bytes_total: files.iter().map(|f| f.size).sum(),
        files,
        errors: errors.load(Ordering::Relaxed),
        by_type,
        duration_ms: start.elapsed().as_millis() as u64,
        generated_at: Utc::now(),
    })
}

impl ScanReport {
    /// Format as human-readable summary.
    pub fn to_human_string(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!("\n  sniffhash scan report\n  {}\n\n", "=".repeat(40)));
        out.push_str(&format!("  Root:     {}\n", self.root.display()));
        out.push_str(&format!("  Files:    {}\n", self.files.len()));
        out.push_str(&format!(
            "  Size:     {}\n",
            humansize::format_size(self.bytes_total, humansize::BINARY)
        ));
        if self.errors > 0 {
            out.push_str(&format!("  Errors:   {}\n", self.errors));
        }
        out.push_str(&format!("  Duration: {} ms\n", self.duration_ms));
        out.push_str(&format!(
            "  Generated: {}\n\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        // most common types first
        let mut types: Vec<(&String, &usize)> = self.by_type.iter().collect();
        types.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (mime, count) in types {
            out.push_str(&format!("  {:>6}  {}\n", count, mime));
        }

        let hashed: Vec<&ScanEntry> = self.files.iter().filter(|f| f.dhash.is_some()).collect();
        if !hashed.is_empty() {
            out.push_str(&format!("\n  Fingerprinted images: {}\n", hashed.len()));
            for entry in hashed {
                out.push_str(&format!("    {}\n", entry.path.display()));
                if let Some(ahash) = &entry.ahash {
                    out.push_str(&format!("      ahash {}\n", ahash));
                }
                if let Some(dhash) = &entry.dhash {
                    out.push_str(&format!("      dhash {}\n", dhash));
                }
            }
        }

        out
    }
}
