use std::path::{Path, PathBuf};
use std::process;

use anyhow::Result;
use clap::Parser;
use globset::GlobSet;
use rayon::prelude::*;
use walkdir::WalkDir;

use lcom_core::config::Config;
use lcom_core::summary::{self, ClassScore};
use lcom_core::view::ClassView;
use lcom_core::Algorithm;
use lcom_python::SourceUnit;
use lcom_report::Printer;

#[derive(Parser)]
#[command(name = "lcom")]
#[command(about = "Compute the LCOM4 class-cohesion metric over Python source trees")]
#[command(version)]
struct Cli {
    /// Files or directories to scan
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Only score files whose path contains this substring
    #[arg(short, long)]
    filter: Option<String>,

    /// Cohesion algorithm to run
    #[arg(long, default_value = "LCOM4")]
    algorithm: String,

    /// Output format: text or json
    #[arg(long, default_value = "text")]
    printer: String,

    /// Config file path (defaults to .lcom.toml in the first scanned path)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e:#}");
        process::exit(2);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let algorithm: Algorithm = cli.algorithm.parse()?;
    let printer: Printer = cli.printer.parse()?;
    let config = load_config(&cli.paths, cli.config.as_deref())?;

    let files = discover_files(&cli.paths, &config, cli.filter.as_deref())?;
    let scores = score_files(&files, algorithm);
    let summary = summary::summarize(algorithm.name(), scores);

    print!("{}", printer.render(&summary));
    Ok(())
}

fn load_config(paths: &[PathBuf], config_path: Option<&Path>) -> Result<Config> {
    if let Some(p) = config_path {
        return Config::load(p);
    }
    let root = paths
        .first()
        .map(|p| {
            if p.is_file() {
                p.parent().unwrap_or(Path::new("."))
            } else {
                p.as_path()
            }
        })
        .unwrap_or(Path::new("."));
    Ok(Config::load_or_default(root))
}

/// Walk the given paths for files matching the configured extension,
/// minus excluded globs and anything the filter substring rejects.
fn discover_files(
    paths: &[PathBuf],
    config: &Config,
    filter: Option<&str>,
) -> Result<Vec<PathBuf>> {
    let excludes = config.exclude_set()?;
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            if selected(path, config, &excludes, filter) {
                files.push(path.clone());
            }
            continue;
        }

        for entry in WalkDir::new(path)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            if selected(entry.path(), config, &excludes, filter) {
                files.push(entry.into_path());
            }
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn selected(path: &Path, config: &Config, excludes: &GlobSet, filter: Option<&str>) -> bool {
    path.extension()
        .is_some_and(|ext| ext == config.extension.as_str())
        && !excludes.is_match(path)
        && filter.map_or(true, |f| path.to_string_lossy().contains(f))
}

/// Score every class in every file. Each file is an independent,
/// side-effect-free unit of work, so the batch fans out across threads.
fn score_files(files: &[PathBuf], algorithm: Algorithm) -> Vec<ClassScore> {
    files
        .par_iter()
        .flat_map(|path| score_file(path, algorithm))
        .collect()
}

/// A file that fails to parse is skipped with a warning; the batch
/// continues.
fn score_file(path: &Path, algorithm: Algorithm) -> Vec<ClassScore> {
    let unit = match SourceUnit::from_file(path) {
        Ok(unit) => unit,
        Err(e) => {
            eprintln!("Warning: skipping {}: {e}", path.display());
            return Vec::new();
        }
    };

    unit.classes()
        .iter()
        .map(|class| ClassScore {
            name: class.name(),
            score: algorithm.calculate(class),
        })
        .collect()
}
