//! emx-dat CLI
//!
//! Convert legacy .dat containers to JSON/CSV/text and back.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use emx_dat::{ConversionResult, Direction, Pipeline, TargetFormat};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "emx-dat")]
#[command(author = "nzinfo <li.monan@gmail.com>")]
#[command(version)]
#[command(about = "Legacy .dat container converter")]
struct Cli {
    /// Verbose logging (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert .dat containers to structured text
    Decode {
        /// Files and directories to convert
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output format: json, csv, txt or dat
        #[arg(short, long, default_value = "json")]
        format: TargetFormat,

        /// Directory to write results to
        #[arg(short = 'C', long, default_value = ".")]
        directory: PathBuf,

        /// Print results to stdout instead of writing files
        #[arg(long)]
        stdout: bool,
    },

    /// Convert JSON, CSV or raw text to .dat containers
    Encode {
        /// Files and directories to convert
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Directory to write results to
        #[arg(short = 'C', long, default_value = ".")]
        directory: PathBuf,

        /// Print results to stdout instead of writing files
        #[arg(long)]
        stdout: bool,
    },

    /// Show classification and detected encoding without converting
    Check {
        /// Files and directories to inspect
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let pipeline = Pipeline::default();

    let failures = match cli.command {
        Commands::Decode { inputs, format, directory, stdout } => {
            convert_all(&pipeline, &inputs, format, Direction::Decode, &directory, stdout)?
        }
        Commands::Encode { inputs, directory, stdout } => convert_all(
            &pipeline,
            &inputs,
            TargetFormat::Container,
            Direction::Encode,
            &directory,
            stdout,
        )?,
        Commands::Check { inputs } => check_all(&pipeline, &inputs)?,
    };

    Ok(if failures == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Convert every input file, returning the number of rejected files
fn convert_all(
    pipeline: &Pipeline,
    inputs: &[PathBuf],
    format: TargetFormat,
    direction: Direction,
    directory: &Path,
    stdout: bool,
) -> Result<usize> {
    if !stdout {
        fs::create_dir_all(directory)
            .with_context(|| format!("Failed to create: {}", directory.display()))?;
    }

    let mut failures = 0;
    for path in collect_files(inputs)? {
        let data = fs::read(&path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        let name = file_name(&path);

        let result = pipeline.run(&data, &name, format, direction, |percent| {
            tracing::trace!(file = %name, percent, "progress");
        });

        match result {
            Ok(result) => {
                report_notices(&path, &result);
                if stdout {
                    let mut out = io::stdout().lock();
                    out.write_all(&result.output_bytes)?;
                    out.write_all(b"\n")?;
                } else {
                    let written = result.write_to(directory).with_context(|| {
                        format!("Failed to write: {}", result.suggested_file_name)
                    })?;
                    println!("{} -> {}", path.display(), written.display());
                }
            }
            Err(e) => {
                eprintln!("error: {}: {}", path.display(), e);
                failures += 1;
            }
        }
    }

    Ok(failures)
}

/// Print classification and encoding per file, returning the number of binary files
fn check_all(pipeline: &Pipeline, inputs: &[PathBuf]) -> Result<usize> {
    let mut binary = 0;
    for path in collect_files(inputs)? {
        let data = fs::read(&path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let inspection = pipeline.inspect(&data);
        match (inspection.classification.reason(), inspection.decoded) {
            (Some(reason), _) => {
                println!("{}  binary  {}", path.display(), reason);
                binary += 1;
            }
            (None, Some(decoded)) => {
                let lossy = if decoded.lossy { "  lossy" } else { "" };
                println!(
                    "{}  text  {}  score={}{}",
                    path.display(),
                    decoded.encoding_used,
                    decoded.score,
                    lossy
                );
            }
            (None, None) => println!("{}  text", path.display()),
        }
    }
    Ok(binary)
}

fn report_notices(path: &Path, result: &ConversionResult) {
    for notice in &result.notices {
        eprintln!("notice: {}: {}", path.display(), notice);
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Expand directories into the regular files beneath them
fn collect_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let entries = walkdir::WalkDir::new(input)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file());
            files.extend(entries.map(|e| e.into_path()));
        } else if input.exists() {
            files.push(input.clone());
        } else {
            anyhow::bail!("No such file or directory: {}", input.display());
        }
    }

    Ok(files)
}
