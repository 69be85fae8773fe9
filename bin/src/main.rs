mod config;
mod processing;
mod scene;
mod stats;

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{bail, Context};
use clap::Parser;
use rayon::prelude::*;
use crate::config::{Config, EllipsoidPreset, VertexFormatPreset};
use crate::processing::{Processor, SceneReport};
use crate::scene::SceneFile;
use crate::stats::ProcessingStats;

#[derive(Debug, Copy, Clone, Eq, PartialEq, clap::ValueEnum)]
enum LogFormat {
    Compact,
    Full,
    Pretty,
    Json,
}

#[derive(Parser)]
#[command(name = "tricolor")]
#[command(about = "Assemble multi-colored triangle meshes on a reference ellipsoid")]
#[command(version = "1.0")]
struct Args {
    /// Input scene file (.json or .toml) or directory for batch processing; the built-in demo scene when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Generate default configuration file and exit
    #[arg(long)]
    generate_config: bool,

    /// Write the built-in demo scene to this path and exit
    #[arg(long)]
    generate_demo_scene: Option<PathBuf>,

    /// File patterns to include in batch processing (e.g., "*.json,*.toml")
    #[arg(long)]
    include_patterns: Option<String>,

    /// File patterns to exclude from batch processing
    #[arg(long)]
    exclude_patterns: Option<String>,

    /// Number of parallel workers for batch processing
    #[arg(long)]
    workers: Option<usize>,

    /// Continue batch processing even if some files fail
    #[arg(long)]
    continue_on_error: Option<bool>,

    /// Attributes every vertex must carry
    #[arg(long)]
    vertex_format: Option<VertexFormatPreset>,

    /// Reference ellipsoid
    #[arg(long)]
    ellipsoid: Option<EllipsoidPreset>,

    /// Draw without alpha blending
    #[arg(long)]
    opaque: bool,

    /// Skip rendering PNG previews
    #[arg(long)]
    skip_preview: Option<bool>,

    /// Logging output filters; comma-separated
    #[arg(long, default_value = "warn,tricolor=info", env = "TRICOLOR_LOG_FILTER")]
    log_filter: String,

    /// Logging output format
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
}

fn initialize_tracing(log_filter: &str, log_format: LogFormat) {
    let tsub = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter);

    match log_format {
        LogFormat::Compact => tsub.compact().init(),
        LogFormat::Full => tsub.init(),
        LogFormat::Pretty => tsub.pretty().init(),
        LogFormat::Json => tsub.json().init(),
    }
}

fn matches_patterns(filename: &str, patterns: &[String]) -> bool {
    if patterns.is_empty() {
        return false;
    }

    patterns.iter().any(|pattern| {
        if pattern.contains('*') {
            // Simple glob matching
            let pattern = pattern.replace('*', "");
            if pattern.starts_with('.') {
                filename.ends_with(&pattern)
            } else {
                filename.contains(&pattern)
            }
        } else {
            filename == pattern
        }
    })
}

fn find_input_files(
    input_path: &Path,
    include_patterns: &[String],
    exclude_patterns: &[String],
) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if input_path.is_file() {
        files.push(input_path.to_path_buf());
    } else if input_path.is_dir() {
        for entry in fs::read_dir(input_path)? {
            let entry = entry?;
            let path = entry.path();

            if path.is_file() {
                if let Some(filename) = path.file_name().and_then(|n| n.to_str()) {
                    let matches_include = matches_patterns(filename, include_patterns);
                    let matches_exclude = matches_patterns(filename, exclude_patterns);

                    if matches_include && !matches_exclude {
                        files.push(path);
                    }
                }
            }
        }
    } else {
        bail!("Input path does not exist: {}", input_path.display());
    }

    files.sort();
    Ok(files)
}

fn split_patterns(patterns: &str) -> Vec<String> {
    patterns
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    initialize_tracing(&args.log_filter, args.log_format);

    // Handle config generation
    if args.generate_config {
        let config_path = args.config.unwrap_or_else(|| PathBuf::from("tricolor.json"));
        Config::save_default(&config_path)?;
        return Ok(());
    }
    if let Some(scene_path) = &args.generate_demo_scene {
        SceneFile::demo().save(scene_path)?;
        println!("Generated demo scene: {}", scene_path.display());
        return Ok(());
    }

    // Load configuration
    let mut config = if let Some(config_path) = &args.config {
        Config::load(config_path)?
    } else {
        Config::default()
    };

    // Override config with command line arguments
    if args.input.is_some() {
        config.input.input = args.input;
    }
    if let Some(output) = args.output {
        config.output.output_folder = output;
    }
    if let Some(vertex_format) = args.vertex_format {
        config.geometry.vertex_format = vertex_format;
    }
    if let Some(ellipsoid) = args.ellipsoid {
        config.geometry.ellipsoid = ellipsoid;
    }
    if args.opaque {
        config.appearance.translucent = false;
    }
    if let Some(skip_preview) = args.skip_preview {
        config.output.skip_preview = skip_preview;
    }
    if let Some(workers) = args.workers {
        config.batch.workers = workers;
    }
    if let Some(continue_on_error) = args.continue_on_error {
        config.batch.continue_on_error = continue_on_error;
    }
    if let Some(include_patterns) = args.include_patterns {
        config.batch.include_patterns = split_patterns(&include_patterns);
    }
    if let Some(exclude_patterns) = args.exclude_patterns {
        config.batch.exclude_patterns.append(&mut split_patterns(&exclude_patterns));
    }

    let processor = Processor::new(config.clone());

    let Some(input) = &config.input.input else {
        let report = processor.process(None)?;
        println!(
            "Generated demo mesh ({} triangles, {} vertices) in: {}",
            report.triangles, report.vertices, config.output.output_folder.display()
        );
        return Ok(());
    };

    // Find input files
    let input_files = find_input_files(input, &config.batch.include_patterns, &config.batch.exclude_patterns)?;

    if input_files.is_empty() {
        bail!("No scene files found matching the criteria");
    }

    tracing::info!(count = input_files.len(), "found scene files");
    for file in &input_files {
        tracing::debug!("  - {}", file.display());
    }

    let mut stats = ProcessingStats::new(input_files.len());

    let results: Vec<(&PathBuf, anyhow::Result<SceneReport>)> = if config.batch.workers > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.batch.workers)
            .build()
            .context("Failed to build worker pool")?;
        pool.install(|| {
            input_files
                .par_iter()
                .map(|file| (file, processor.process(Some(file))))
                .collect()
        })
    } else {
        input_files
            .iter()
            .map(|file| (file, processor.process(Some(file))))
            .collect()
    };

    for (input_file, result) in results {
        match result {
            Ok(report) => {
                stats.record(&report);
                tracing::info!(
                    triangles = report.triangles,
                    "Successfully processed: {}",
                    input_file.display()
                );
            }
            Err(e) => {
                stats.failed += 1;
                tracing::error!("Failed to process {}: {:#}", input_file.display(), e);
                if !config.batch.continue_on_error {
                    return Err(e.context(format!("Failed to process {}", input_file.display())));
                }
            }
        }

        if input_files.len() > 1 {
            stats.print_progress();
        }
    }

    // Print final summary
    if input_files.len() > 1 {
        stats.print_summary();
    } else {
        println!("Successfully generated {} triangles in: {}",
                 stats.total_triangles, config.output.output_folder.display());
    }

    Ok(())
}
