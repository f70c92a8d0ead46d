use clap::{Parser, Subcommand};
use maskstat::common::MaskSource;
use maskstat::common::discovery::collect_mask_files;
use maskstat::config::Settings;
use maskstat::error::AppError;
use maskstat::export::{CsvExporter, SummaryStatistics, chart_series_json};
use maskstat::pipeline::{Batch, EncodingKind};
use maskstat::{ClassRegistry, Session, UploadOutcome};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{Level, debug, error, info, warn};

#[derive(Parser)]
#[command(name = "maskstat")]
#[command(version, about = "Artifact class percentages for segmentation masks", long_about = None)]
struct Cli {
    /// Settings file (TOML), defaults to ./maskstat.toml when present
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze mask files and write CSV, summary and chart exports
    Analyze {
        /// Mask files, or directories scanned for the mask suffix
        #[arg(value_name = "INPUT", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        out: Option<PathBuf>,

        /// Pixel encoding: red, green, blue, alpha or luma
        #[arg(long, value_name = "ENCODING")]
        channel: Option<EncodingKind>,

        /// Maximum number of masks analyzed at once
        #[arg(short = 'j', long, value_name = "N")]
        concurrency: Option<usize>,

        /// Per-file analysis timeout in milliseconds
        #[arg(long, value_name = "MS")]
        timeout_ms: Option<u64>,

        /// Skip summary_statistics.csv
        #[arg(long)]
        no_summary: bool,

        /// Skip the chart series JSON
        #[arg(long)]
        no_chart: bool,
    },
    /// Print the class table
    Classes,
}

fn init_logging(level: Level) {
    tracing_subscriber::fmt().with_max_level(level).init();
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze {
            inputs,
            out,
            channel,
            concurrency,
            timeout_ms,
            no_summary,
            no_chart,
        } => {
            if let Some(out) = out {
                settings.export.output_dir = out;
            }
            if let Some(channel) = channel {
                settings.analysis.channel = channel;
            }
            if let Some(concurrency) = concurrency {
                settings.batch.max_concurrency = concurrency;
            }
            if timeout_ms.is_some() {
                settings.batch.decode_timeout_ms = timeout_ms;
            }
            settings.validate()?;
            init_logging(if cli.verbose { Level::DEBUG } else { settings.log_level() });

            run_analyze(&settings, &inputs, !no_summary, !no_chart).await
        }
        Commands::Classes => {
            init_logging(settings.log_level());
            print_classes(&settings.registry());
            Ok(())
        }
    }
}

async fn run_analyze(
    settings: &Settings,
    inputs: &[PathBuf],
    write_summary: bool,
    write_chart: bool,
) -> Result<(), AppError> {
    let files = collect_mask_files(inputs, &settings.input.mask_suffix)?;
    if files.is_empty() {
        return Err(AppError::NoInputs);
    }
    info!("Analyzing {} mask files", files.len());

    let registry = Arc::new(settings.registry());
    let session = Session::new(settings.analyzer_builder(registry.clone()).build());

    let sources: Vec<Arc<dyn MaskSource>> = files
        .into_iter()
        .map(|file| Arc::new(file) as Arc<dyn MaskSource>)
        .collect();

    let batch = match session.upload(sources).await {
        UploadOutcome::Ready(batch) => batch,
        UploadOutcome::Failed(e) => {
            for failure in e.failures() {
                error!("{}: {}", failure.filename, failure.reason);
            }
            return Err(e.into());
        }
        UploadOutcome::Superseded => {
            warn!("Batch was superseded before it completed");
            return Ok(());
        }
    };

    write_exports(settings, &registry, &batch, write_summary, write_chart).await?;
    log_summary(&registry, &batch, &settings.input.mask_suffix);
    Ok(())
}

async fn write_exports(
    settings: &Settings,
    registry: &ClassRegistry,
    batch: &Batch,
    write_summary: bool,
    write_chart: bool,
) -> Result<(), AppError> {
    let out = &settings.export.output_dir;
    tokio::fs::create_dir_all(out).await?;

    let csv = CsvExporter::new(registry).render(batch);
    write_file(out, &settings.export.csv_filename, csv).await?;

    if write_summary {
        let summary = SummaryStatistics::from_batch(registry, batch).to_csv();
        write_file(out, &settings.export.summary_filename, summary).await?;
    }

    if write_chart {
        let chart = chart_series_json(registry, batch)?;
        write_file(out, &settings.export.chart_filename, chart).await?;
    }

    Ok(())
}

async fn write_file(dir: &Path, filename: &str, contents: String) -> Result<(), AppError> {
    let path = dir.join(filename);
    tokio::fs::write(&path, contents).await?;
    info!("Wrote {}", path.display());
    Ok(())
}

fn log_summary(registry: &ClassRegistry, batch: &Batch, mask_suffix: &str) {
    for result in batch.results() {
        debug!(
            "{}: {} pixels",
            result.slide_name(mask_suffix),
            result.total_pixels()
        );
    }

    let summary = SummaryStatistics::from_batch(registry, batch);
    info!("Total slides analyzed: {}", batch.len());
    for (name, stats) in summary.classes() {
        match stats.mean {
            Some(mean) => info!("{}: {:.2}%", name, mean),
            None => info!("{}: undefined", name),
        }
    }
}

fn print_classes(registry: &ClassRegistry) {
    for class in registry.classes() {
        let note = if registry.excluded_from_denominator() == Some(class.id) {
            " (excluded from denominator)"
        } else {
            ""
        };
        println!("{} {:<18} {}{}", class.id, class.name, class.color, note);
    }
}
