use anyhow::Context;
use catmatch_core::{CatmatchConfig, MatchConfig};
use catmatch_matcher::Matcher;
use catmatch_table::{write_assignment, SheetRef, Workbook};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Match products between two catalog sheets
#[derive(Parser, Debug)]
#[command(name = "catmatch")]
#[command(about = "Match products between two catalog tables", long_about = None)]
struct Args {
    /// Workbook: .xlsx/.xls/.ods, a directory of CSV sheets, a CSV file or a JSON workbook
    #[arg(long)]
    input_file: PathBuf,

    /// Sheet for company A, by 0-based index or name
    #[arg(long, default_value = "0")]
    sheet_a: String,

    /// Sheet for company B, by 0-based index or name
    #[arg(long, default_value = "1")]
    sheet_b: String,

    /// Output CSV (default: <input dir>/<input stem>_matches.csv)
    #[arg(long)]
    output_file: Option<PathBuf>,

    /// JSON config file with "columns" and "matching" sections
    #[arg(long)]
    config: Option<PathBuf>,

    /// Embedding model identifier
    #[arg(long)]
    model_name: Option<String>,

    /// Minimum embedding similarity for a match
    #[arg(long)]
    threshold: Option<f32>,

    /// Only compare rows whose categories share a segment
    #[arg(long)]
    require_category_overlap: bool,

    /// Score candidate pairs on all cores
    #[arg(long)]
    parallel: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn load_config(&self) -> anyhow::Result<CatmatchConfig> {
        let mut config = match &self.config {
            Some(path) => CatmatchConfig::load(path)
                .with_context(|| format!("failed to load config {:?}", path))?,
            None => CatmatchConfig::default(),
        };
        config.matching = self.apply_overrides(config.matching);
        Ok(config)
    }

    fn apply_overrides(&self, mut matching: MatchConfig) -> MatchConfig {
        if let Some(name) = &self.model_name {
            matching.model_name = name.clone();
        }
        if let Some(threshold) = self.threshold {
            matching.emb_sim_threshold = threshold;
        }
        if self.require_category_overlap {
            matching.require_category_overlap = true;
        }
        if self.parallel {
            matching.parallel = true;
        }
        matching
    }

    fn output_path(&self) -> PathBuf {
        match &self.output_file {
            Some(path) => path.clone(),
            None => default_output_path(&self.input_file),
        }
    }
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("catalog");
    let dir = input.parent().unwrap_or_else(|| Path::new(""));
    dir.join(format!("{}_matches.csv", stem))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting catmatch v{}", env!("CARGO_PKG_VERSION"));

    let config = args.load_config()?;
    let matcher = Matcher::new(config.matching.clone())?;

    let workbook = Workbook::open(&args.input_file)
        .with_context(|| format!("failed to open workbook {:?}", args.input_file))?;
    let table_a = workbook.table(&SheetRef::parse(&args.sheet_a), &config.columns)?;
    let table_b = workbook.table(&SheetRef::parse(&args.sheet_b), &config.columns)?;

    info!("Loaded {} rows from A ('{}')", table_a.len(), table_a.name);
    info!("Loaded {} rows from B ('{}')", table_b.len(), table_b.name);

    let outcome = matcher.run(&table_a, &table_b)?;
    debug!("Summary: {}", serde_json::to_string(&outcome.summary)?);
    info!(
        "Matched {} of {} A rows (mean emb_sim {:.3})",
        outcome.summary.matches,
        outcome.summary.a_rows,
        outcome.summary.mean_emb_sim
    );

    let output = args.output_path();
    write_assignment(&output, &outcome.assignment, &table_a, &table_b)
        .with_context(|| format!("failed to write {:?}", output))?;
    info!("Matches written to {:?}", output);

    Ok(())
}
