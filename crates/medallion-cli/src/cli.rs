//! CLI argument definitions for the medallion pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

use medallion_model::Stage;
use medallion_store::CachePreference;

#[derive(Parser)]
#[command(
    name = "medallion",
    version,
    about = "Medallion ETL - Bronze/Silver/Gold pipeline over a delimited dataset",
    long_about = "Materialize a raw delimited dataset through Bronze (raw ingest),\n\
                  Silver (normalized, deduplicated) and Gold (quality-checked)\n\
                  layers, then run rollup, top-k and rolling-mean queries over Gold."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Directory holding the bronze/silver/gold tables.
    #[arg(
        long = "store-dir",
        value_name = "DIR",
        default_value = "medallion_store",
        global = true
    )]
    pub store_dir: PathBuf,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the pipeline: Bronze (optional re-ingest), Silver, Gold.
    Run(RunArgs),

    /// Report which stage tables exist and their row counts.
    Status,

    /// Print rows of a stage table.
    Show(ShowArgs),

    /// Hierarchical rollup aggregation over Gold.
    Rollup(RollupArgs),

    /// The K largest values of a numeric column of Gold.
    TopK(TopKArgs),

    /// Rolling mean over a numeric column of Gold.
    RollingMean(RollingMeanArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Source file to (re)build Bronze from. Omit to reuse the stored Bronze.
    #[arg(value_name = "FILE")]
    pub source: Option<PathBuf>,

    /// Field delimiter of the source file.
    #[arg(long = "delimiter", default_value = ";")]
    pub delimiter: char,

    /// Rebuild Silver and Gold even when stored tables exist.
    #[arg(long = "force")]
    pub force: bool,

    /// Rebuild Gold only, keeping a stored Silver.
    #[arg(long = "force-gold")]
    pub force_gold: bool,

    /// What to do with an existing Silver/Gold table when no rebuild is
    /// forced.
    #[arg(long = "on-existing", value_enum, default_value = "reuse")]
    pub on_existing: OnExisting,

    /// Write pipeline metrics as JSON to this path.
    #[arg(long = "metrics-out", value_name = "PATH")]
    pub metrics_out: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ShowArgs {
    /// Stage table to display.
    #[arg(long = "stage", value_enum, default_value = "silver")]
    pub stage: StageArg,

    /// Maximum rows to display (0 = all).
    #[arg(long = "rows", default_value_t = 20)]
    pub rows: usize,

    /// Maximum columns to display (0 = all).
    #[arg(long = "columns", default_value_t = 0)]
    pub columns: usize,
}

#[derive(Parser)]
pub struct RollupArgs {
    /// Rollup flavor.
    #[arg(long = "mode", value_enum)]
    pub mode: RollupModeArg,

    /// Base column: a timestamp column (temporal) or a categorical
    /// grouping column (categorical).
    #[arg(long = "column", value_name = "COLUMN")]
    pub column: String,

    /// Measure column to sum. Omit to pick the first eligible column.
    #[arg(long = "measure", value_name = "COLUMN")]
    pub measure: Option<String>,
}

#[derive(Parser)]
pub struct TopKArgs {
    /// Column ranked by its numeric reading.
    #[arg(long = "column", value_name = "COLUMN")]
    pub column: String,

    /// Number of values to return.
    #[arg(short = 'k', long = "k", default_value_t = 10)]
    pub k: usize,
}

#[derive(Parser)]
pub struct RollingMeanArgs {
    /// Column averaged by its numeric reading.
    #[arg(long = "column", value_name = "COLUMN")]
    pub column: String,

    /// Window size in rows.
    #[arg(long = "window", default_value_t = 7)]
    pub window: usize,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OnExisting {
    /// Keep the stored table and skip recomputation.
    Reuse,
    /// Rebuild from the upstream layer.
    Rebuild,
}

impl From<OnExisting> for CachePreference {
    fn from(value: OnExisting) -> Self {
        match value {
            OnExisting::Reuse => CachePreference::Reuse,
            OnExisting::Rebuild => CachePreference::Rebuild,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StageArg {
    Bronze,
    Silver,
    Gold,
}

impl From<StageArg> for Stage {
    fn from(value: StageArg) -> Self {
        match value {
            StageArg::Bronze => Stage::Bronze,
            StageArg::Silver => Stage::Silver,
            StageArg::Gold => Stage::Gold,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RollupModeArg {
    /// Month → week → day hierarchy from a timestamp column.
    Temporal,
    /// Single categorical grouping column.
    Categorical,
}
