//! Subcommand handlers.

use std::fs;

use anyhow::{Context, Result, bail};
use tracing::info;

use medallion_model::Stage;
use medallion_query::{
    RollupMode, RollupSpec, numeric_measures, rolling_mean, rollup, temporal_hierarchy, top_k,
};
use medallion_store::StageStore;

use crate::cli::{
    Cli, Command, RollingMeanArgs, RollupArgs, RollupModeArg, RunArgs, ShowArgs, TopKArgs,
};
use crate::pipeline::{RunOptions, run_pipeline};
use crate::summary;

/// Rows shown after a rolling-mean computation.
const ROLLING_TAIL: usize = 10;

pub fn dispatch(cli: &Cli) -> Result<()> {
    let store = StageStore::open(&cli.store_dir)
        .with_context(|| format!("open store at {}", cli.store_dir.display()))?;
    match &cli.command {
        Command::Run(args) => run(&store, args),
        Command::Status => status(&store),
        Command::Show(args) => show(&store, args),
        Command::Rollup(args) => run_rollup(&store, args),
        Command::TopK(args) => run_topk(&store, args),
        Command::RollingMean(args) => run_rolling(&store, args),
    }
}

fn run(store: &StageStore, args: &RunArgs) -> Result<()> {
    let Ok(delimiter) = u8::try_from(args.delimiter) else {
        bail!("delimiter must be a single-byte character, got {:?}", args.delimiter);
    };
    let options = RunOptions {
        delimiter,
        force: args.force,
        force_gold: args.force_gold,
        on_existing: args.on_existing.into(),
    };
    let report = run_pipeline(store, args.source.as_deref(), &options)?;
    summary::print_run_summary(&report);

    if let Some(path) = &args.metrics_out {
        let mut value = serde_json::to_value(&report.metrics).context("serialize metrics")?;
        if let serde_json::Value::Object(object) = &mut value {
            object.insert(
                "duplicate_pct".to_string(),
                report.metrics.duplicate_pct().into(),
            );
            object.insert(
                "duplicates_removed".to_string(),
                report.duplicates_removed.into(),
            );
        }
        let json = serde_json::to_vec_pretty(&value).context("serialize metrics")?;
        fs::write(path, json).with_context(|| format!("write metrics to {}", path.display()))?;
        info!(path = %path.display(), "metrics written");
    }
    Ok(())
}

fn status(store: &StageStore) -> Result<()> {
    let statuses: Vec<(Stage, Option<usize>)> = Stage::ALL
        .into_iter()
        .map(|stage| {
            let rows = store.exists(stage).then(|| store.row_count(stage)).transpose()?;
            Ok((stage, rows))
        })
        .collect::<Result<_, medallion_store::StoreError>>()?;
    summary::print_status(&statuses);
    Ok(())
}

fn show(store: &StageStore, args: &ShowArgs) -> Result<()> {
    let stage: Stage = args.stage.into();
    let table = store
        .load(stage)
        .with_context(|| format!("load {stage} table"))?;
    summary::print_table(&table, args.rows, args.columns);
    Ok(())
}

fn run_rollup(store: &StageStore, args: &RollupArgs) -> Result<()> {
    let gold = store.load(Stage::Gold).context("load gold table")?;
    let (work, hierarchy, mode) = match args.mode {
        RollupModeArg::Temporal => {
            let (work, hierarchy) = temporal_hierarchy(&gold, &args.column)?;
            (work, hierarchy, RollupMode::Temporal)
        }
        RollupModeArg::Categorical => {
            (gold, vec![args.column.clone()], RollupMode::Categorical)
        }
    };
    let measure = match &args.measure {
        Some(name) => name.clone(),
        None => {
            let eligible = numeric_measures(&work, &hierarchy);
            match eligible.first() {
                Some(name) => {
                    info!(measure = %name, "no measure selected, using first eligible");
                    name.clone()
                }
                None => bail!("no numeric measure column available"),
            }
        }
    };
    let spec = RollupSpec {
        mode,
        hierarchy,
        measure,
    };
    let result = rollup(&work, &spec)?;
    summary::print_rollup(&result);
    Ok(())
}

fn run_topk(store: &StageStore, args: &TopKArgs) -> Result<()> {
    let gold = store.load(Stage::Gold).context("load gold table")?;
    let ranked = top_k(&gold, &args.column, args.k)?;
    summary::print_topk(&ranked, &args.column);
    Ok(())
}

fn run_rolling(store: &StageStore, args: &RollingMeanArgs) -> Result<()> {
    let gold = store.load(Stage::Gold).context("load gold table")?;
    let means = rolling_mean(&gold, &args.column, args.window)?;
    // rolling_mean already rejected unknown columns.
    let values = gold
        .column(&args.column)
        .map(|c| c.values.as_slice())
        .unwrap_or_default();
    summary::print_rolling(values, &means, &args.column, args.window, ROLLING_TAIL);
    Ok(())
}
