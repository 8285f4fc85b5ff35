//! Pipeline orchestration with explicit stages.
//!
//! Stages run in order: Bronze (ingest), Silver (normalize + dedup),
//! Gold (typing + quality checks). Each stage consults the cache
//! controller first and returns a typed report; timings live in a
//! caller-owned [`PipelineMetrics`], never in process-wide state.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, info_span};

use medallion_ingest::{RawTable, ReadOptions, read_table};
use medallion_model::{PipelineMetrics, Stage};
use medallion_store::{CacheDecision, CachePreference, StageStore};
use medallion_transform::{CoercionWarning, build_gold, build_silver};
use medallion_validate::{QualityReport, check_table};

/// What one Silver/Gold invocation did.
#[derive(Debug)]
pub struct StageReport {
    pub stage: Stage,
    pub decision: CacheDecision,
    pub rows: usize,
    pub secs: f64,
}

/// Full result of one `run` invocation, consumed by the rendering and
/// metrics-recording collaborators.
#[derive(Debug)]
pub struct RunReport {
    pub silver: StageReport,
    pub gold: StageReport,
    pub duplicates_removed: usize,
    pub coercions: Vec<CoercionWarning>,
    /// Quality findings; absent when Gold was reused.
    pub quality: Option<QualityReport>,
    pub metrics: PipelineMetrics,
}

/// Read the source file and replace the Bronze table.
pub fn ingest_bronze(store: &StageStore, source: &Path, delimiter: u8) -> Result<usize> {
    let span = info_span!("bronze", source = %source.display());
    let _guard = span.enter();

    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} rows")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    let RawTable { table, encoding } = read_table(
        source,
        &ReadOptions { delimiter },
        |done, total| {
            bar.set_length(total);
            bar.set_position(done);
        },
    )
    .with_context(|| format!("ingest {}", source.display()))?;
    bar.finish_and_clear();

    store
        .replace(Stage::Bronze, &table)
        .context("persist bronze table")?;
    info!(rows = table.height(), encoding, "bronze table built");
    Ok(table.height())
}

/// Build or reuse Silver from the stored Bronze.
pub fn run_silver(
    store: &StageStore,
    force: bool,
    preference: CachePreference,
) -> Result<(StageReport, usize, Vec<CoercionWarning>)> {
    let span = info_span!("silver");
    let _guard = span.enter();

    if store.decide(Stage::Silver, force, preference) == CacheDecision::Reuse {
        let rows = store.row_count(Stage::Silver).context("inspect silver")?;
        info!(rows, "reusing stored silver table");
        let report = StageReport {
            stage: Stage::Silver,
            decision: CacheDecision::Reuse,
            rows,
            secs: 0.0,
        };
        return Ok((report, 0, Vec::new()));
    }

    let started = Instant::now();
    let bronze = store
        .load_upstream(Stage::Silver)
        .context("load bronze for silver build")?;
    let build = build_silver(&bronze).context("build silver")?;
    store
        .replace(Stage::Silver, &build.table)
        .context("persist silver table")?;
    let report = StageReport {
        stage: Stage::Silver,
        decision: CacheDecision::Rebuild,
        rows: build.table.height(),
        secs: started.elapsed().as_secs_f64(),
    };
    Ok((report, build.duplicates_removed, build.coercions))
}

/// Build or reuse Gold from the stored Silver.
pub fn run_gold(
    store: &StageStore,
    force: bool,
    preference: CachePreference,
) -> Result<(StageReport, Vec<CoercionWarning>, Option<QualityReport>)> {
    let span = info_span!("gold");
    let _guard = span.enter();

    if store.decide(Stage::Gold, force, preference) == CacheDecision::Reuse {
        let rows = store.row_count(Stage::Gold).context("inspect gold")?;
        info!(rows, "reusing stored gold table");
        let report = StageReport {
            stage: Stage::Gold,
            decision: CacheDecision::Reuse,
            rows,
            secs: 0.0,
        };
        return Ok((report, Vec::new(), None));
    }

    let started = Instant::now();
    let silver = store
        .load_upstream(Stage::Gold)
        .context("load silver for gold build")?;
    let build = build_gold(&silver).context("build gold")?;
    let quality = check_table(&build.table);
    store
        .replace(Stage::Gold, &build.table)
        .context("persist gold table")?;
    let report = StageReport {
        stage: Stage::Gold,
        decision: CacheDecision::Rebuild,
        rows: build.table.height(),
        secs: started.elapsed().as_secs_f64(),
    };
    Ok((report, build.coercions, Some(quality)))
}

/// Options for one full pipeline run.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub delimiter: u8,
    pub force: bool,
    pub force_gold: bool,
    pub on_existing: CachePreference,
}

/// Run Bronze (optionally), Silver and Gold in order.
///
/// A freshly rebuilt upstream forces the downstream rebuild so stored
/// tables never go stale silently; otherwise the collaborator's
/// on-existing preference decides.
pub fn run_pipeline(
    store: &StageStore,
    source: Option<&Path>,
    options: &RunOptions,
) -> Result<RunReport> {
    let bronze_rebuilt = match source {
        Some(path) => {
            ingest_bronze(store, path, options.delimiter)?;
            true
        }
        None => {
            if !store.exists(Stage::Bronze) {
                bail!("no source file selected and no stored bronze table");
            }
            false
        }
    };
    let bronze_rows = store.row_count(Stage::Bronze).context("inspect bronze")?;

    let force_silver = options.force || bronze_rebuilt;
    let (silver, duplicates_removed, mut coercions) =
        run_silver(store, force_silver, options.on_existing)?;

    let force_gold =
        options.force || options.force_gold || silver.decision == CacheDecision::Rebuild;
    let (gold, gold_coercions, quality) = run_gold(store, force_gold, options.on_existing)?;
    coercions.extend(gold_coercions);

    let metrics = PipelineMetrics {
        bronze_rows,
        silver_rows: silver.rows,
        gold_rows: gold.rows,
        silver_secs: silver.secs,
        gold_secs: gold.secs,
    };
    Ok(RunReport {
        silver,
        gold,
        duplicates_removed,
        coercions,
        quality,
        metrics,
    })
}
