//! Directory-backed store holding the three named stage tables.

use std::fs;
use std::path::{Path, PathBuf};

use medallion_model::{Stage, Table};

use crate::error::{Result, StoreError};

/// Holds exactly three named slots (`bronze`, `silver`, `gold`), one JSON
/// file per stage. The store is exclusively owned by the pipeline
/// process; replacement is write-temp-then-rename so a rebuild never
/// leaves a half-written table visible.
#[derive(Debug, Clone)]
pub struct StageStore {
    root: PathBuf,
}

impl StageStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| StoreError::Io {
            path: root.clone(),
            source: e,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn table_path(&self, stage: Stage) -> PathBuf {
        self.root.join(format!("{stage}.json"))
    }

    /// Whether a table is present for the given stage.
    pub fn exists(&self, stage: Stage) -> bool {
        self.table_path(stage).is_file()
    }

    /// Load a stage table, failing when absent.
    pub fn load(&self, stage: Stage) -> Result<Table> {
        let path = self.table_path(stage);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::MissingStage { stage });
            }
            Err(e) => return Err(StoreError::Io { path, source: e }),
        };
        serde_json::from_slice(&bytes).map_err(|e| StoreError::Serde { stage, source: e })
    }

    /// Load the single upstream layer a stage derives from.
    ///
    /// An absent upstream is a schema error naming both stages.
    pub fn load_upstream(&self, stage: Stage) -> Result<Table> {
        let upstream = stage.upstream().ok_or(StoreError::NoUpstream { stage })?;
        match self.load(upstream) {
            Ok(table) => Ok(table),
            Err(StoreError::MissingStage { .. }) => {
                Err(StoreError::MissingUpstream { stage, upstream })
            }
            Err(e) => Err(e),
        }
    }

    /// Drop-and-replace the stage's table atomically.
    pub fn replace(&self, stage: Stage, table: &Table) -> Result<()> {
        let path = self.table_path(stage);
        let tmp = self.root.join(format!(".{stage}.json.tmp"));
        let bytes =
            serde_json::to_vec(table).map_err(|e| StoreError::Serde { stage, source: e })?;
        fs::write(&tmp, bytes).map_err(|e| StoreError::Io {
            path: tmp.clone(),
            source: e,
        })?;
        fs::rename(&tmp, &path).map_err(|e| StoreError::Io { path, source: e })?;
        tracing::info!(stage = %stage, rows = table.height(), "stage table replaced");
        Ok(())
    }

    /// Stored row count, used when a cache reuse skips recomputation.
    pub fn row_count(&self, stage: Stage) -> Result<usize> {
        Ok(self.load(stage)?.height())
    }
}
