/// Row counts and timings collected across one pipeline run.
///
/// Owned by the caller that orchestrates the stages; stage builders never
/// keep process-wide timing state. Reused stages contribute their stored
/// row count with a zero duration.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PipelineMetrics {
    pub bronze_rows: usize,
    pub silver_rows: usize,
    pub gold_rows: usize,
    pub silver_secs: f64,
    pub gold_secs: f64,
}

impl PipelineMetrics {
    pub fn total_secs(&self) -> f64 {
        self.silver_secs + self.gold_secs
    }

    /// Percentage of Bronze rows eliminated as duplicates by the Silver
    /// build. Zero when Bronze is empty.
    pub fn duplicate_pct(&self) -> f64 {
        if self.bronze_rows == 0 {
            0.0
        } else {
            100.0 * (self.bronze_rows - self.silver_rows) as f64 / self.bronze_rows as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_pct_handles_empty_bronze() {
        let metrics = PipelineMetrics::default();
        assert_eq!(metrics.duplicate_pct(), 0.0);
    }

    #[test]
    fn duplicate_pct_reports_elimination() {
        let metrics = PipelineMetrics {
            bronze_rows: 200,
            silver_rows: 150,
            ..PipelineMetrics::default()
        };
        assert!((metrics.duplicate_pct() - 25.0).abs() < f64::EPSILON);
    }
}
