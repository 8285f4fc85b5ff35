use std::fmt;

/// One of the three refinement layers of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Bronze,
    Silver,
    Gold,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Bronze => "bronze",
            Stage::Silver => "silver",
            Stage::Gold => "gold",
        }
    }

    /// The single layer this stage may read from.
    ///
    /// Silver derives solely from Bronze and Gold solely from Silver;
    /// no stage reads two hops upstream.
    pub fn upstream(&self) -> Option<Stage> {
        match self {
            Stage::Bronze => None,
            Stage::Silver => Some(Stage::Bronze),
            Stage::Gold => Some(Stage::Silver),
        }
    }

    pub const ALL: [Stage; 3] = [Stage::Bronze, Stage::Silver, Stage::Gold];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
