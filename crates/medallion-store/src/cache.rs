//! Per-stage reuse-or-rebuild decisions.

use medallion_model::Stage;

use crate::store::StageStore;

/// Outcome of a cache check for one stage invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheDecision {
    /// Keep the stored table; downstream recomputation is skipped.
    Reuse,
    /// Rebuild the stage from its upstream layer.
    Rebuild,
}

/// Collaborator-supplied choice applied when a stored table exists and no
/// rebuild was forced. The controller never silently picks one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePreference {
    Reuse,
    Rebuild,
}

/// Decide whether a stage is reused or rebuilt.
///
/// Force always rebuilds; a missing target always rebuilds; otherwise the
/// collaborator's preference is returned verbatim.
pub fn decide(force: bool, exists: bool, preference: CachePreference) -> CacheDecision {
    if force || !exists {
        return CacheDecision::Rebuild;
    }
    match preference {
        CachePreference::Reuse => CacheDecision::Reuse,
        CachePreference::Rebuild => CacheDecision::Rebuild,
    }
}

impl StageStore {
    /// [`decide`] against this store's view of the stage.
    pub fn decide(&self, stage: Stage, force: bool, preference: CachePreference) -> CacheDecision {
        let decision = decide(force, self.exists(stage), preference);
        tracing::debug!(stage = %stage, force, ?decision, "cache decision");
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn force_always_rebuilds() {
        for exists in [false, true] {
            for preference in [CachePreference::Reuse, CachePreference::Rebuild] {
                assert_eq!(decide(true, exists, preference), CacheDecision::Rebuild);
            }
        }
    }

    #[test]
    fn missing_target_always_rebuilds() {
        assert_eq!(
            decide(false, false, CachePreference::Reuse),
            CacheDecision::Rebuild
        );
    }

    #[test]
    fn existing_target_defers_to_preference() {
        assert_eq!(
            decide(false, true, CachePreference::Reuse),
            CacheDecision::Reuse
        );
        assert_eq!(
            decide(false, true, CachePreference::Rebuild),
            CacheDecision::Rebuild
        );
    }
}
