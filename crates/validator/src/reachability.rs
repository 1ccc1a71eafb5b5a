//! Last-known reachability of a dependency.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use common::ComponentStatus;

use crate::ValidationOutcome;

const UNKNOWN: u8 = 0;
const UP: u8 = 1;
const DOWN: u8 = 2;

/// Shared, lock-free record of whether a dependency answered the last time it
/// was contacted. Clones observe the same value.
#[derive(Debug, Clone, Default)]
pub struct Reachability(Arc<AtomicU8>);

impl Reachability {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, status: ComponentStatus) {
        let raw = match status {
            ComponentStatus::Up => UP,
            ComponentStatus::Down => DOWN,
            ComponentStatus::Unknown => UNKNOWN,
        };
        self.0.store(raw, Ordering::Relaxed);
    }

    /// A 404 still proves the dependency is up.
    pub fn record_outcome(&self, outcome: &ValidationOutcome) {
        if outcome.reached_dependency() {
            self.record(ComponentStatus::Up);
        } else {
            self.record(ComponentStatus::Down);
        }
    }

    pub fn last_known(&self) -> ComponentStatus {
        match self.0.load(Ordering::Relaxed) {
            UP => ComponentStatus::Up,
            DOWN => ComponentStatus::Down,
            _ => ComponentStatus::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unknown() {
        assert_eq!(Reachability::new().last_known(), ComponentStatus::Unknown);
    }

    #[test]
    fn tracks_outcomes() {
        let reachability = Reachability::new();
        let observer = reachability.clone();

        reachability.record_outcome(&ValidationOutcome::NotFound);
        assert_eq!(observer.last_known(), ComponentStatus::Up);

        reachability.record_outcome(&ValidationOutcome::Unreachable("refused".to_string()));
        assert_eq!(observer.last_known(), ComponentStatus::Down);
    }
}
