//! In-memory validator for tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use common::ComponentStatus;

use crate::{DependencyValidator, Reachability, ValidationOutcome};

#[derive(Debug, Default)]
struct InMemoryValidatorState {
    known: HashSet<String>,
    unreachable: bool,
    calls: usize,
}

/// Validator backed by a set of known IDs.
///
/// Clones share state, so a test can keep a handle after moving one into a
/// service and then inspect `call_count` or flip `set_unreachable`.
#[derive(Debug, Clone)]
pub struct InMemoryDependencyValidator {
    dependency: String,
    resource: String,
    state: Arc<Mutex<InMemoryValidatorState>>,
    reachability: Reachability,
}

impl InMemoryDependencyValidator {
    /// Creates a validator for the category dependency that knows no IDs.
    pub fn categories() -> Self {
        Self::new("category_service", "category")
    }

    /// Creates a validator for the product dependency that knows no IDs.
    pub fn products() -> Self {
        Self::new("product_service", "product")
    }

    pub fn new(dependency: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            dependency: dependency.into(),
            resource: resource.into(),
            state: Arc::default(),
            reachability: Reachability::new(),
        }
    }

    fn state(&self) -> MutexGuard<'_, InMemoryValidatorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers an ID as existing.
    pub fn insert(&self, id: impl Into<String>) {
        self.state().known.insert(id.into());
    }

    /// Forgets an ID, as if the owning service deleted it.
    pub fn remove(&self, id: &str) {
        self.state().known.remove(id);
    }

    /// Makes every subsequent validation and probe report the dependency as down.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.state().unreachable = unreachable;
    }

    /// Number of `validate` calls made so far.
    pub fn call_count(&self) -> usize {
        self.state().calls
    }
}

#[async_trait]
impl DependencyValidator for InMemoryDependencyValidator {
    fn dependency(&self) -> &str {
        &self.dependency
    }

    fn resource(&self) -> &str {
        &self.resource
    }

    async fn validate(&self, id: &str) -> ValidationOutcome {
        let outcome = {
            let mut state = self.state();
            state.calls += 1;

            if state.unreachable {
                ValidationOutcome::Unreachable(format!(
                    "timed out contacting {}",
                    self.dependency
                ))
            } else if state.known.contains(id) {
                ValidationOutcome::Valid
            } else {
                ValidationOutcome::NotFound
            }
        };

        self.reachability.record_outcome(&outcome);
        outcome
    }

    async fn probe(&self) -> ComponentStatus {
        let status = if self.state().unreachable {
            ComponentStatus::Down
        } else {
            ComponentStatus::Up
        };
        self.reachability.record(status);
        status
    }

    fn last_known(&self) -> ComponentStatus {
        self.reachability.last_known()
    }
}
