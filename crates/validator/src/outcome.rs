//! The tri-state validation result.

/// Result of checking that a referenced entity exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The remote service answered with a success status.
    Valid,
    /// The remote service answered 404.
    NotFound,
    /// The remote service could not be asked or gave an unusable answer.
    Unreachable(String),
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }

    /// Metric label for this outcome.
    pub fn label(&self) -> &'static str {
        match self {
            ValidationOutcome::Valid => "valid",
            ValidationOutcome::NotFound => "not_found",
            ValidationOutcome::Unreachable(_) => "unreachable",
        }
    }

    /// Whether the remote service answered at all.
    pub fn reached_dependency(&self) -> bool {
        !matches!(self, ValidationOutcome::Unreachable(_))
    }
}

impl std::fmt::Display for ValidationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationOutcome::Valid => write!(f, "valid"),
            ValidationOutcome::NotFound => write!(f, "not found"),
            ValidationOutcome::Unreachable(reason) => write!(f, "unreachable: {reason}"),
        }
    }
}
