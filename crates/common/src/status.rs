use serde::{Deserialize, Serialize};

/// Reachability of a component as reported by health endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ComponentStatus {
    Up,
    Down,
    /// Never checked.
    #[default]
    Unknown,
}

impl ComponentStatus {
    pub fn is_up(self) -> bool {
        self == ComponentStatus::Up
    }
}

impl std::fmt::Display for ComponentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComponentStatus::Up => write!(f, "UP"),
            ComponentStatus::Down => write!(f, "DOWN"),
            ComponentStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&ComponentStatus::Up).unwrap(),
            "\"UP\""
        );
        assert_eq!(
            serde_json::to_string(&ComponentStatus::Unknown).unwrap(),
            "\"UNKNOWN\""
        );
    }

    #[test]
    fn default_is_unknown() {
        assert_eq!(ComponentStatus::default(), ComponentStatus::Unknown);
        assert!(!ComponentStatus::default().is_up());
    }
}
