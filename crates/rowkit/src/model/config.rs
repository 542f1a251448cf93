//! Item manager configuration.

/// How an [`ItemManager`](super::ItemManager) reports removals that are not
/// addressed by index (removal by value, bulk and predicate removal, retain).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RemovalRefresh {
    /// Emit a single [`ChangeEvent::DataSetInvalidated`](super::ChangeEvent::DataSetInvalidated).
    #[default]
    Invalidate,
    /// Diff the list before and after the removal and emit granular events.
    Diff,
}

/// Behavior switches for an item manager.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ManagerConfig {
    /// Report rows that changed position as moves when refreshing.
    pub detect_moves: bool,
    /// Event granularity for value and predicate removals.
    pub removal_refresh: RemovalRefresh,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            detect_moves: true,
            removal_refresh: RemovalRefresh::default(),
        }
    }
}

impl ManagerConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether moves are detected.
    pub fn with_detect_moves(mut self, detect_moves: bool) -> Self {
        self.detect_moves = detect_moves;
        self
    }

    /// Sets how value and predicate removals are reported.
    pub fn with_removal_refresh(mut self, removal_refresh: RemovalRefresh) -> Self {
        self.removal_refresh = removal_refresh;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ManagerConfig::default();
        assert!(config.detect_moves);
        assert_eq!(config.removal_refresh, RemovalRefresh::Invalidate);
    }

    #[test]
    fn test_builder() {
        let config = ManagerConfig::new()
            .with_detect_moves(false)
            .with_removal_refresh(RemovalRefresh::Diff);
        assert!(!config.detect_moves);
        assert_eq!(config.removal_refresh, RemovalRefresh::Diff);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_partial() {
        let config: ManagerConfig = serde_json::from_str(r#"{"removal_refresh":"diff"}"#).unwrap();
        assert!(config.detect_moves);
        assert_eq!(config.removal_refresh, RemovalRefresh::Diff);
    }
}
