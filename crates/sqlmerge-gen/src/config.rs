//! Merge profile configuration.

use crate::operation::MergeKind;
use serde::{Deserialize, Serialize};

/// Which reconciliation statements to emit and how to bind columns.
///
/// Deserializes from JSON with every field optional; missing fields take
/// the [`MergeConfig::full_merge`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Insert source rows absent from the target.
    pub insert: bool,
    /// Update target rows matched by the join key.
    pub update: bool,
    /// Delete target rows absent from the source.
    pub delete: bool,
    /// Fail instead of skipping target columns missing from the source.
    pub strict_column_matching: bool,
}

impl MergeConfig {
    /// Insert, update and delete.
    pub const fn full_merge() -> Self {
        Self {
            insert: true,
            update: true,
            delete: true,
            strict_column_matching: false,
        }
    }

    /// Insert and update; target rows absent from the source are kept.
    pub const fn upsert() -> Self {
        Self {
            insert: true,
            update: true,
            delete: false,
            strict_column_matching: false,
        }
    }

    pub const fn insert(mut self, enabled: bool) -> Self {
        self.insert = enabled;
        self
    }

    pub const fn update(mut self, enabled: bool) -> Self {
        self.update = enabled;
        self
    }

    pub const fn delete(mut self, enabled: bool) -> Self {
        self.delete = enabled;
        self
    }

    pub const fn strict(mut self, strict: bool) -> Self {
        self.strict_column_matching = strict;
        self
    }

    pub const fn is_enabled(&self, kind: MergeKind) -> bool {
        match kind {
            MergeKind::Delete => self.delete,
            MergeKind::Update => self.update,
            MergeKind::Insert => self.insert,
        }
    }

    /// Enabled statement kinds in emission order.
    pub fn enabled_kinds(&self) -> impl Iterator<Item = MergeKind> + '_ {
        MergeKind::ORDER
            .into_iter()
            .filter(move |kind| self.is_enabled(*kind))
    }
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self::full_merge()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets() {
        let full = MergeConfig::full_merge();
        assert!(full.insert && full.update && full.delete);
        assert!(!full.strict_column_matching);
        assert_eq!(MergeConfig::default(), full);

        let upsert = MergeConfig::upsert();
        assert!(upsert.insert && upsert.update && !upsert.delete);
    }

    #[test]
    fn enabled_kinds_follow_emission_order() {
        let kinds: Vec<_> = MergeConfig::full_merge().enabled_kinds().collect();
        assert_eq!(kinds, vec![MergeKind::Delete, MergeKind::Update, MergeKind::Insert]);

        let config = MergeConfig::full_merge().update(false);
        let kinds: Vec<_> = config.enabled_kinds().collect();
        assert_eq!(kinds, vec![MergeKind::Delete, MergeKind::Insert]);

        let none = MergeConfig::upsert().insert(false).update(false);
        assert_eq!(none.enabled_kinds().count(), 0);
    }

    #[test]
    fn deserializes_partial_json() {
        let config: MergeConfig = serde_json::from_str(r#"{"delete": false}"#).unwrap();
        assert_eq!(config, MergeConfig::upsert());

        let config: MergeConfig =
            serde_json::from_str(r#"{"strict_column_matching": true, "insert": false}"#).unwrap();
        assert!(config.strict_column_matching);
        assert!(!config.insert);
        assert!(config.update && config.delete);
    }
}
