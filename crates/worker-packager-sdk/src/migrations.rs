//! Actor-class migration wire types
//!
//! Actor classes evolve release over release through ordered migration
//! directives (class added, renamed, deleted). The platform accepts a single
//! cumulative descriptor per deploy; the packager folds the directive
//! history into a `MigrationDescriptor` before every deploy.

use serde::{Deserialize, Serialize};

/// One release's worth of actor-class lifecycle changes.
///
/// Directives are totally ordered by position in the history, oldest first.
/// Order is load-bearing: a class renamed in one directive and deleted in
/// the next resolves to deleted, not to its new name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MigrationDirective {
    /// Version tag of the release that introduced this directive
    pub tag: String,

    /// Classes newly introduced in this release
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub new_classes: Vec<String>,

    /// Classes renamed in this release
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub renamed_classes: Vec<RenamedClass>,

    /// Classes deleted in this release
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deleted_classes: Vec<String>,

    /// Classes whose underlying storage transfer format changed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transferred_classes: Vec<String>,
}

/// An old-name to new-name rename pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenamedClass {
    pub from: String,
    pub to: String,
}

impl RenamedClass {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// The single folded migration statement submitted with a deploy.
///
/// A class name appears in at most one of the truth lists: net-new,
/// rename target, or deleted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MigrationDescriptor {
    /// Classes introduced and never deleted, under their introduction name
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub new_classes: Vec<String>,

    /// Accumulated rename pairs, oldest surviving name to latest name
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub renamed_classes: Vec<RenamedClass>,

    /// Accumulated deletions, minus classes later re-introduced
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deleted_classes: Vec<String>,

    /// Live classes carrying a storage transfer format change
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transferred_classes: Vec<String>,
}

impl MigrationDescriptor {
    /// True when the descriptor carries no statements at all.
    pub fn is_empty(&self) -> bool {
        self.new_classes.is_empty()
            && self.renamed_classes.is_empty()
            && self.deleted_classes.is_empty()
            && self.transferred_classes.is_empty()
    }
}
