//! Exported handler derivation
//!
//! Derives the actor classes the current deploy must wire up as addressable
//! handlers from the folded migration descriptor.

use worker_packager_sdk::migrations::MigrationDescriptor;

/// Classes the script must export as addressable handlers.
///
/// Covers every currently-live class: net-new classes in introduction
/// order, then rename targets in introduction order. Deleted classes never
/// appear, and no class is listed under both its old and new name. The
/// order is stable across repeated calls on identical input.
pub fn exported_classes(descriptor: &MigrationDescriptor) -> Vec<String> {
    let mut classes =
        Vec::with_capacity(descriptor.new_classes.len() + descriptor.renamed_classes.len());

    for name in &descriptor.new_classes {
        if !classes.contains(name) {
            classes.push(name.clone());
        }
    }
    for rename in &descriptor.renamed_classes {
        if !classes.contains(&rename.to) {
            classes.push(rename.to.clone());
        }
    }

    classes
}

#[cfg(test)]
mod tests {
    use super::*;
    use worker_packager_sdk::migrations::RenamedClass;

    #[test]
    fn test_exported_classes_cover_new_and_renamed() {
        let descriptor = MigrationDescriptor {
            new_classes: vec!["A".to_string(), "B".to_string()],
            renamed_classes: vec![RenamedClass::new("Old", "C")],
            deleted_classes: vec!["Gone".to_string()],
            ..Default::default()
        };
        assert_eq!(exported_classes(&descriptor), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_exported_classes_empty_descriptor() {
        assert!(exported_classes(&MigrationDescriptor::default()).is_empty());
    }

    #[test]
    fn test_exported_classes_never_include_deleted() {
        let descriptor = MigrationDescriptor {
            deleted_classes: vec!["A".to_string()],
            ..Default::default()
        };
        assert!(exported_classes(&descriptor).is_empty());
    }

    #[test]
    fn test_exported_classes_deduplicate() {
        let descriptor = MigrationDescriptor {
            new_classes: vec!["A".to_string()],
            renamed_classes: vec![RenamedClass::new("Old", "A")],
            ..Default::default()
        };
        assert_eq!(exported_classes(&descriptor), vec!["A"]);
    }
}
