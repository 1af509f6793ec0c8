//! Migration-history reconciliation
//!
//! Folds the ordered list of per-release migration directives into the
//! single cumulative descriptor the platform deploy API accepts. Within one
//! directive the application order is fixed: deletions, then renames, then
//! introductions. Swapping rename and delete changes outcomes on histories
//! that touch the same class in adjacent directives.

use worker_packager_sdk::migrations::{MigrationDescriptor, MigrationDirective, RenamedClass};

/// Working record for one class identity inside the visibility window.
#[derive(Debug)]
struct ClassState {
    /// Name the class had when it was introduced
    introduced_as: String,

    /// Name the class carries now
    current_name: String,

    /// Whether the class has been renamed since its introduction
    renamed: bool,

    /// Whether a storage transfer format change applies
    transferred: bool,
}

/// Fold migration directives, oldest first, into one cumulative descriptor.
///
/// Returns `None` for an absent or empty history, and for a history that
/// folds down to nothing; the caller must omit the migration field entirely
/// in that case rather than emit an empty descriptor.
///
/// Histories may legitimately be incomplete: renames of classes never seen
/// here and deletes of already-deleted classes are no-ops, not errors.
pub fn merge(directives: Option<&[MigrationDirective]>) -> Option<MigrationDescriptor> {
    let directives = directives?;
    if directives.is_empty() {
        return None;
    }

    // Insertion order doubles as introduction order.
    let mut live: Vec<ClassState> = Vec::new();
    let mut deleted: Vec<String> = Vec::new();

    for directive in directives {
        // Deletions first: a class renamed in directive i and deleted in
        // directive i+1 must resolve to deleted.
        for name in &directive.deleted_classes {
            if let Some(pos) = live.iter().position(|c| &c.current_name == name) {
                live.remove(pos);
            }
            if !deleted.contains(name) {
                deleted.push(name.clone());
            }
        }

        for rename in &directive.renamed_classes {
            if rename.from == rename.to {
                continue;
            }
            // A rename targeting a name that is already live is a no-op;
            // platform behavior on such histories is unverified.
            if live.iter().any(|c| c.current_name == rename.to) {
                continue;
            }
            // A rename whose old name was never live here is a no-op; the
            // class may predate the visibility window.
            if let Some(class) = live.iter_mut().find(|c| c.current_name == rename.from) {
                class.current_name = rename.to.clone();
                class.renamed = true;
            }
        }

        for name in &directive.new_classes {
            // Re-introduction after deletion clears the deleted mark.
            deleted.retain(|d| d != name);
            if live.iter().any(|c| &c.current_name == name) {
                continue;
            }
            live.push(ClassState {
                introduced_as: name.clone(),
                current_name: name.clone(),
                renamed: false,
                transferred: false,
            });
        }

        for name in &directive.transferred_classes {
            if let Some(class) = live.iter_mut().find(|c| &c.current_name == name) {
                class.transferred = true;
            }
        }
    }

    let descriptor = MigrationDescriptor {
        new_classes: live
            .iter()
            .filter(|c| !c.renamed)
            .map(|c| c.current_name.clone())
            .collect(),
        renamed_classes: live
            .iter()
            .filter(|c| c.renamed)
            .map(|c| RenamedClass::new(c.introduced_as.clone(), c.current_name.clone()))
            .collect(),
        deleted_classes: deleted,
        transferred_classes: live
            .iter()
            .filter(|c| c.transferred)
            .map(|c| c.current_name.clone())
            .collect(),
    };

    if descriptor.is_empty() {
        None
    } else {
        Some(descriptor)
    }
}
