use crate::catalog::collation::Collation;
use crate::diff::comment_utils;
use crate::diff::operations::{CollationIdentifier, CollationOperation, MigrationStep};

/// Diff a single collation
pub fn diff(old: Option<&Collation>, new: Option<&Collation>) -> Vec<MigrationStep> {
    match (old, new) {
        (None, Some(new_coll)) => vec![MigrationStep::Collation(CollationOperation::Create {
            collation: Box::new(new_coll.clone()),
        })],
        (Some(old_coll), None) => vec![MigrationStep::Collation(CollationOperation::Drop {
            identifier: CollationIdentifier {
                schema: old_coll.schema.clone(),
                name: old_coll.name.clone(),
            },
        })],
        (Some(old_coll), Some(new_coll)) => {
            let mut steps = Vec::new();
            if old_coll.locale != new_coll.locale
                || old_coll.provider != new_coll.provider
                || old_coll.deterministic != new_coll.deterministic
            {
                steps.push(MigrationStep::Collation(CollationOperation::Replace {
                    old_collation: Box::new(old_coll.clone()),
                    new_collation: Box::new(new_coll.clone()),
                }));
            }
            let comment_ops = comment_utils::handle_comment_diff(Some(old_coll), Some(new_coll), || {
                CollationIdentifier {
                    schema: new_coll.schema.clone(),
                    name: new_coll.name.clone(),
                }
            });
            for comment_op in comment_ops {
                steps.push(MigrationStep::Collation(CollationOperation::Comment(
                    comment_op,
                )));
            }
            steps
        }
        (None, None) => vec![],
    }
}
