use crate::catalog::extension::Extension;
use crate::diff::comment_utils;
use crate::diff::operations::{ExtensionIdentifier, ExtensionOperation, MigrationStep};

/// Diff a single extension
pub fn diff(old: Option<&Extension>, new: Option<&Extension>) -> Vec<MigrationStep> {
    match (old, new) {
        // CREATE new extension
        (None, Some(new_extension)) => {
            vec![MigrationStep::Extension(ExtensionOperation::Create {
                extension: new_extension.clone(),
            })]
        }

        // DROP old extension
        (Some(old_extension), None) => {
            let identifier = ExtensionIdentifier::new(old_extension.name.clone());
            vec![MigrationStep::Extension(ExtensionOperation::Drop {
                identifier,
            })]
        }

        // Extensions don't support modification - they're either present or not
        // If anything differs (version, schema), we treat it as a comment-only change
        // since extensions can't be "altered" - you have to drop and recreate
        (Some(old_extension), Some(new_extension)) => {
            let mut steps = Vec::new();

            // Only comments can change for existing extensions
            let comment_ops = comment_utils::handle_comment_diff(
                Some(old_extension),
                Some(new_extension),
                || ExtensionIdentifier::from_extension(new_extension),
            );
            for comment_op in comment_ops {
                steps.push(MigrationStep::Extension(ExtensionOperation::Comment(
                    comment_op,
                )));
            }

            steps
        }

        // No change
        (None, None) => vec![],
    }
}
