use crate::diff::comment_utils;
use crate::catalog::language::Language;
use crate::diff::operations::{LanguageIdentifier, LanguageOperation, MigrationStep};

/// Diff a single procedural language
pub fn diff(old: Option<&Language>, new: Option<&Language>) -> Vec<MigrationStep> {
    match (old, new) {
        (None, Some(new_lang)) => vec![MigrationStep::Language(LanguageOperation::Create {
            language: new_lang.clone(),
        })],
        (Some(old_lang), None) => vec![MigrationStep::Language(LanguageOperation::Drop {
            name: old_lang.name.clone(),
        })],
        (Some(old_lang), Some(new_lang)) => {
            let mut steps = Vec::new();
            if old_lang.owner != new_lang.owner {
                steps.push(MigrationStep::Language(LanguageOperation::AlterOwner {
                    name: new_lang.name.clone(),
                    owner: new_lang.owner.clone(),
                }));
            }
            let comment_ops = comment_utils::handle_comment_diff(Some(old_lang), Some(new_lang), || {
                LanguageIdentifier {
                    name: new_lang.name.clone(),
                }
            });
            for comment_op in comment_ops {
                steps.push(MigrationStep::Language(LanguageOperation::Comment(
                    comment_op,
                )));
            }
            steps
        }
        (None, None) => vec![],
    }
}
