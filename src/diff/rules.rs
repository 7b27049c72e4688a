use crate::catalog::rule::Rule;
use crate::diff::operations::{MigrationStep, RuleOperation};

/// Diff a single rewrite rule
pub fn diff(old: Option<&Rule>, new: Option<&Rule>) -> Vec<MigrationStep> {
    match (old, new) {
        (None, Some(new_r)) => vec![MigrationStep::Rule(RuleOperation::Create {
            rule: Box::new(new_r.clone()),
        })],
        (Some(old_r), None) => vec![MigrationStep::Rule(RuleOperation::Drop {
            schema: old_r.schema.clone(),
            table: old_r.table.clone(),
            name: old_r.name.clone(),
        })],
        (Some(old_r), Some(new_r)) => {
            if old_r.definition == new_r.definition {
                vec![]
            } else {
                vec![MigrationStep::Rule(RuleOperation::Replace {
                    old_rule: Box::new(old_r.clone()),
                    new_rule: Box::new(new_r.clone()),
                })]
            }
        }
        (None, None) => vec![],
    }
}
