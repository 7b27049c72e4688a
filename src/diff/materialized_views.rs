use crate::catalog::materialized_view::MaterializedView;
use crate::diff::comment_utils;
use crate::diff::operations::{MaterializedViewIdentifier, MaterializedViewOperation, MigrationStep};

/// Diff a single materialized view. Unlike a plain view, a materialized view's query can't be
/// replaced in place (no `CREATE OR REPLACE MATERIALIZED VIEW`), so any definition change is a
/// drop + create.
pub fn diff(old: Option<&MaterializedView>, new: Option<&MaterializedView>) -> Vec<MigrationStep> {
    match (old, new) {
        (None, Some(n)) => {
            let mut steps = vec![MigrationStep::MaterializedView(
                MaterializedViewOperation::Create {
                    schema: n.schema.clone(),
                    name: n.name.clone(),
                    definition: n.definition.clone(),
                },
            )];

            if let Some(comment_op) = comment_utils::handle_comment_creation(
                &n.comment,
                MaterializedViewIdentifier {
                    schema: n.schema.clone(),
                    name: n.name.clone(),
                },
            ) {
                steps.push(MigrationStep::MaterializedView(
                    MaterializedViewOperation::Comment(comment_op),
                ));
            }

            steps
        }
        (Some(o), None) => {
            vec![MigrationStep::MaterializedView(
                MaterializedViewOperation::Drop {
                    schema: o.schema.clone(),
                    name: o.name.clone(),
                },
            )]
        }
        (Some(o), Some(n)) => {
            let mut steps = Vec::new();

            if o.definition != n.definition {
                steps.push(MigrationStep::MaterializedView(
                    MaterializedViewOperation::Drop {
                        schema: o.schema.clone(),
                        name: o.name.clone(),
                    },
                ));
                steps.push(MigrationStep::MaterializedView(
                    MaterializedViewOperation::Create {
                        schema: n.schema.clone(),
                        name: n.name.clone(),
                        definition: n.definition.clone(),
                    },
                ));

                if let Some(comment_op) = comment_utils::handle_comment_creation(
                    &n.comment,
                    MaterializedViewIdentifier {
                        schema: n.schema.clone(),
                        name: n.name.clone(),
                    },
                ) {
                    steps.push(MigrationStep::MaterializedView(
                        MaterializedViewOperation::Comment(comment_op),
                    ));
                }
            } else {
                let comment_ops = comment_utils::handle_comment_diff(Some(o), Some(n), || {
                    MaterializedViewIdentifier {
                        schema: n.schema.clone(),
                        name: n.name.clone(),
                    }
                });
                for comment_op in comment_ops {
                    steps.push(MigrationStep::MaterializedView(
                        MaterializedViewOperation::Comment(comment_op),
                    ));
                }
            }

            steps
        }
        (None, None) => Vec::new(),
    }
}
