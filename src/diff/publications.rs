use crate::catalog::publication::Publication;
use crate::diff::operations::{MigrationStep, PublicationOperation};

/// Diff a single publication
pub fn diff(old: Option<&Publication>, new: Option<&Publication>) -> Vec<MigrationStep> {
    match (old, new) {
        (None, Some(new_p)) => vec![MigrationStep::Publication(PublicationOperation::Create {
            publication: Box::new(new_p.clone()),
        })],
        (Some(old_p), None) => vec![MigrationStep::Publication(PublicationOperation::Drop {
            name: old_p.name.clone(),
        })],
        (Some(old_p), Some(new_p)) => {
            let mut steps = Vec::new();
            if old_p.owner != new_p.owner {
                steps.push(MigrationStep::Publication(PublicationOperation::AlterOwner {
                    name: new_p.name.clone(),
                    owner: new_p.owner.clone(),
                }));
            }
            if old_p.insert != new_p.insert
                || old_p.update != new_p.update
                || old_p.delete != new_p.delete
                || old_p.truncate != new_p.truncate
            {
                steps.push(MigrationStep::Publication(
                    PublicationOperation::AlterPublish {
                        name: new_p.name.clone(),
                        insert: new_p.insert,
                        update: new_p.update,
                        delete: new_p.delete,
                        truncate: new_p.truncate,
                    },
                ));
            }
            if !new_p.all_tables && old_p.tables != new_p.tables {
                let add: Vec<String> = new_p
                    .tables
                    .iter()
                    .filter(|t| !old_p.tables.contains(t))
                    .cloned()
                    .collect();
                let drop: Vec<String> = old_p
                    .tables
                    .iter()
                    .filter(|t| !new_p.tables.contains(t))
                    .cloned()
                    .collect();
                if !add.is_empty() || !drop.is_empty() {
                    steps.push(MigrationStep::Publication(PublicationOperation::SetTables {
                        name: new_p.name.clone(),
                        add,
                        drop,
                    }));
                }
            }
            steps
        }
        (None, None) => vec![],
    }
}
