use crate::catalog::role::Role;
use crate::diff::operations::{MigrationStep, RoleOperation};

/// Diff a single role
pub fn diff(old: Option<&Role>, new: Option<&Role>) -> Vec<MigrationStep> {
    match (old, new) {
        (None, Some(new_role)) => vec![MigrationStep::Role(RoleOperation::Create {
            role: Box::new(new_role.clone()),
        })],
        (Some(old_role), None) => vec![MigrationStep::Role(RoleOperation::Drop {
            name: old_role.name.clone(),
        })],
        (Some(old_role), Some(new_role)) => {
            if old_role.data_fields_equal(new_role) {
                vec![]
            } else {
                vec![MigrationStep::Role(RoleOperation::Alter {
                    name: new_role.name.clone(),
                    old: Box::new(old_role.clone()),
                    new: Box::new(new_role.clone()),
                })]
            }
        }
        (None, None) => vec![],
    }
}
