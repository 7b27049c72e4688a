use crate::catalog::default_privilege::DefaultAcl;
use crate::diff::operations::{DefaultPrivilegeOperation, MigrationStep};

/// Diff a single default-privilege entry, keyed by (role, schema, objtype, grantee). Since the
/// key already pins every dimension but the privilege list and grant option, a change to either
/// is rendered as a full revoke-then-regrant rather than incremental GRANT/REVOKE statements.
pub fn diff(old: Option<&DefaultAcl>, new: Option<&DefaultAcl>) -> Vec<MigrationStep> {
    match (old, new) {
        (None, Some(new_acl)) => vec![MigrationStep::DefaultPrivilege(
            DefaultPrivilegeOperation::Grant {
                acl: Box::new(new_acl.clone()),
            },
        )],
        (Some(old_acl), None) => vec![MigrationStep::DefaultPrivilege(
            DefaultPrivilegeOperation::Revoke {
                acl: Box::new(old_acl.clone()),
            },
        )],
        (Some(old_acl), Some(new_acl)) => {
            if old_acl.privileges == new_acl.privileges
                && old_acl.with_grant_option == new_acl.with_grant_option
            {
                vec![]
            } else {
                vec![
                    MigrationStep::DefaultPrivilege(DefaultPrivilegeOperation::Revoke {
                        acl: Box::new(old_acl.clone()),
                    }),
                    MigrationStep::DefaultPrivilege(DefaultPrivilegeOperation::Grant {
                        acl: Box::new(new_acl.clone()),
                    }),
                ]
            }
        }
        (None, None) => vec![],
    }
}
