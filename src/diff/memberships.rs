use crate::catalog::membership::Membership;
use crate::diff::operations::{MembershipOperation, MigrationStep};

/// Diff a single role membership. Postgres has no `ALTER` for `pg_auth_members`, so a change
/// to `admin_option` is expressed as a revoke followed by a re-grant.
pub fn diff(old: Option<&Membership>, new: Option<&Membership>) -> Vec<MigrationStep> {
    match (old, new) {
        (None, Some(new_m)) => vec![MigrationStep::Membership(MembershipOperation::Grant {
            membership: new_m.clone(),
        })],
        (Some(old_m), None) => vec![MigrationStep::Membership(MembershipOperation::Revoke {
            membership: old_m.clone(),
        })],
        (Some(old_m), Some(new_m)) => {
            if old_m.admin_option == new_m.admin_option {
                vec![]
            } else {
                vec![
                    MigrationStep::Membership(MembershipOperation::Revoke {
                        membership: old_m.clone(),
                    }),
                    MigrationStep::Membership(MembershipOperation::Grant {
                        membership: new_m.clone(),
                    }),
                ]
            }
        }
        (None, None) => vec![],
    }
}
