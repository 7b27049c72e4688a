//! SQL rendering for role membership operations

use crate::catalog::id::DbObjectId;
use crate::diff::operations::MembershipOperation;
use crate::render::{RenderedSql, Safety, SqlRenderer, quote_ident};

impl SqlRenderer for MembershipOperation {
    fn to_sql(&self) -> Vec<RenderedSql> {
        match self {
            MembershipOperation::Grant { membership } => vec![RenderedSql {
                sql: format!(
                    "GRANT {} TO {}{};",
                    quote_ident(&membership.role),
                    quote_ident(&membership.member),
                    if membership.admin_option {
                        " WITH ADMIN OPTION"
                    } else {
                        ""
                    }
                ),
                safety: Safety::Safe,
            }],
            MembershipOperation::Revoke { membership } => vec![RenderedSql {
                sql: format!(
                    "REVOKE {} FROM {};",
                    quote_ident(&membership.role),
                    quote_ident(&membership.member)
                ),
                safety: Safety::Destructive,
            }],
        }
    }

    fn db_object_id(&self) -> DbObjectId {
        match self {
            MembershipOperation::Grant { membership } | MembershipOperation::Revoke { membership } => {
                DbObjectId::Membership {
                    role: membership.role.clone(),
                    member: membership.member.clone(),
                }
            }
        }
    }

    fn is_destructive(&self) -> bool {
        matches!(self, MembershipOperation::Revoke { .. })
    }
}
