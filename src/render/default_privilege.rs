//! SQL rendering for ALTER DEFAULT PRIVILEGES operations

use crate::catalog::id::DbObjectId;
use crate::diff::operations::DefaultPrivilegeOperation;
use crate::render::{RenderedSql, Safety, SqlRenderer, quote_ident};

fn for_clause(role: &str, schema: &Option<String>) -> String {
    match schema {
        Some(schema) => format!(
            "FOR ROLE {} IN SCHEMA {}",
            quote_ident(role),
            quote_ident(schema)
        ),
        None => format!("FOR ROLE {}", quote_ident(role)),
    }
}

impl SqlRenderer for DefaultPrivilegeOperation {
    fn to_sql(&self) -> Vec<RenderedSql> {
        match self {
            DefaultPrivilegeOperation::Grant { acl } => vec![RenderedSql {
                sql: format!(
                    "ALTER DEFAULT PRIVILEGES {} GRANT {} ON {}S TO {}{};",
                    for_clause(&acl.role, &acl.schema),
                    acl.privileges.join(", "),
                    acl.objtype.to_uppercase(),
                    quote_ident(&acl.grantee),
                    if acl.with_grant_option {
                        " WITH GRANT OPTION"
                    } else {
                        ""
                    }
                ),
                safety: Safety::Safe,
            }],
            DefaultPrivilegeOperation::Revoke { acl } => vec![RenderedSql {
                sql: format!(
                    "ALTER DEFAULT PRIVILEGES {} REVOKE {} ON {}S FROM {};",
                    for_clause(&acl.role, &acl.schema),
                    acl.privileges.join(", "),
                    acl.objtype.to_uppercase(),
                    quote_ident(&acl.grantee)
                ),
                safety: Safety::Destructive,
            }],
        }
    }

    fn db_object_id(&self) -> DbObjectId {
        let acl = match self {
            DefaultPrivilegeOperation::Grant { acl } | DefaultPrivilegeOperation::Revoke { acl } => acl,
        };
        DbObjectId::DefaultAcl {
            role: acl.role.clone(),
            schema: acl.schema.clone(),
            objtype: acl.objtype.clone(),
            grantee: acl.grantee.clone(),
        }
    }

    fn is_destructive(&self) -> bool {
        matches!(self, DefaultPrivilegeOperation::Revoke { .. })
    }
}
