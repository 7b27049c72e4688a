//! SQL rendering for grant operations

use crate::catalog::id::DbObjectId;
use crate::diff::operations::GrantOperation;
use crate::render::{RenderedSql, SqlRenderer};

impl SqlRenderer for GrantOperation {
    fn to_sql(&self) -> Vec<RenderedSql> {
        match self {
            GrantOperation::Grant { grant } => {
                vec![RenderedSql::new(
                    crate::render::sql::render_grant_statement(grant),
                )]
            }
            GrantOperation::Revoke { grant } => {
                vec![RenderedSql::new(
                    crate::render::sql::render_revoke_statement(grant),
                )]
            }
            GrantOperation::RevokeGrantOption { grant } => {
                vec![RenderedSql::new(
                    crate::render::sql::render_revoke_grant_option_statement(grant),
                )]
            }
        }
    }

    fn db_object_id(&self) -> DbObjectId {
        match self {
            GrantOperation::Grant { grant }
            | GrantOperation::Revoke { grant }
            | GrantOperation::RevokeGrantOption { grant } => DbObjectId::Grant { id: grant.id() },
        }
    }
}
