//! SQL rendering for collation operations

use crate::catalog::id::DbObjectId;
use crate::diff::operations::{CollationOperation, CommentTarget};
use crate::render::{RenderedSql, Safety, SqlRenderer, quote_ident};

impl SqlRenderer for CollationOperation {
    fn to_sql(&self) -> Vec<RenderedSql> {
        match self {
            CollationOperation::Create { collation } => vec![RenderedSql {
                sql: format!(
                    "CREATE COLLATION {}.{} (provider = {}, locale = '{}', deterministic = {});",
                    quote_ident(&collation.schema),
                    quote_ident(&collation.name),
                    collation.provider,
                    collation.locale.replace('\'', "''"),
                    collation.deterministic
                ),
                safety: Safety::Safe,
            }],
            CollationOperation::Drop { identifier } => vec![RenderedSql {
                sql: format!("DROP COLLATION {};", identifier.identifier()),
                safety: Safety::Destructive,
            }],
            CollationOperation::Replace {
                old_collation,
                new_collation,
            } => vec![
                RenderedSql {
                    sql: format!(
                        "DROP COLLATION {}.{};",
                        quote_ident(&old_collation.schema),
                        quote_ident(&old_collation.name)
                    ),
                    safety: Safety::Destructive,
                },
                RenderedSql {
                    sql: format!(
                        "CREATE COLLATION {}.{} (provider = {}, locale = '{}', deterministic = {});",
                        quote_ident(&new_collation.schema),
                        quote_ident(&new_collation.name),
                        new_collation.provider,
                        new_collation.locale.replace('\'', "''"),
                        new_collation.deterministic
                    ),
                    safety: Safety::Safe,
                },
            ],
            CollationOperation::Comment(op) => op.to_sql(),
        }
    }

    fn db_object_id(&self) -> DbObjectId {
        match self {
            CollationOperation::Create { collation } => DbObjectId::Collation {
                schema: collation.schema.clone(),
                name: collation.name.clone(),
            },
            CollationOperation::Drop { identifier } => identifier.db_object_id(),
            CollationOperation::Replace { new_collation, .. } => DbObjectId::Collation {
                schema: new_collation.schema.clone(),
                name: new_collation.name.clone(),
            },
            CollationOperation::Comment(op) => op.db_object_id(),
        }
    }

    fn is_destructive(&self) -> bool {
        matches!(
            self,
            CollationOperation::Drop { .. } | CollationOperation::Replace { .. }
        )
    }
}
