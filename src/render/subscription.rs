//! SQL rendering for logical replication subscription operations

use crate::catalog::id::DbObjectId;
use crate::diff::operations::SubscriptionOperation;
use crate::render::{RenderedSql, Safety, SqlRenderer, quote_ident};

impl SqlRenderer for SubscriptionOperation {
    fn to_sql(&self) -> Vec<RenderedSql> {
        match self {
            SubscriptionOperation::Drop { name } => vec![RenderedSql {
                sql: format!("DROP SUBSCRIPTION {};", quote_ident(name)),
                safety: Safety::Destructive,
            }],
            SubscriptionOperation::AlterOwner { name, owner } => vec![RenderedSql {
                sql: format!(
                    "ALTER SUBSCRIPTION {} OWNER TO {};",
                    quote_ident(name),
                    quote_ident(owner)
                ),
                safety: Safety::Safe,
            }],
            SubscriptionOperation::AlterEnabled { name, enabled } => vec![RenderedSql {
                sql: format!(
                    "ALTER SUBSCRIPTION {} {};",
                    quote_ident(name),
                    if *enabled { "ENABLE" } else { "DISABLE" }
                ),
                safety: Safety::Safe,
            }],
            SubscriptionOperation::SetPublications { name, publications } => vec![RenderedSql {
                sql: format!(
                    "ALTER SUBSCRIPTION {} SET PUBLICATION {};",
                    quote_ident(name),
                    publications
                        .iter()
                        .map(|p| quote_ident(p))
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
                safety: Safety::Safe,
            }],
        }
    }

    fn db_object_id(&self) -> DbObjectId {
        let name = match self {
            SubscriptionOperation::Drop { name }
            | SubscriptionOperation::AlterOwner { name, .. }
            | SubscriptionOperation::AlterEnabled { name, .. }
            | SubscriptionOperation::SetPublications { name, .. } => name,
        };
        DbObjectId::Subscription { name: name.clone() }
    }

    fn is_destructive(&self) -> bool {
        matches!(self, SubscriptionOperation::Drop { .. })
    }
}
