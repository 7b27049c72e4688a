//! SQL rendering for procedural language operations

use crate::catalog::id::DbObjectId;
use crate::diff::operations::LanguageOperation;
use crate::render::{RenderedSql, Safety, SqlRenderer, quote_ident};

impl SqlRenderer for LanguageOperation {
    fn to_sql(&self) -> Vec<RenderedSql> {
        match self {
            LanguageOperation::Create { language } => vec![RenderedSql {
                sql: format!(
                    "CREATE {}LANGUAGE {};",
                    if language.trusted { "TRUSTED " } else { "" },
                    quote_ident(&language.name)
                ),
                safety: Safety::Safe,
            }],
            LanguageOperation::Drop { name } => vec![RenderedSql {
                sql: format!("DROP LANGUAGE {};", quote_ident(name)),
                safety: Safety::Destructive,
            }],
            LanguageOperation::AlterOwner { name, owner } => vec![RenderedSql {
                sql: format!(
                    "ALTER LANGUAGE {} OWNER TO {};",
                    quote_ident(name),
                    quote_ident(owner)
                ),
                safety: Safety::Safe,
            }],
            LanguageOperation::Comment(op) => op.to_sql(),
        }
    }

    fn db_object_id(&self) -> DbObjectId {
        match self {
            LanguageOperation::Create { language } => DbObjectId::Language {
                name: language.name.clone(),
            },
            LanguageOperation::Drop { name } | LanguageOperation::AlterOwner { name, .. } => {
                DbObjectId::Language { name: name.clone() }
            }
            LanguageOperation::Comment(op) => op.db_object_id(),
        }
    }

    fn is_destructive(&self) -> bool {
        matches!(self, LanguageOperation::Drop { .. })
    }
}
