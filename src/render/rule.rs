//! SQL rendering for rewrite rule operations

use crate::catalog::id::DbObjectId;
use crate::diff::operations::RuleOperation;
use crate::render::{RenderedSql, Safety, SqlRenderer, quote_ident};

impl SqlRenderer for RuleOperation {
    fn to_sql(&self) -> Vec<RenderedSql> {
        match self {
            RuleOperation::Create { rule } => vec![RenderedSql {
                sql: format!("{};", rule.definition.trim_end_matches(';')),
                safety: Safety::Safe,
            }],
            RuleOperation::Drop {
                schema,
                table,
                name,
            } => vec![RenderedSql {
                sql: format!(
                    "DROP RULE {} ON {}.{};",
                    quote_ident(name),
                    quote_ident(schema),
                    quote_ident(table)
                ),
                safety: Safety::Destructive,
            }],
            RuleOperation::Replace { old_rule, new_rule } => vec![
                RenderedSql {
                    sql: format!(
                        "DROP RULE {} ON {}.{};",
                        quote_ident(&old_rule.name),
                        quote_ident(&old_rule.schema),
                        quote_ident(&old_rule.table)
                    ),
                    safety: Safety::Destructive,
                },
                RenderedSql {
                    sql: format!("{};", new_rule.definition.trim_end_matches(';')),
                    safety: Safety::Safe,
                },
            ],
        }
    }

    fn db_object_id(&self) -> DbObjectId {
        match self {
            RuleOperation::Create { rule } => DbObjectId::Rule {
                schema: rule.schema.clone(),
                table: rule.table.clone(),
                name: rule.name.clone(),
            },
            RuleOperation::Drop {
                schema,
                table,
                name,
            } => DbObjectId::Rule {
                schema: schema.clone(),
                table: table.clone(),
                name: name.clone(),
            },
            RuleOperation::Replace { new_rule, .. } => DbObjectId::Rule {
                schema: new_rule.schema.clone(),
                table: new_rule.table.clone(),
                name: new_rule.name.clone(),
            },
        }
    }

    fn is_destructive(&self) -> bool {
        matches!(self, RuleOperation::Drop { .. } | RuleOperation::Replace { .. })
    }
}
