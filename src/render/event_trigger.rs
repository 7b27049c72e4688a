//! SQL rendering for event trigger operations

use crate::catalog::id::DbObjectId;
use crate::diff::operations::EventTriggerOperation;
use crate::render::{RenderedSql, Safety, SqlRenderer, escape_string, quote_ident};

fn enabled_clause(enabled: &str) -> &'static str {
    match enabled {
        "D" => "DISABLE",
        "R" => "ENABLE REPLICA",
        "A" => "ENABLE ALWAYS",
        _ => "ENABLE",
    }
}

impl SqlRenderer for EventTriggerOperation {
    fn to_sql(&self) -> Vec<RenderedSql> {
        match self {
            EventTriggerOperation::Create { trigger } => {
                let mut statements = vec![RenderedSql {
                    sql: format!(
                        "CREATE EVENT TRIGGER {} ON {} EXECUTE FUNCTION {}.{}(){};",
                        quote_ident(&trigger.name),
                        trigger.event,
                        quote_ident(&trigger.function_schema),
                        quote_ident(&trigger.function_name),
                        if trigger.tags.is_empty() {
                            String::new()
                        } else {
                            format!(
                                " WHEN TAG IN ({})",
                                trigger
                                    .tags
                                    .iter()
                                    .map(|t| escape_string(t))
                                    .collect::<Vec<_>>()
                                    .join(", ")
                            )
                        }
                    ),
                    safety: Safety::Safe,
                }];
                if trigger.enabled != "O" {
                    statements.push(RenderedSql {
                        sql: format!(
                            "ALTER EVENT TRIGGER {} {};",
                            quote_ident(&trigger.name),
                            enabled_clause(&trigger.enabled)
                        ),
                        safety: Safety::Safe,
                    });
                }
                statements
            }
            EventTriggerOperation::Drop { name } => vec![RenderedSql {
                sql: format!("DROP EVENT TRIGGER {};", quote_ident(name)),
                safety: Safety::Destructive,
            }],
            EventTriggerOperation::AlterOwner { name, owner } => vec![RenderedSql {
                sql: format!(
                    "ALTER EVENT TRIGGER {} OWNER TO {};",
                    quote_ident(name),
                    quote_ident(owner)
                ),
                safety: Safety::Safe,
            }],
            EventTriggerOperation::AlterEnabled { name, enabled } => vec![RenderedSql {
                sql: format!(
                    "ALTER EVENT TRIGGER {} {};",
                    quote_ident(name),
                    enabled_clause(enabled)
                ),
                safety: Safety::Safe,
            }],
        }
    }

    fn db_object_id(&self) -> DbObjectId {
        let name = match self {
            EventTriggerOperation::Create { trigger } => &trigger.name,
            EventTriggerOperation::Drop { name }
            | EventTriggerOperation::AlterOwner { name, .. }
            | EventTriggerOperation::AlterEnabled { name, .. } => name,
        };
        DbObjectId::EventTrigger { name: name.clone() }
    }

    fn is_destructive(&self) -> bool {
        matches!(self, EventTriggerOperation::Drop { .. })
    }
}
