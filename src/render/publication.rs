//! SQL rendering for logical replication publication operations

use crate::catalog::id::DbObjectId;
use crate::diff::operations::PublicationOperation;
use crate::render::{RenderedSql, Safety, SqlRenderer, quote_ident};

fn publish_clause(insert: bool, update: bool, delete: bool, truncate: bool) -> String {
    let mut actions = Vec::new();
    if insert {
        actions.push("insert");
    }
    if update {
        actions.push("update");
    }
    if delete {
        actions.push("delete");
    }
    if truncate {
        actions.push("truncate");
    }
    actions.join(", ")
}

impl SqlRenderer for PublicationOperation {
    fn to_sql(&self) -> Vec<RenderedSql> {
        match self {
            PublicationOperation::Create { publication } => {
                let mut sql = format!("CREATE PUBLICATION {}", quote_ident(&publication.name));
                if publication.all_tables {
                    sql.push_str(" FOR ALL TABLES");
                } else if !publication.tables.is_empty() {
                    sql.push_str(&format!(
                        " FOR TABLE {}",
                        publication
                            .tables
                            .iter()
                            .map(|t| t
                                .split_once('.')
                                .map(|(s, n)| format!("{}.{}", quote_ident(s), quote_ident(n)))
                                .unwrap_or_else(|| quote_ident(t)))
                            .collect::<Vec<_>>()
                            .join(", ")
                    ));
                }
                sql.push_str(&format!(
                    " WITH (publish = '{}');",
                    publish_clause(
                        publication.insert,
                        publication.update,
                        publication.delete,
                        publication.truncate
                    )
                ));
                vec![RenderedSql {
                    sql,
                    safety: Safety::Safe,
                }]
            }
            PublicationOperation::Drop { name } => vec![RenderedSql {
                sql: format!("DROP PUBLICATION {};", quote_ident(name)),
                safety: Safety::Destructive,
            }],
            PublicationOperation::AlterOwner { name, owner } => vec![RenderedSql {
                sql: format!(
                    "ALTER PUBLICATION {} OWNER TO {};",
                    quote_ident(name),
                    quote_ident(owner)
                ),
                safety: Safety::Safe,
            }],
            PublicationOperation::AlterPublish {
                name,
                insert,
                update,
                delete,
                truncate,
            } => vec![RenderedSql {
                sql: format!(
                    "ALTER PUBLICATION {} SET (publish = '{}');",
                    quote_ident(name),
                    publish_clause(*insert, *update, *delete, *truncate)
                ),
                safety: Safety::Safe,
            }],
            PublicationOperation::SetTables { name, add, drop } => {
                let mut statements = Vec::new();
                for t in drop {
                    if let Some((schema, table)) = t.split_once('.') {
                        statements.push(RenderedSql {
                            sql: format!(
                                "ALTER PUBLICATION {} DROP TABLE {}.{};",
                                quote_ident(name),
                                quote_ident(schema),
                                quote_ident(table)
                            ),
                            safety: Safety::Safe,
                        });
                    }
                }
                for t in add {
                    if let Some((schema, table)) = t.split_once('.') {
                        statements.push(RenderedSql {
                            sql: format!(
                                "ALTER PUBLICATION {} ADD TABLE {}.{};",
                                quote_ident(name),
                                quote_ident(schema),
                                quote_ident(table)
                            ),
                            safety: Safety::Safe,
                        });
                    }
                }
                statements
            }
        }
    }

    fn db_object_id(&self) -> DbObjectId {
        let name = match self {
            PublicationOperation::Create { publication } => &publication.name,
            PublicationOperation::Drop { name }
            | PublicationOperation::AlterOwner { name, .. }
            | PublicationOperation::AlterPublish { name, .. }
            | PublicationOperation::SetTables { name, .. } => name,
        };
        DbObjectId::Publication { name: name.clone() }
    }

    fn is_destructive(&self) -> bool {
        matches!(self, PublicationOperation::Drop { .. })
    }
}
