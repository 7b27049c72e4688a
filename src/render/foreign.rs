//! SQL rendering for foreign-data infrastructure operations

use crate::catalog::id::DbObjectId;
use crate::diff::operations::{
    ForeignDataWrapperOperation, ForeignServerOperation, ForeignTableOperation,
    UserMappingOperation,
};
use crate::render::{RenderedSql, Safety, SqlRenderer, escape_string, quote_ident};

fn options_clause(options: &[(String, String)]) -> String {
    if options.is_empty() {
        return String::new();
    }
    format!(
        " OPTIONS ({})",
        options
            .iter()
            .map(|(k, v)| format!("{} {}", k, escape_string(v)))
            .collect::<Vec<_>>()
            .join(", ")
    )
}

fn alter_options_clause(
    add: &[(String, String)],
    set: &[(String, String)],
    drop: &[String],
) -> String {
    let mut parts = Vec::new();
    for (k, v) in add {
        parts.push(format!("ADD {} {}", k, escape_string(v)));
    }
    for (k, v) in set {
        parts.push(format!("SET {} {}", k, escape_string(v)));
    }
    for k in drop {
        parts.push(format!("DROP {}", k));
    }
    parts.join(", ")
}

impl SqlRenderer for ForeignDataWrapperOperation {
    fn to_sql(&self) -> Vec<RenderedSql> {
        match self {
            ForeignDataWrapperOperation::Create { fdw } => {
                let mut sql = format!("CREATE FOREIGN DATA WRAPPER {}", quote_ident(&fdw.name));
                if let Some(handler) = &fdw.handler {
                    sql.push_str(&format!(" HANDLER {}", quote_ident(handler)));
                }
                if let Some(validator) = &fdw.validator {
                    sql.push_str(&format!(" VALIDATOR {}", quote_ident(validator)));
                }
                sql.push_str(&options_clause(&fdw.options));
                sql.push(';');
                vec![RenderedSql {
                    sql,
                    safety: Safety::Safe,
                }]
            }
            ForeignDataWrapperOperation::Drop { name } => vec![RenderedSql {
                sql: format!("DROP FOREIGN DATA WRAPPER {};", quote_ident(name)),
                safety: Safety::Destructive,
            }],
            ForeignDataWrapperOperation::SetOptions { name, add, set, drop } => {
                vec![RenderedSql {
                    sql: format!(
                        "ALTER FOREIGN DATA WRAPPER {} OPTIONS ({});",
                        quote_ident(name),
                        alter_options_clause(add, set, drop)
                    ),
                    safety: Safety::Safe,
                }]
            }
            ForeignDataWrapperOperation::Comment(op) => op.to_sql(),
        }
    }

    fn db_object_id(&self) -> DbObjectId {
        let name = match self {
            ForeignDataWrapperOperation::Create { fdw } => &fdw.name,
            ForeignDataWrapperOperation::Drop { name }
            | ForeignDataWrapperOperation::SetOptions { name, .. } => name,
            ForeignDataWrapperOperation::Comment(op) => return op.db_object_id(),
        };
        DbObjectId::ForeignDataWrapper { name: name.clone() }
    }

    fn is_destructive(&self) -> bool {
        matches!(self, ForeignDataWrapperOperation::Drop { .. })
    }
}

impl SqlRenderer for ForeignServerOperation {
    fn to_sql(&self) -> Vec<RenderedSql> {
        match self {
            ForeignServerOperation::Create { server } => {
                let mut sql = format!("CREATE SERVER {}", quote_ident(&server.name));
                if let Some(server_type) = &server.server_type {
                    sql.push_str(&format!(" TYPE {}", escape_string(server_type)));
                }
                if let Some(version) = &server.server_version {
                    sql.push_str(&format!(" VERSION {}", escape_string(version)));
                }
                sql.push_str(&format!(
                    " FOREIGN DATA WRAPPER {}",
                    quote_ident(&server.fdw_name)
                ));
                sql.push_str(&options_clause(&server.options));
                sql.push(';');
                vec![RenderedSql {
                    sql,
                    safety: Safety::Safe,
                }]
            }
            ForeignServerOperation::Drop { name } => vec![RenderedSql {
                sql: format!("DROP SERVER {};", quote_ident(name)),
                safety: Safety::Destructive,
            }],
            ForeignServerOperation::SetOptions { name, add, set, drop } => vec![RenderedSql {
                sql: format!(
                    "ALTER SERVER {} OPTIONS ({});",
                    quote_ident(name),
                    alter_options_clause(add, set, drop)
                ),
                safety: Safety::Safe,
            }],
            ForeignServerOperation::Comment(op) => op.to_sql(),
        }
    }

    fn db_object_id(&self) -> DbObjectId {
        let name = match self {
            ForeignServerOperation::Create { server } => &server.name,
            ForeignServerOperation::Drop { name }
            | ForeignServerOperation::SetOptions { name, .. } => name,
            ForeignServerOperation::Comment(op) => return op.db_object_id(),
        };
        DbObjectId::ForeignServer { name: name.clone() }
    }

    fn is_destructive(&self) -> bool {
        matches!(self, ForeignServerOperation::Drop { .. })
    }
}

impl SqlRenderer for UserMappingOperation {
    fn to_sql(&self) -> Vec<RenderedSql> {
        match self {
            UserMappingOperation::Create { mapping } => vec![RenderedSql {
                sql: format!(
                    "CREATE USER MAPPING FOR {} SERVER {}{};",
                    quote_ident(&mapping.user),
                    quote_ident(&mapping.server),
                    options_clause(&mapping.options)
                ),
                safety: Safety::Safe,
            }],
            UserMappingOperation::Drop { server, user } => vec![RenderedSql {
                sql: format!(
                    "DROP USER MAPPING FOR {} SERVER {};",
                    quote_ident(user),
                    quote_ident(server)
                ),
                safety: Safety::Destructive,
            }],
            UserMappingOperation::SetOptions {
                server,
                user,
                add,
                set,
                drop,
            } => vec![RenderedSql {
                sql: format!(
                    "ALTER USER MAPPING FOR {} SERVER {} OPTIONS ({});",
                    quote_ident(user),
                    quote_ident(server),
                    alter_options_clause(add, set, drop)
                ),
                safety: Safety::Safe,
            }],
        }
    }

    fn db_object_id(&self) -> DbObjectId {
        let (server, user) = match self {
            UserMappingOperation::Create { mapping } => (&mapping.server, &mapping.user),
            UserMappingOperation::Drop { server, user }
            | UserMappingOperation::SetOptions { server, user, .. } => (server, user),
        };
        DbObjectId::UserMapping {
            server: server.clone(),
            user: user.clone(),
        }
    }

    fn is_destructive(&self) -> bool {
        matches!(self, UserMappingOperation::Drop { .. })
    }
}

impl SqlRenderer for ForeignTableOperation {
    fn to_sql(&self) -> Vec<RenderedSql> {
        match self {
            ForeignTableOperation::Create { table } => {
                let columns = table
                    .columns
                    .iter()
                    .map(|c| {
                        format!(
                            "{} {}{}",
                            quote_ident(&c.name),
                            c.data_type,
                            if c.not_null { " NOT NULL" } else { "" }
                        )
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                vec![RenderedSql {
                    sql: format!(
                        "CREATE FOREIGN TABLE {}.{} ({}) SERVER {}{};",
                        quote_ident(&table.schema),
                        quote_ident(&table.name),
                        columns,
                        quote_ident(&table.server),
                        options_clause(&table.options)
                    ),
                    safety: Safety::Safe,
                }]
            }
            ForeignTableOperation::Drop { schema, name } => vec![RenderedSql {
                sql: format!(
                    "DROP FOREIGN TABLE {}.{};",
                    quote_ident(schema),
                    quote_ident(name)
                ),
                safety: Safety::Destructive,
            }],
            ForeignTableOperation::SetOptions {
                schema,
                name,
                add,
                set,
                drop,
            } => vec![RenderedSql {
                sql: format!(
                    "ALTER FOREIGN TABLE {}.{} OPTIONS ({});",
                    quote_ident(schema),
                    quote_ident(name),
                    alter_options_clause(add, set, drop)
                ),
                safety: Safety::Safe,
            }],
            ForeignTableOperation::Comment(op) => op.to_sql(),
        }
    }

    fn db_object_id(&self) -> DbObjectId {
        let (schema, name) = match self {
            ForeignTableOperation::Create { table } => (&table.schema, &table.name),
            ForeignTableOperation::Drop { schema, name }
            | ForeignTableOperation::SetOptions { schema, name, .. } => (schema, name),
            ForeignTableOperation::Comment(op) => return op.db_object_id(),
        };
        DbObjectId::ForeignTable {
            schema: schema.clone(),
            name: name.clone(),
        }
    }

    fn is_destructive(&self) -> bool {
        matches!(self, ForeignTableOperation::Drop { .. })
    }
}
