//! SQL rendering for role operations

use crate::catalog::id::DbObjectId;
use crate::catalog::role::Role;
use crate::diff::operations::RoleOperation;
use crate::render::{RenderedSql, Safety, SqlRenderer, quote_ident};

fn role_attributes_sql(role: &Role) -> String {
    let mut parts = Vec::new();
    parts.push(if role.superuser { "SUPERUSER" } else { "NOSUPERUSER" }.to_string());
    parts.push(if role.createdb { "CREATEDB" } else { "NOCREATEDB" }.to_string());
    parts.push(
        if role.createrole {
            "CREATEROLE"
        } else {
            "NOCREATEROLE"
        }
        .to_string(),
    );
    parts.push(if role.inherit { "INHERIT" } else { "NOINHERIT" }.to_string());
    parts.push(if role.can_login { "LOGIN" } else { "NOLOGIN" }.to_string());
    parts.push(
        if role.replication {
            "REPLICATION"
        } else {
            "NOREPLICATION"
        }
        .to_string(),
    );
    parts.push(
        if role.bypassrls {
            "BYPASSRLS"
        } else {
            "NOBYPASSRLS"
        }
        .to_string(),
    );
    parts.push(format!(
        "CONNECTION LIMIT {}",
        role.connection_limit.unwrap_or(-1)
    ));
    parts.join(" ")
}

impl SqlRenderer for RoleOperation {
    fn to_sql(&self) -> Vec<RenderedSql> {
        match self {
            RoleOperation::Create { role } => {
                let mut statements = vec![RenderedSql {
                    sql: format!(
                        "CREATE ROLE {} WITH {};",
                        quote_ident(&role.name),
                        role_attributes_sql(role)
                    ),
                    safety: Safety::Safe,
                }];
                for entry in &role.config {
                    statements.push(RenderedSql {
                        sql: format!(
                            "ALTER ROLE {} SET {} = {};",
                            quote_ident(&role.name),
                            entry.key,
                            entry.value
                        ),
                        safety: Safety::Safe,
                    });
                }
                statements
            }
            RoleOperation::Drop { name } => vec![RenderedSql {
                sql: format!("DROP ROLE {};", quote_ident(name)),
                safety: Safety::Destructive,
            }],
            RoleOperation::Alter { name, old, new } => {
                let mut statements = Vec::new();
                if !old.data_fields_equal(new) {
                    statements.push(RenderedSql {
                        sql: format!(
                            "ALTER ROLE {} WITH {};",
                            quote_ident(name),
                            role_attributes_sql(new)
                        ),
                        safety: Safety::Safe,
                    });
                }
                for entry in &new.config {
                    if !old.config.contains(entry) {
                        statements.push(RenderedSql {
                            sql: format!(
                                "ALTER ROLE {} SET {} = {};",
                                quote_ident(name),
                                entry.key,
                                entry.value
                            ),
                            safety: Safety::Safe,
                        });
                    }
                }
                if new.config.is_empty() && !old.config.is_empty() {
                    statements.push(RenderedSql {
                        sql: format!("ALTER ROLE {} RESET ALL;", quote_ident(name)),
                        safety: Safety::Safe,
                    });
                } else {
                    for entry in &old.config {
                        if !new.config.iter().any(|e| e.key == entry.key) {
                            statements.push(RenderedSql {
                                sql: format!(
                                    "ALTER ROLE {} RESET {};",
                                    quote_ident(name),
                                    entry.key
                                ),
                                safety: Safety::Safe,
                            });
                        }
                    }
                }
                statements
            }
        }
    }

    fn db_object_id(&self) -> DbObjectId {
        match self {
            RoleOperation::Create { role } => DbObjectId::Role {
                name: role.name.clone(),
            },
            RoleOperation::Drop { name } | RoleOperation::Alter { name, .. } => {
                DbObjectId::Role { name: name.clone() }
            }
        }
    }

    fn is_destructive(&self) -> bool {
        matches!(self, RoleOperation::Drop { .. })
    }
}
