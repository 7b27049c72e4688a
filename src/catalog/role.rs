//! src/catalog/role
//! Fetch roles (users and groups) via pg_catalog
use anyhow::Result;
use sqlx::postgres::PgConnection;
use sqlx::Row;
use tracing::info;

use super::id::{DbObjectId, DependsOn};

/// A `key=value` entry from a role's `SET` configuration (`ALTER ROLE ... SET key = value`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RoleConfigEntry {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Role {
    pub name: String,
    pub superuser: bool,
    pub createdb: bool,
    pub createrole: bool,
    pub can_login: bool,
    pub replication: bool,
    pub bypassrls: bool,
    pub inherit: bool,
    /// `None` means no limit was set (`CONNECTION LIMIT -1`, Postgres' default).
    pub connection_limit: Option<i32>,
    /// Canonically sorted so equality is order-insensitive (spec §3.3).
    pub config: Vec<RoleConfigEntry>,
}

impl Role {
    pub fn id(&self) -> DbObjectId {
        DbObjectId::Role {
            name: self.name.clone(),
        }
    }

    /// Fields that participate in `CREATE ROLE`/`ALTER ROLE ... WITH ...` but never require a
    /// drop+create (roles are only ever drop+create when renamed, which this crate treats as a
    /// distinct create+drop pair since there is no stable id preserved across a rename).
    pub fn data_fields_equal(&self, other: &Role) -> bool {
        self.superuser == other.superuser
            && self.createdb == other.createdb
            && self.createrole == other.createrole
            && self.can_login == other.can_login
            && self.replication == other.replication
            && self.bypassrls == other.bypassrls
            && self.inherit == other.inherit
            && self.connection_limit == other.connection_limit
            && self.config == other.config
    }
}

impl DependsOn for Role {
    fn id(&self) -> DbObjectId {
        self.id()
    }

    fn depends_on(&self) -> &[DbObjectId] {
        &[]
    }
}

/// Roles that ship with every PostgreSQL cluster and are never created/dropped by a plan.
pub fn is_builtin_role(name: &str) -> bool {
    matches!(
        name,
        "pg_read_all_data"
            | "pg_write_all_data"
            | "pg_monitor"
            | "pg_read_all_settings"
            | "pg_read_all_stats"
            | "pg_stat_scan_tables"
            | "pg_signal_backend"
            | "pg_checkpoint"
            | "pg_database_owner"
            | "pg_read_server_files"
            | "pg_write_server_files"
            | "pg_execute_server_program"
            | "pg_use_reserved_connections"
            | "pg_create_subscription"
            | "pg_maintain"
    ) || name.starts_with("pg_")
}

pub async fn fetch(conn: &mut PgConnection) -> Result<Vec<Role>> {
    info!("Fetching roles...");
    let rows = sqlx::query(
        r#"
        SELECT
            r.rolname AS name,
            r.rolsuper AS superuser,
            r.rolcreatedb AS createdb,
            r.rolcreaterole AS createrole,
            r.rolcanlogin AS can_login,
            r.rolreplication AS replication,
            r.rolbypassrls AS bypassrls,
            r.rolinherit AS inherit,
            r.rolconnlimit AS connection_limit,
            r.rolconfig AS config
        FROM pg_roles r
        WHERE NOT (r.rolname LIKE 'pg\_%')
        ORDER BY r.rolname
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    let mut roles = Vec::new();
    for row in rows {
        let name: String = row.get("name");
        let connection_limit: i32 = row.get("connection_limit");
        let raw_config: Option<Vec<String>> = row.get("config");

        let mut config: Vec<RoleConfigEntry> = raw_config
            .unwrap_or_default()
            .iter()
            .filter_map(|entry| entry.split_once('='))
            .map(|(k, v)| RoleConfigEntry {
                key: k.to_string(),
                value: v.to_string(),
            })
            .collect();
        config.sort();

        roles.push(Role {
            name,
            superuser: row.get("superuser"),
            createdb: row.get("createdb"),
            createrole: row.get("createrole"),
            can_login: row.get("can_login"),
            replication: row.get("replication"),
            bypassrls: row.get("bypassrls"),
            inherit: row.get("inherit"),
            connection_limit: if connection_limit < 0 {
                None
            } else {
                Some(connection_limit)
            },
            config,
        });
    }

    Ok(roles)
}
