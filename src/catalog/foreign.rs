//! src/catalog/foreign
//! Fetch foreign-data infrastructure (FDWs, foreign servers, user mappings, foreign tables).
//!
//! Grouped in one file because the four kinds are small, always fetched together, and form one
//! dependency chain (fdw -> server -> user_mapping / foreign_table).
use anyhow::Result;
use sqlx::Row;
use sqlx::postgres::PgConnection;
use tracing::info;

use super::comments::Commentable;
use super::id::{DbObjectId, DependsOn};
use super::utils::DependencyBuilder;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignDataWrapper {
    pub name: String,
    pub handler: Option<String>,
    pub validator: Option<String>,
    pub options: Vec<(String, String)>,
    pub comment: Option<String>,
}

impl ForeignDataWrapper {
    pub fn id(&self) -> DbObjectId {
        DbObjectId::ForeignDataWrapper {
            name: self.name.clone(),
        }
    }
}

impl DependsOn for ForeignDataWrapper {
    fn id(&self) -> DbObjectId {
        self.id()
    }
    fn depends_on(&self) -> &[DbObjectId] {
        &[]
    }
}

impl Commentable for ForeignDataWrapper {
    fn comment(&self) -> &Option<String> {
        &self.comment
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignServer {
    pub name: String,
    pub fdw_name: String,
    pub server_type: Option<String>,
    pub server_version: Option<String>,
    pub options: Vec<(String, String)>,
    pub comment: Option<String>,
    pub depends_on: Vec<DbObjectId>,
}

impl ForeignServer {
    pub fn id(&self) -> DbObjectId {
        DbObjectId::ForeignServer {
            name: self.name.clone(),
        }
    }
}

impl DependsOn for ForeignServer {
    fn id(&self) -> DbObjectId {
        self.id()
    }
    fn depends_on(&self) -> &[DbObjectId] {
        &self.depends_on
    }
}

impl Commentable for ForeignServer {
    fn comment(&self) -> &Option<String> {
        &self.comment
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMapping {
    pub server: String,
    pub user: String,
    pub options: Vec<(String, String)>,
    pub depends_on: Vec<DbObjectId>,
}

impl UserMapping {
    pub fn id(&self) -> DbObjectId {
        DbObjectId::UserMapping {
            server: self.server.clone(),
            user: self.user.clone(),
        }
    }
}

impl DependsOn for UserMapping {
    fn id(&self) -> DbObjectId {
        self.id()
    }
    fn depends_on(&self) -> &[DbObjectId] {
        &self.depends_on
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignTableColumn {
    pub name: String,
    pub data_type: String,
    pub not_null: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignTable {
    pub schema: String,
    pub name: String,
    pub server: String,
    pub columns: Vec<ForeignTableColumn>,
    pub options: Vec<(String, String)>,
    pub comment: Option<String>,
    pub depends_on: Vec<DbObjectId>,
}

impl ForeignTable {
    pub fn id(&self) -> DbObjectId {
        DbObjectId::ForeignTable {
            schema: self.schema.clone(),
            name: self.name.clone(),
        }
    }
}

impl DependsOn for ForeignTable {
    fn id(&self) -> DbObjectId {
        self.id()
    }
    fn depends_on(&self) -> &[DbObjectId] {
        &self.depends_on
    }
}

impl Commentable for ForeignTable {
    fn comment(&self) -> &Option<String> {
        &self.comment
    }
}

fn options_from_text_array(raw: Option<Vec<String>>) -> Vec<(String, String)> {
    let mut opts: Vec<(String, String)> = raw
        .unwrap_or_default()
        .iter()
        .filter_map(|e| e.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    opts.sort();
    opts
}

pub async fn fetch_fdws(conn: &mut PgConnection) -> Result<Vec<ForeignDataWrapper>> {
    info!("Fetching foreign data wrappers...");
    let rows = sqlx::query(
        r#"
        SELECT
            w.fdwname AS name,
            h.proname AS handler,
            v.proname AS validator,
            w.fdwoptions AS options,
            d.description AS comment
        FROM pg_foreign_data_wrapper w
        LEFT JOIN pg_proc h ON h.oid = w.fdwhandler
        LEFT JOIN pg_proc v ON v.oid = w.fdwvalidator
        LEFT JOIN pg_description d ON d.objoid = w.oid
        ORDER BY w.fdwname
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| ForeignDataWrapper {
            name: row.get("name"),
            handler: row.get("handler"),
            validator: row.get("validator"),
            options: options_from_text_array(row.get("options")),
            comment: row.get("comment"),
        })
        .collect())
}

pub async fn fetch_servers(conn: &mut PgConnection) -> Result<Vec<ForeignServer>> {
    info!("Fetching foreign servers...");
    let rows = sqlx::query(
        r#"
        SELECT
            s.srvname AS name,
            w.fdwname AS fdw_name,
            s.srvtype AS server_type,
            s.srvversion AS server_version,
            s.srvoptions AS options,
            d.description AS comment
        FROM pg_foreign_server s
        JOIN pg_foreign_data_wrapper w ON w.oid = s.srvfdw
        LEFT JOIN pg_description d ON d.objoid = s.oid
        ORDER BY s.srvname
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let fdw_name: String = row.get("fdw_name");
            ForeignServer {
                name: row.get("name"),
                depends_on: vec![DbObjectId::ForeignDataWrapper {
                    name: fdw_name.clone(),
                }],
                fdw_name,
                server_type: row.get("server_type"),
                server_version: row.get("server_version"),
                options: options_from_text_array(row.get("options")),
                comment: row.get("comment"),
            }
        })
        .collect())
}

pub async fn fetch_user_mappings(conn: &mut PgConnection) -> Result<Vec<UserMapping>> {
    info!("Fetching user mappings...");
    let rows = sqlx::query(
        r#"
        SELECT
            s.srvname AS server,
            CASE WHEN um.umuser = 0 THEN 'public' ELSE pg_get_userbyid(um.umuser) END AS "user",
            um.umoptions AS options
        FROM pg_user_mapping um
        JOIN pg_foreign_server s ON s.oid = um.umserver
        ORDER BY s.srvname, "user"
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let server: String = row.get("server");
            UserMapping {
                depends_on: vec![DbObjectId::ForeignServer {
                    name: server.clone(),
                }],
                server,
                user: row.get("user"),
                options: options_from_text_array(row.get("options")),
            }
        })
        .collect())
}

pub async fn fetch_foreign_tables(conn: &mut PgConnection) -> Result<Vec<ForeignTable>> {
    info!("Fetching foreign tables...");
    let rows = sqlx::query(
        r#"
        SELECT
            n.nspname AS schema_name,
            c.relname AS name,
            s.srvname AS server,
            ft.ftoptions AS options,
            d.description AS comment
        FROM pg_foreign_table ft
        JOIN pg_class c ON c.oid = ft.ftrelid
        JOIN pg_namespace n ON n.oid = c.relnamespace
        JOIN pg_foreign_server s ON s.oid = ft.ftserver
        LEFT JOIN pg_description d ON d.objoid = c.oid AND d.objsubid = 0
        ORDER BY n.nspname, c.relname
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    let mut tables = Vec::new();
    for row in rows {
        let schema: String = row.get("schema_name");
        let name: String = row.get("name");
        let server: String = row.get("server");

        let column_rows = sqlx::query(
            r#"
            SELECT a.attname AS name, format_type(a.atttypid, a.atttypmod) AS data_type, a.attnotnull AS not_null
            FROM pg_attribute a
            JOIN pg_class c ON c.oid = a.attrelid
            JOIN pg_namespace n ON n.oid = c.relnamespace
            WHERE n.nspname = $1 AND c.relname = $2 AND a.attnum > 0 AND NOT a.attisdropped
            ORDER BY a.attnum
            "#,
        )
        .bind(&schema)
        .bind(&name)
        .fetch_all(&mut *conn)
        .await?;

        let columns = column_rows
            .into_iter()
            .map(|r| ForeignTableColumn {
                name: r.get("name"),
                data_type: r.get("data_type"),
                not_null: r.get("not_null"),
            })
            .collect();

        let mut depends_on = DependencyBuilder::new(schema.clone()).build();
        depends_on.push(DbObjectId::ForeignServer {
            name: server.clone(),
        });

        tables.push(ForeignTable {
            schema,
            name,
            server,
            columns,
            options: options_from_text_array(row.get("options")),
            comment: row.get("comment"),
            depends_on,
        });
    }

    Ok(tables)
}
