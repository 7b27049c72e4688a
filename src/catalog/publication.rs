//! src/catalog/publication
//! Fetch logical replication publications via pg_catalog
use anyhow::Result;
use sqlx::Row;
use sqlx::postgres::PgConnection;
use tracing::info;

use super::id::{DbObjectId, DependsOn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    pub name: String,
    pub owner: String,
    pub all_tables: bool,
    pub insert: bool,
    pub update: bool,
    pub delete: bool,
    pub truncate: bool,
    /// Canonically sorted `schema.table` identifiers.
    pub tables: Vec<String>,
    pub depends_on: Vec<DbObjectId>,
}

impl Publication {
    pub fn id(&self) -> DbObjectId {
        DbObjectId::Publication {
            name: self.name.clone(),
        }
    }
}

impl DependsOn for Publication {
    fn id(&self) -> DbObjectId {
        self.id()
    }

    fn depends_on(&self) -> &[DbObjectId] {
        &self.depends_on
    }
}

pub async fn fetch(conn: &mut PgConnection) -> Result<Vec<Publication>> {
    info!("Fetching publications...");
    let rows = sqlx::query(
        r#"
        SELECT
            p.pubname AS name,
            pg_get_userbyid(p.pubowner) AS owner,
            p.puballtables AS all_tables,
            p.pubinsert AS do_insert,
            p.pubupdate AS do_update,
            p.pubdelete AS do_delete,
            p.pubtruncate AS do_truncate
        FROM pg_publication p
        ORDER BY p.pubname
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    let mut publications = Vec::new();
    for row in rows {
        let name: String = row.get("name");

        let table_rows = sqlx::query(
            r#"
            SELECT n.nspname || '.' || c.relname AS qualified_name
            FROM pg_publication_rel pr
            JOIN pg_class c ON c.oid = pr.prrelid
            JOIN pg_namespace n ON n.oid = c.relnamespace
            JOIN pg_publication p ON p.oid = pr.prpubid
            WHERE p.pubname = $1
            ORDER BY 1
            "#,
        )
        .bind(&name)
        .fetch_all(&mut *conn)
        .await?;

        let mut tables: Vec<String> = table_rows
            .into_iter()
            .map(|r| r.get::<String, _>("qualified_name"))
            .collect();
        tables.sort();

        let depends_on = tables
            .iter()
            .filter_map(|t| {
                t.split_once('.').map(|(schema, name)| DbObjectId::Table {
                    schema: schema.to_string(),
                    name: name.to_string(),
                })
            })
            .collect::<Vec<_>>();

        publications.push(Publication {
            name,
            owner: row.get("owner"),
            all_tables: row.get("all_tables"),
            insert: row.get("do_insert"),
            update: row.get("do_update"),
            delete: row.get("do_delete"),
            truncate: row.get("do_truncate"),
            tables,
            depends_on,
        });
    }

    Ok(publications)
}
