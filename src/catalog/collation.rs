//! src/catalog/collation
//! Fetch custom collations via pg_catalog
use anyhow::Result;
use sqlx::Row;
use sqlx::postgres::PgConnection;
use tracing::info;

use super::comments::Commentable;
use super::id::{DbObjectId, DependsOn};
use super::utils::DependencyBuilder;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collation {
    pub schema: String,
    pub name: String,
    pub locale: String,
    pub provider: String, // 'c', 'icu', 'libc'
    pub deterministic: bool,
    pub comment: Option<String>,
    pub depends_on: Vec<DbObjectId>,
}

impl Collation {
    pub fn id(&self) -> DbObjectId {
        DbObjectId::Collation {
            schema: self.schema.clone(),
            name: self.name.clone(),
        }
    }
}

impl DependsOn for Collation {
    fn id(&self) -> DbObjectId {
        self.id()
    }

    fn depends_on(&self) -> &[DbObjectId] {
        &self.depends_on
    }
}

impl Commentable for Collation {
    fn comment(&self) -> &Option<String> {
        &self.comment
    }
}

pub async fn fetch(conn: &mut PgConnection) -> Result<Vec<Collation>> {
    info!("Fetching collations...");
    let rows = sqlx::query(
        r#"
        SELECT
            n.nspname AS schema_name,
            c.collname AS name,
            COALESCE(c.collcollate, c.colliculocale, '') AS locale,
            c.collprovider::text AS provider,
            c.collisdeterministic AS deterministic,
            d.description AS comment
        FROM pg_collation c
        JOIN pg_namespace n ON c.collnamespace = n.oid
        LEFT JOIN pg_description d ON d.objoid = c.oid
        WHERE NOT EXISTS (
            SELECT 1 FROM pg_depend dep
            WHERE dep.objid = c.oid AND dep.deptype IN ('e', 'i')
        )
        ORDER BY n.nspname, c.collname
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    let collations = rows
        .into_iter()
        .map(|row| {
            let schema: String = row.get("schema_name");
            let depends_on = DependencyBuilder::new(schema.clone()).build();
            Collation {
                schema,
                name: row.get("name"),
                locale: row.get("locale"),
                provider: row.get("provider"),
                deterministic: row.get("deterministic"),
                comment: row.get("comment"),
                depends_on,
            }
        })
        .collect();

    Ok(collations)
}
