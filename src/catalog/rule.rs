//! src/catalog/rule
//! Fetch CREATE RULE rewrite rules via pg_catalog. Distinct from triggers: rules are rare in
//! modern schemas (views use `INSTEAD OF` triggers instead) but still diffed when present.
use anyhow::Result;
use sqlx::Row;
use sqlx::postgres::PgConnection;
use tracing::info;

use super::id::{DbObjectId, DependsOn};
use super::utils::DependencyBuilder;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub schema: String,
    pub table: String,
    pub name: String,
    pub definition: String,
    pub depends_on: Vec<DbObjectId>,
}

impl Rule {
    pub fn id(&self) -> DbObjectId {
        DbObjectId::Rule {
            schema: self.schema.clone(),
            table: self.table.clone(),
            name: self.name.clone(),
        }
    }
}

impl DependsOn for Rule {
    fn id(&self) -> DbObjectId {
        self.id()
    }

    fn depends_on(&self) -> &[DbObjectId] {
        &self.depends_on
    }
}

pub async fn fetch(conn: &mut PgConnection) -> Result<Vec<Rule>> {
    info!("Fetching rules...");
    let rows = sqlx::query(
        r#"
        SELECT
            n.nspname AS schema_name,
            c.relname AS table_name,
            r.rulename AS name,
            pg_get_ruledef(r.oid) AS definition
        FROM pg_rewrite r
        JOIN pg_class c ON c.oid = r.ev_class
        JOIN pg_namespace n ON n.oid = c.relnamespace
        WHERE r.rulename != '_RETURN'
          AND n.nspname NOT IN ('pg_catalog', 'information_schema', 'pg_toast')
          AND NOT EXISTS (
              SELECT 1 FROM pg_depend dep
              WHERE dep.objid = r.oid AND dep.deptype = 'e'
          )
        ORDER BY n.nspname, c.relname, r.rulename
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    let rules = rows
        .into_iter()
        .map(|row| {
            let schema: String = row.get("schema_name");
            let table: String = row.get("table_name");
            let mut depends_on = DependencyBuilder::new(schema.clone()).build();
            depends_on.push(DbObjectId::Table {
                schema: schema.clone(),
                name: table.clone(),
            });
            Rule {
                schema,
                table,
                name: row.get("name"),
                definition: row.get("definition"),
                depends_on,
            }
        })
        .collect();

    Ok(rules)
}
