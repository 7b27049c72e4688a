//! src/catalog/language
//! Fetch procedural languages via pg_catalog
use anyhow::Result;
use sqlx::Row;
use sqlx::postgres::PgConnection;
use tracing::info;

use super::comments::Commentable;
use super::id::{DbObjectId, DependsOn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    pub name: String,
    pub trusted: bool,
    pub owner: String,
    pub comment: Option<String>,
}

impl Language {
    pub fn id(&self) -> DbObjectId {
        DbObjectId::Language {
            name: self.name.clone(),
        }
    }
}

impl DependsOn for Language {
    fn id(&self) -> DbObjectId {
        self.id()
    }

    fn depends_on(&self) -> &[DbObjectId] {
        &[]
    }
}

impl Commentable for Language {
    fn comment(&self) -> &Option<String> {
        &self.comment
    }
}

/// Languages installed by `initdb` that are never created or dropped by a plan.
pub fn is_builtin_language(name: &str) -> bool {
    matches!(name, "internal" | "c" | "sql" | "plpgsql")
}

pub async fn fetch(conn: &mut PgConnection) -> Result<Vec<Language>> {
    info!("Fetching procedural languages...");
    let rows = sqlx::query(
        r#"
        SELECT
            l.lanname AS name,
            l.lanpltrusted AS trusted,
            pg_get_userbyid(l.lanowner) AS owner,
            d.description AS comment
        FROM pg_language l
        LEFT JOIN pg_description d ON d.objoid = l.oid
        WHERE NOT l.lanispl = false OR l.lanname NOT IN ('internal', 'c', 'sql')
        ORDER BY l.lanname
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    let languages = rows
        .into_iter()
        .map(|row| Language {
            name: row.get("name"),
            trusted: row.get("trusted"),
            owner: row.get("owner"),
            comment: row.get("comment"),
        })
        .filter(|l| !is_builtin_language(&l.name))
        .collect();

    Ok(languages)
}
