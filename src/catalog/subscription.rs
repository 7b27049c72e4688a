//! src/catalog/subscription
//! Fetch logical replication subscriptions via pg_catalog
use anyhow::Result;
use sqlx::Row;
use sqlx::postgres::PgConnection;
use tracing::info;

use super::id::{DbObjectId, DependsOn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub name: String,
    pub owner: String,
    pub enabled: bool,
    /// Connection string is intentionally not captured — it carries credentials and is not a
    /// structural property this crate diffs.
    pub publications: Vec<String>,
}

impl Subscription {
    pub fn id(&self) -> DbObjectId {
        DbObjectId::Subscription {
            name: self.name.clone(),
        }
    }
}

impl DependsOn for Subscription {
    fn id(&self) -> DbObjectId {
        self.id()
    }

    fn depends_on(&self) -> &[DbObjectId] {
        &[]
    }
}

pub async fn fetch(conn: &mut PgConnection) -> Result<Vec<Subscription>> {
    info!("Fetching subscriptions...");
    // pg_subscription is only visible to superusers/database owners and only exists in the
    // subscriber database; absence of rows (or of privilege) is not an error.
    let rows = sqlx::query(
        r#"
        SELECT
            s.subname AS name,
            pg_get_userbyid(s.subowner) AS owner,
            s.subenabled AS enabled,
            COALESCE(s.subpublications, '{}') AS publications
        FROM pg_subscription s
        ORDER BY s.subname
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    let subscriptions = rows
        .into_iter()
        .map(|row| Subscription {
            name: row.get("name"),
            owner: row.get("owner"),
            enabled: row.get("enabled"),
            publications: row.get("publications"),
        })
        .collect();

    Ok(subscriptions)
}
