//! src/catalog/event_trigger
//! Fetch event triggers via pg_catalog
use anyhow::Result;
use sqlx::Row;
use sqlx::postgres::PgConnection;
use tracing::info;

use super::id::{DbObjectId, DependsOn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTrigger {
    pub name: String,
    pub event: String, // ddl_command_start, ddl_command_end, sql_drop, table_rewrite
    pub owner: String,
    pub function_schema: String,
    pub function_name: String,
    pub enabled: String, // 'O' (enabled), 'D' (disabled), 'R' (replica), 'A' (always)
    pub tags: Vec<String>,
}

impl EventTrigger {
    pub fn id(&self) -> DbObjectId {
        DbObjectId::EventTrigger {
            name: self.name.clone(),
        }
    }
}

impl DependsOn for EventTrigger {
    fn id(&self) -> DbObjectId {
        self.id()
    }

    fn depends_on(&self) -> &[DbObjectId] {
        &[]
    }
}

pub async fn fetch(conn: &mut PgConnection) -> Result<Vec<EventTrigger>> {
    info!("Fetching event triggers...");
    let rows = sqlx::query(
        r#"
        SELECT
            evt.evtname AS name,
            evt.evtevent AS event,
            pg_get_userbyid(evt.evtowner) AS owner,
            n.nspname AS function_schema,
            p.proname AS function_name,
            evt.evtenabled::text AS enabled,
            COALESCE(evt.evttags, '{}') AS tags
        FROM pg_event_trigger evt
        JOIN pg_proc p ON p.oid = evt.evtfoid
        JOIN pg_namespace n ON n.oid = p.pronamespace
        ORDER BY evt.evtname
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    let triggers = rows
        .into_iter()
        .map(|row| EventTrigger {
            name: row.get("name"),
            event: row.get("event"),
            owner: row.get("owner"),
            function_schema: row.get("function_schema"),
            function_name: row.get("function_name"),
            enabled: row.get("enabled"),
            tags: row.get("tags"),
        })
        .collect();

    Ok(triggers)
}
