use anyhow::Result;
use sqlx::postgres::PgConnection;
use tracing::info;

use crate::catalog::{DependsOn, comments::Commentable, id::DbObjectId};

/// Represents a PostgreSQL extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    pub name: String,
    pub schema: String,
    pub version: String,
    pub relocatable: bool,
    pub comment: Option<String>,
    pub depends_on: Vec<DbObjectId>,
    /// Objects `CREATE EXTENSION` itself created (its SQL script's functions, types, etc.),
    /// recorded via `pg_depend`'s `deptype = 'e'` membership rows. These are never diffed as
    /// independent catalog objects — every other per-kind fetcher excludes them — so this is
    /// the only place they're visible at all, folded under the extension that owns them.
    pub members: Vec<DbObjectId>,
}

impl DependsOn for Extension {
    fn id(&self) -> DbObjectId {
        DbObjectId::Extension {
            name: self.name.clone(),
        }
    }

    fn depends_on(&self) -> &[DbObjectId] {
        &self.depends_on
    }
}

impl Commentable for Extension {
    fn comment(&self) -> &Option<String> {
        &self.comment
    }
}

/// Fetch all extensions from the database
pub async fn fetch(conn: &mut PgConnection) -> Result<Vec<Extension>> {
    info!("Fetching extensions...");
    let extensions = sqlx::query!(
        r#"
        SELECT
            e.extname AS name,
            n.nspname AS schema,
            e.extversion AS version,
            e.extrelocatable AS relocatable,

            -- Comments
            d.description AS "comment?"

        FROM pg_extension e
        JOIN pg_namespace n ON e.extnamespace = n.oid
        LEFT JOIN pg_description d ON d.objoid = e.oid AND d.objsubid = 0

        -- Exclude built-in extensions that come with PostgreSQL
        WHERE e.extname NOT IN ('plpgsql')

        ORDER BY e.extname
        "#
    )
    .fetch_all(&mut *conn)
    .await?;

    let mut result = Vec::new();

    for row in extensions {
        // Track schema dependency when extension is installed in a non-public schema
        let mut depends_on = Vec::new();
        if row.schema != "public" {
            depends_on.push(DbObjectId::Schema {
                name: row.schema.clone(),
            });
        }

        let extension = Extension {
            name: row.name,
            schema: row.schema,
            version: row.version,
            relocatable: row.relocatable,
            comment: row.comment,
            depends_on,
            members: Vec::new(),
        };

        result.push(extension);
    }

    let members_by_extension = fetch_members(&mut *conn).await?;
    for extension in &mut result {
        if let Some(members) = members_by_extension.get(&extension.name) {
            extension.members = members.clone();
        }
    }

    Ok(result)
}

/// Fetches every object each extension's install script created, grouped by extension name.
/// `pg_depend` rows with `deptype = 'e'` and `refclassid = 'pg_extension'` are exactly this
/// membership list (the same rows every other per-kind fetcher's `NOT EXISTS` clause excludes).
/// Only the kinds `DbObjectId` can represent (functions, types/domains, tables/views/sequences)
/// are mapped; anything else (operators, access methods, casts, ...) has no matching variant and
/// is skipped.
async fn fetch_members(
    conn: &mut PgConnection,
) -> Result<std::collections::HashMap<String, Vec<DbObjectId>>> {
    let rows = sqlx::query!(
        r#"
        SELECT
            e.extname AS "extension_name!",
            pn.nspname AS "proc_schema?",
            p.proname AS "proc_name?",
            pg_catalog.pg_get_function_identity_arguments(p.oid) AS "proc_arguments?",
            p.prokind::text AS "prokind?",
            tn.nspname AS "type_schema?",
            t.typname AS "type_name?",
            t.typtype::text AS "typtype?",
            cn.nspname AS "rel_schema?",
            c.relname AS "rel_name?",
            c.relkind::text AS "relkind?"
        FROM pg_depend d
        JOIN pg_extension e ON e.oid = d.refobjid
        LEFT JOIN pg_proc p ON d.classid = 'pg_proc'::regclass AND p.oid = d.objid
        LEFT JOIN pg_namespace pn ON pn.oid = p.pronamespace
        LEFT JOIN pg_type t ON d.classid = 'pg_type'::regclass AND t.oid = d.objid
        LEFT JOIN pg_namespace tn ON tn.oid = t.typnamespace
        LEFT JOIN pg_class c ON d.classid = 'pg_class'::regclass AND c.oid = d.objid
        LEFT JOIN pg_namespace cn ON cn.oid = c.relnamespace
        WHERE d.refclassid = 'pg_extension'::regclass
          AND d.deptype = 'e'
          AND d.objsubid = 0
        ORDER BY e.extname
        "#
    )
    .fetch_all(&mut *conn)
    .await?;

    let mut by_extension: std::collections::HashMap<String, Vec<DbObjectId>> =
        std::collections::HashMap::new();

    for row in rows {
        let member = if let (Some(schema), Some(name)) = (&row.proc_schema, &row.proc_name) {
            let arguments = row.proc_arguments.unwrap_or_default();
            match row.prokind.as_deref() {
                Some("a") => Some(DbObjectId::Aggregate {
                    schema: schema.clone(),
                    name: name.clone(),
                    arguments,
                }),
                _ => Some(DbObjectId::Function {
                    schema: schema.clone(),
                    name: name.clone(),
                    arguments,
                }),
            }
        } else if let (Some(schema), Some(name)) = (&row.type_schema, &row.type_name) {
            if row.typtype.as_deref() == Some("d") {
                Some(DbObjectId::Domain {
                    schema: schema.clone(),
                    name: name.clone(),
                })
            } else {
                Some(DbObjectId::Type {
                    schema: schema.clone(),
                    name: name.clone(),
                })
            }
        } else if let (Some(schema), Some(name)) = (&row.rel_schema, &row.rel_name) {
            match row.relkind.as_deref() {
                Some("v") => Some(DbObjectId::View {
                    schema: schema.clone(),
                    name: name.clone(),
                }),
                Some("S") => Some(DbObjectId::Sequence {
                    schema: schema.clone(),
                    name: name.clone(),
                }),
                Some("r") | Some("p") | Some("f") => Some(DbObjectId::Table {
                    schema: schema.clone(),
                    name: name.clone(),
                }),
                _ => None,
            }
        } else {
            None
        };

        if let Some(member) = member {
            by_extension
                .entry(row.extension_name)
                .or_default()
                .push(member);
        }
    }

    for members in by_extension.values_mut() {
        members.sort();
    }

    Ok(by_extension)
}
