//! src/catalog/default_privilege
//! Fetch ALTER DEFAULT PRIVILEGES entries (pg_default_acl) and the built-in default
//! privilege oracle used by the grant differ to decide what the engine grants implicitly.
use anyhow::Result;
use sqlx::Row;
use sqlx::postgres::PgConnection;
use tracing::info;

use super::id::{DbObjectId, DependsOn};

/// Normalizes `pg_default_acl.defaclobjtype` ('r', 'S', 'f', 'T', 'n') to the word used in
/// [`DbObjectId::DefaultAcl`] and in rendered `ALTER DEFAULT PRIVILEGES` statements.
fn objtype_word(raw: &str) -> String {
    match raw {
        "r" => "table",
        "S" => "sequence",
        "f" => "function",
        "T" => "type",
        "n" => "schema",
        other => other,
    }
    .to_string()
}

/// One `ALTER DEFAULT PRIVILEGES ... FOR ROLE role [IN SCHEMA schema] GRANT ... ON objtype`
/// entry, keyed by (role, schema, objtype, grantee) per the stable id format.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DefaultAcl {
    pub role: String,
    pub schema: Option<String>,
    /// "table", "sequence", "function", "type" or "schema".
    pub objtype: String,
    pub grantee: String,
    pub privileges: Vec<String>,
    pub with_grant_option: bool,
}

impl DefaultAcl {
    pub fn id(&self) -> DbObjectId {
        DbObjectId::DefaultAcl {
            role: self.role.clone(),
            schema: self.schema.clone(),
            objtype: self.objtype.clone(),
            grantee: self.grantee.clone(),
        }
    }
}

impl DependsOn for DefaultAcl {
    fn id(&self) -> DbObjectId {
        self.id()
    }

    fn depends_on(&self) -> &[DbObjectId] {
        &[]
    }
}

pub async fn fetch(conn: &mut PgConnection) -> Result<Vec<DefaultAcl>> {
    info!("Fetching default privileges...");
    let rows = sqlx::query(
        r#"
        SELECT
            pg_get_userbyid(d.defaclrole) AS role,
            n.nspname AS schema_name,
            d.defaclobjtype::text AS objtype,
            acl.grantee AS grantee_oid,
            acl.privilege_type AS privilege_type,
            acl.is_grantable AS is_grantable
        FROM pg_default_acl d
        LEFT JOIN pg_namespace n ON n.oid = d.defaclnamespace
        CROSS JOIN LATERAL aclexplode(d.defaclacl) AS acl
        ORDER BY role, schema_name NULLS FIRST, objtype, grantee_oid
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    let mut entries: Vec<DefaultAcl> = Vec::new();
    for row in rows {
        let role: String = row.get("role");
        let schema: Option<String> = row.get("schema_name");
        let objtype: String = objtype_word(row.get::<String, _>("objtype").as_str());
        let grantee_oid: i64 = row.get::<i64, _>("grantee_oid");
        let grantee = if grantee_oid == 0 {
            "public".to_string()
        } else {
            grantee_name(conn, grantee_oid).await?
        };
        let privilege: String = row.get("privilege_type");
        let with_grant_option: bool = row.get("is_grantable");

        match entries.iter_mut().find(|e| {
            e.role == role
                && e.schema == schema
                && e.objtype == objtype
                && e.grantee == grantee
                && e.with_grant_option == with_grant_option
        }) {
            Some(existing) => existing.privileges.push(privilege),
            None => entries.push(DefaultAcl {
                role,
                schema,
                objtype,
                grantee,
                privileges: vec![privilege],
                with_grant_option,
            }),
        }
    }

    entries.sort();
    Ok(entries)
}

async fn grantee_name(conn: &mut PgConnection, oid: i64) -> Result<String> {
    let row = sqlx::query("SELECT rolname FROM pg_roles WHERE oid = $1")
        .bind(oid)
        .fetch_one(&mut *conn)
        .await?;
    Ok(row.get("rolname"))
}

/// Built-in privileges PostgreSQL grants automatically with no matching
/// `pg_default_acl` row: owner gets everything, and `PUBLIC` gets `EXECUTE` on
/// functions/procedures and `USAGE` on types. The grant differ consults this to
/// avoid proposing a spurious REVOKE for privileges the server itself implies.
pub fn is_builtin_default_privilege(objtype: &str, grantee: &str, privilege: &str) -> bool {
    match objtype {
        "function" => grantee == "public" && privilege == "EXECUTE",
        "type" => grantee == "public" && privilege == "USAGE",
        _ => false,
    }
}
