//! src/catalog/membership
//! Fetch role memberships (`GRANT role TO member`) via pg_catalog
use anyhow::Result;
use sqlx::Row;
use sqlx::postgres::PgConnection;
use tracing::info;

use super::id::{DbObjectId, DependsOn};
use super::role::is_builtin_role;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Membership {
    pub role: String,
    pub member: String,
    pub admin_option: bool,
}

impl Membership {
    pub fn id(&self) -> DbObjectId {
        DbObjectId::Membership {
            role: self.role.clone(),
            member: self.member.clone(),
        }
    }
}

impl DependsOn for Membership {
    fn id(&self) -> DbObjectId {
        self.id()
    }

    fn depends_on(&self) -> &[DbObjectId] {
        // Dependencies (on role + member) are injected by the differ, which has access to both
        // catalogs' role lists; a fetched Membership alone doesn't carry them.
        &[]
    }
}

pub async fn fetch(conn: &mut PgConnection) -> Result<Vec<Membership>> {
    info!("Fetching role memberships...");
    let rows = sqlx::query(
        r#"
        SELECT
            role.rolname AS role_name,
            member.rolname AS member_name,
            am.admin_option AS admin_option
        FROM pg_auth_members am
        JOIN pg_roles role ON role.oid = am.roleid
        JOIN pg_roles member ON member.oid = am.member
        ORDER BY role.rolname, member.rolname
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    let mut memberships: Vec<Membership> = rows
        .into_iter()
        .map(|row| Membership {
            role: row.get("role_name"),
            member: row.get("member_name"),
            admin_option: row.get("admin_option"),
        })
        .filter(|m| !is_builtin_role(&m.role) && !is_builtin_role(&m.member))
        .collect();

    memberships.sort();
    Ok(memberships)
}
