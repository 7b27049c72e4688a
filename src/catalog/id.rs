/// A globally unique identifier for any database object in pgmt.
///
/// Every variant round-trips through [`DbObjectId::to_stable_id`] into the
/// `kind:qualifier[.qualifier...]` string form used for logs, debug output and the `--object`
/// filter on `pgmt debug dependencies`. The enum itself (not the string) remains the identity
/// used for graph building, so typos in a qualifier are still caught by the compiler wherever an
/// id is constructed directly rather than parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DbObjectId {
    Schema {
        name: String,
    },

    Role {
        name: String,
    },

    Language {
        name: String,
    },

    Collation {
        schema: String,
        name: String,
    },

    Table {
        schema: String,
        name: String,
    },

    View {
        schema: String,
        name: String,
    },

    MaterializedView {
        schema: String,
        name: String,
    },

    Type {
        schema: String,
        name: String,
    },
    Domain {
        schema: String,
        name: String,
    },
    Function {
        schema: String,
        name: String,
        arguments: String,
    },
    Sequence {
        schema: String,
        name: String,
    },
    Index {
        schema: String,
        name: String,
    },
    Constraint {
        schema: String,
        table: String,
        name: String,
    },
    Grant {
        id: String, // Unique identifier: "grantee@object_type:object_name"
    },
    Trigger {
        schema: String,
        table: String,
        name: String,
    },
    /// A single column, used for cascade dependency lookups (e.g. objects that reference a
    /// column via `pg_depend.refobjsubid`). Never produced by a top-level differ on its own.
    Column {
        schema: String,
        table: String,
        column: String,
    },
    Policy {
        schema: String,
        table: String,
        name: String,
    },
    Rule {
        schema: String,
        table: String,
        name: String,
    },
    Comment {
        object_id: Box<DbObjectId>, // The object being commented on
    },
    Extension {
        name: String,
    },
    Aggregate {
        schema: String,
        name: String,
        arguments: String,
    },
    EventTrigger {
        name: String,
    },
    Publication {
        name: String,
    },
    Subscription {
        name: String,
    },
    ForeignDataWrapper {
        name: String,
    },
    ForeignServer {
        name: String,
    },
    UserMapping {
        server: String,
        user: String,
    },
    ForeignTable {
        schema: String,
        name: String,
    },

    /// Role membership: `member` is a member of `role`.
    Membership {
        role: String,
        member: String,
    },

    /// `ALTER DEFAULT PRIVILEGES FOR ROLE <role> [IN SCHEMA <schema>] ... FOR <objtype> ... TO <grantee>`.
    /// `schema` is `None` for a global default (applies in every schema the role creates objects in).
    DefaultAcl {
        role: String,
        schema: Option<String>,
        objtype: String,
        grantee: String,
    },
}

impl DbObjectId {
    /// Get the schema name for this object, if applicable.
    /// Returns None for schema-less objects like Schema (where name IS the schema),
    /// Extension (database-wide), Grant (uses composite ID), and Comment (delegates to inner).
    pub fn schema(&self) -> Option<&str> {
        match self {
            DbObjectId::Schema { name } => Some(name.as_str()),
            DbObjectId::Collation { schema, .. }
            | DbObjectId::Table { schema, .. }
            | DbObjectId::View { schema, .. }
            | DbObjectId::MaterializedView { schema, .. }
            | DbObjectId::Type { schema, .. }
            | DbObjectId::Domain { schema, .. }
            | DbObjectId::Function { schema, .. }
            | DbObjectId::Sequence { schema, .. }
            | DbObjectId::Index { schema, .. }
            | DbObjectId::Constraint { schema, .. }
            | DbObjectId::Trigger { schema, .. }
            | DbObjectId::Column { schema, .. }
            | DbObjectId::Policy { schema, .. }
            | DbObjectId::Rule { schema, .. }
            | DbObjectId::ForeignTable { schema, .. }
            | DbObjectId::Aggregate { schema, .. } => Some(schema.as_str()),
            DbObjectId::DefaultAcl { schema, .. } => schema.as_deref(),
            DbObjectId::Grant { .. }
            | DbObjectId::Extension { .. }
            | DbObjectId::Role { .. }
            | DbObjectId::Language { .. }
            | DbObjectId::EventTrigger { .. }
            | DbObjectId::Publication { .. }
            | DbObjectId::Subscription { .. }
            | DbObjectId::ForeignDataWrapper { .. }
            | DbObjectId::ForeignServer { .. }
            | DbObjectId::UserMapping { .. }
            | DbObjectId::Membership { .. } => None,
            DbObjectId::Comment { object_id } => object_id.schema(),
        }
    }

    /// Returns true if this id identifies metadata attached to an object (a comment, an ACL
    /// entry, a default-privilege rule or a role membership) rather than the object itself.
    pub fn is_metadata(&self) -> bool {
        matches!(
            self,
            DbObjectId::Comment { .. }
                | DbObjectId::Grant { .. }
                | DbObjectId::DefaultAcl { .. }
                | DbObjectId::Membership { .. }
        )
    }

    /// Canonical `kind:qualifier[.qualifier...]` string form of this id (spec §3.1).
    pub fn to_stable_id(&self) -> String {
        match self {
            DbObjectId::Schema { name } => format!("schema:{name}"),
            DbObjectId::Role { name } => format!("role:{name}"),
            DbObjectId::Language { name } => format!("language:{name}"),
            DbObjectId::Collation { schema, name } => format!("collation:{schema}.{name}"),
            DbObjectId::Table { schema, name } => format!("table:{schema}.{name}"),
            DbObjectId::View { schema, name } => format!("view:{schema}.{name}"),
            DbObjectId::MaterializedView { schema, name } => {
                format!("materialized_view:{schema}.{name}")
            }
            DbObjectId::Type { schema, name } => format!("type:{schema}.{name}"),
            DbObjectId::Domain { schema, name } => format!("domain:{schema}.{name}"),
            DbObjectId::Function {
                schema,
                name,
                arguments,
            } => format!("procedure:{schema}.{name}({arguments})"),
            DbObjectId::Sequence { schema, name } => format!("sequence:{schema}.{name}"),
            DbObjectId::Index { schema, name } => format!("index:{schema}.{name}"),
            DbObjectId::Constraint {
                schema,
                table,
                name,
            } => format!("constraint:{schema}.{table}.{name}"),
            DbObjectId::Grant { id } => format!("acl:{id}"),
            DbObjectId::Trigger {
                schema,
                table,
                name,
            } => format!("trigger:{schema}.{table}.{name}"),
            DbObjectId::Column {
                schema,
                table,
                column,
            } => format!("column:{schema}.{table}.{column}"),
            DbObjectId::Policy {
                schema,
                table,
                name,
            } => format!("policy:{schema}.{table}.{name}"),
            DbObjectId::Rule {
                schema,
                table,
                name,
            } => format!("rule:{schema}.{table}.{name}"),
            DbObjectId::Comment { object_id } => format!("comment:{}", object_id.to_stable_id()),
            DbObjectId::Extension { name } => format!("extension:{name}"),
            DbObjectId::Aggregate {
                schema,
                name,
                arguments,
            } => format!("aggregate:{schema}.{name}({arguments})"),
            DbObjectId::EventTrigger { name } => format!("event_trigger:{name}"),
            DbObjectId::Publication { name } => format!("publication:{name}"),
            DbObjectId::Subscription { name } => format!("subscription:{name}"),
            DbObjectId::ForeignDataWrapper { name } => format!("fdw:{name}"),
            DbObjectId::ForeignServer { name } => format!("server:{name}"),
            DbObjectId::UserMapping { server, user } => format!("user_mapping:{server}.{user}"),
            DbObjectId::ForeignTable { schema, name } => format!("foreign_table:{schema}.{name}"),
            DbObjectId::Membership { role, member } => format!("membership:{role}:{member}"),
            DbObjectId::DefaultAcl {
                role,
                schema,
                objtype,
                grantee,
            } => format!(
                "defacl:{role}:{}:{objtype}:{grantee}",
                schema.as_deref().unwrap_or("*")
            ),
        }
    }
}

pub trait DependsOn {
    fn id(&self) -> DbObjectId;
    fn depends_on(&self) -> &[DbObjectId];
}
