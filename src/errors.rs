//! Typed error domains for the three library boundaries callers need to match on
//! programmatically: catalog/parse extraction, differ invariants, and declarative apply
//! execution. Command-level orchestration still flows through `anyhow::Result` (see
//! `commands/*`); these types are what gets wrapped there via `anyhow::Error::from`.

use thiserror::Error;

/// Failures while loading or parsing a catalog, or while splitting/parsing a declarative SQL
/// file. Non-fatal to the overall pipeline: the caller attaches one of these to a
/// `Diagnostic::ParseError` and continues with the remaining files/statements.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to connect to database: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("failed to query catalog: {0}")]
    Query(#[source] sqlx::Error),

    #[error("failed to parse SQL in {file}: {message}")]
    Parse { file: String, message: String },

    #[error("unsupported server version {version}: pgmt requires PostgreSQL 13 or newer")]
    UnsupportedServerVersion { version: i32 },
}

/// Invariant violations detected while diffing two catalogs. These are fatal: `diff_all` (or a
/// per-kind differ) returns `Err` and the caller aborts the whole comparison rather than
/// emitting a migration that would be wrong.
#[derive(Debug, Error)]
pub enum DifferError {
    #[error("grant on {object} has inconsistent grantable flag across grantees")]
    MixedGrantableFlag { object: String },

    #[error("{kind} '{identifier}' changed its identity fields but no rename path exists")]
    UnrepresentableRename { kind: String, identifier: String },

    #[error("dependency cycle detected among: {}", objects.join(", "))]
    DependencyCycle { objects: Vec<String> },

    #[error("duplicate producer for {object_id}: {first} and {second}")]
    DuplicateProducer {
        object_id: String,
        first: String,
        second: String,
    },
}

/// A failure to execute one statement of a declarative apply run, carrying the PostgreSQL
/// SQLSTATE so the round-based executor can decide whether to defer or fail hard.
#[derive(Debug, Error)]
#[error("{message} (sqlstate {sqlstate:?})")]
pub struct ApplyError {
    pub message: String,
    pub sqlstate: Option<String>,
    #[source]
    pub source: sqlx::Error,
}

impl ApplyError {
    pub fn from_sqlx(source: sqlx::Error) -> Self {
        let sqlstate = source
            .as_database_error()
            .and_then(|e| e.code())
            .map(|c| c.to_string());
        let message = source.to_string();
        Self {
            message,
            sqlstate,
            source,
        }
    }

    /// SQLSTATEs that indicate a dependency wasn't ready yet, meaning the statement is a good
    /// candidate for deferral to a later round rather than a hard failure:
    /// `undefined_table`, `undefined_column`, `undefined_function`, `undefined_object`,
    /// `invalid_schema_name`.
    pub fn is_deferrable(&self) -> bool {
        matches!(
            self.sqlstate.as_deref(),
            Some("42P01") | Some("42703") | Some("42883") | Some("42704") | Some("3F000")
        )
    }
}
