//! Closed set of diagnostic codes surfaced by the differ/planner pipeline and the declarative
//! apply engine. Unlike a `tracing::warn!`, a `Diagnostic` is a value: callers (and tests) can
//! collect, filter and assert on them instead of scraping log output.

use crate::catalog::id::DbObjectId;
use serde::Serialize;

/// A reference to an object mentioned by a diagnostic, not necessarily one that exists in
/// either catalog (e.g. an unresolved dependency's name comes from the SQL text itself).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectRef {
    pub kind: String,
    pub name: String,
}

impl ObjectRef {
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
        }
    }
}

impl From<&DbObjectId> for ObjectRef {
    fn from(id: &DbObjectId) -> Self {
        let stable = id.to_stable_id();
        match stable.split_once(':') {
            Some((kind, name)) => ObjectRef::new(kind, name),
            None => ObjectRef::new("object", stable),
        }
    }
}

/// One of the eight diagnostic codes this system can emit. Every variant carries exactly the
/// fields relevant to that code; `message` is always a one-line human-readable summary suitable
/// for a CLI, `details` is free-form and only meant for `--verbose` output or logs.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "code")]
pub enum Diagnostic {
    /// A statement failed to parse (declarative apply engine, `declarative::parse`).
    ParseError {
        message: String,
        statement_id: String,
        details: Option<String>,
    },
    /// A parsed statement's AST root didn't map to any known `StatementClass`
    /// (`declarative::classify`).
    UnknownStatementClass {
        message: String,
        statement_id: String,
        details: Option<String>,
    },
    /// More than one statement claims to produce the same object identity.
    DuplicateProducer {
        message: String,
        object_refs: Vec<ObjectRef>,
        suggested_fix: Option<String>,
    },
    /// A statement requires an object no known producer supplies, and it isn't a built-in or
    /// already present in the target catalog/database.
    UnresolvedDependency {
        message: String,
        statement_id: Option<String>,
        object_refs: Vec<ObjectRef>,
        suggested_fix: Option<String>,
    },
    /// Toposort could not make progress: one or more steps form a cycle. Carries every node in
    /// the strongly-connected component, not just the first edge found.
    CycleDetected {
        message: String,
        object_refs: Vec<ObjectRef>,
    },
    /// A statement failed at execution time with a non-deferrable SQLSTATE.
    RuntimeExecutionError {
        message: String,
        statement_id: String,
        details: Option<String>,
    },
    /// A dependency was missing from the catalog but matched a known built-in/system object, so
    /// diffing proceeded on the assumption it's provided by the runtime environment.
    RuntimeAssumedExternalDependency {
        message: String,
        object_refs: Vec<ObjectRef>,
    },
    /// A feature of the target environment (extension, role, FDW) that this tool cannot verify
    /// without connecting, surfaced so the caller can choose to proceed or abort.
    RuntimeEnvironmentLimitation {
        message: String,
        details: Option<String>,
    },
}

impl Diagnostic {
    /// Short discriminant name, stable across versions, used in log lines and test assertions.
    pub fn code(&self) -> &'static str {
        match self {
            Diagnostic::ParseError { .. } => "PARSE_ERROR",
            Diagnostic::UnknownStatementClass { .. } => "UNKNOWN_STATEMENT_CLASS",
            Diagnostic::DuplicateProducer { .. } => "DUPLICATE_PRODUCER",
            Diagnostic::UnresolvedDependency { .. } => "UNRESOLVED_DEPENDENCY",
            Diagnostic::CycleDetected { .. } => "CYCLE_DETECTED",
            Diagnostic::RuntimeExecutionError { .. } => "RUNTIME_EXECUTION_ERROR",
            Diagnostic::RuntimeAssumedExternalDependency { .. } => {
                "RUNTIME_ASSUMED_EXTERNAL_DEPENDENCY"
            }
            Diagnostic::RuntimeEnvironmentLimitation { .. } => "RUNTIME_ENVIRONMENT_LIMITATION",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Diagnostic::ParseError { message, .. }
            | Diagnostic::UnknownStatementClass { message, .. }
            | Diagnostic::DuplicateProducer { message, .. }
            | Diagnostic::UnresolvedDependency { message, .. }
            | Diagnostic::CycleDetected { message, .. }
            | Diagnostic::RuntimeExecutionError { message, .. }
            | Diagnostic::RuntimeAssumedExternalDependency { message, .. }
            | Diagnostic::RuntimeEnvironmentLimitation { message, .. } => message,
        }
    }
}
