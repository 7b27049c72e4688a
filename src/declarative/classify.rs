//! Maps a parsed statement's AST root to one of the statement classes the rest of the
//! declarative pipeline reasons about: phase assignment (`toposort`), ordering weight, and
//! whether a statement is a candidate producer of an object at all.

use crate::diagnostics::Diagnostic;
use crate::declarative::parse::ParsedStatement;
use pg_query::NodeEnum;

/// One of the statement shapes the declarative apply engine understands. Every variant maps to
/// exactly one pg_dump-style phase (`phase()`) and ordering weight (`weight()`); unmatched nodes
/// become `Other` and still get a best-effort phase (`post_data`) rather than blocking the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StatementClass {
    Role,
    Schema,
    Extension,
    Language,
    ForeignDataWrapper,
    ForeignServer,
    UserMapping,
    VariableSet,
    Do,
    Type,
    Domain,
    Collation,
    Sequence,
    Table,
    ForeignTable,
    View,
    MaterializedView,
    Index,
    Constraint,
    Trigger,
    Rule,
    Function,
    Aggregate,
    Policy,
    EventTrigger,
    Publication,
    Subscription,
    Comment,
    Grant,
    Revoke,
    AlterDefaultPrivileges,
    AlterTable,
    AlterType,
    AlterSequence,
    CreateSchemaBody,
    Other,
}

impl StatementClass {
    /// pg_dump-style phase bucket used by `declarative::toposort`'s phase table.
    pub fn phase(self) -> Phase {
        use StatementClass::*;
        match self {
            Role | Schema | Extension | Language | ForeignDataWrapper | ForeignServer
            | UserMapping | VariableSet | Do => Phase::Bootstrap,
            Type | Domain | Collation | Sequence => Phase::PreData,
            Table | ForeignTable | View | MaterializedView | AlterTable | AlterType
            | AlterSequence | CreateSchemaBody => Phase::DataStructures,
            Function | Aggregate => Phase::Routines,
            Index | Constraint | Trigger | Rule | Policy | EventTrigger | Publication
            | Subscription | Comment | Other => Phase::PostData,
            Grant | Revoke | AlterDefaultPrivileges => Phase::Privileges,
        }
    }

    /// pg_dump-inspired tie-break weight within a phase (lower sorts earlier), matching
    /// `role=0, schema=1, extension=2, language=3, FDW=4, server=5, variable_set=6, do=7,
    /// type=10, domain=11, collation=12, sequence=13, ..., grant=52, revoke=53,
    /// alter_default_privileges=54`.
    pub fn weight(self) -> u32 {
        use StatementClass::*;
        match self {
            Role => 0,
            Schema => 1,
            Extension => 2,
            Language => 3,
            ForeignDataWrapper => 4,
            ForeignServer => 5,
            VariableSet => 6,
            Do => 7,
            UserMapping => 8,
            Type => 10,
            Domain => 11,
            Collation => 12,
            Sequence => 13,
            Table => 20,
            ForeignTable => 21,
            CreateSchemaBody => 22,
            View => 23,
            MaterializedView => 24,
            AlterTable => 25,
            AlterType => 26,
            AlterSequence => 27,
            Constraint => 30,
            Index => 31,
            Function => 40,
            Aggregate => 41,
            Trigger => 42,
            Rule => 43,
            Policy => 44,
            EventTrigger => 45,
            Publication => 46,
            Subscription => 47,
            Comment => 50,
            Grant => 52,
            Revoke => 53,
            AlterDefaultPrivileges => 54,
            Other => 60,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Bootstrap,
    PreData,
    DataStructures,
    Routines,
    PostData,
    Privileges,
}

impl Phase {
    pub fn rank(self) -> u8 {
        match self {
            Phase::Bootstrap => 0,
            Phase::PreData => 1,
            Phase::DataStructures => 2,
            Phase::Routines => 3,
            Phase::PostData => 4,
            Phase::Privileges => 5,
        }
    }
}

/// Classifies every statement, returning the class list in the same order as `statements` and
/// one `Diagnostic::UnknownStatementClass` per statement that couldn't be mapped (it's still
/// included as `StatementClass::Other`, not dropped).
pub fn classify_all(statements: &[ParsedStatement]) -> (Vec<StatementClass>, Vec<Diagnostic>) {
    let mut classes = Vec::with_capacity(statements.len());
    let mut diagnostics = Vec::new();

    for stmt in statements {
        let class = classify_one(&stmt.root);
        if class == StatementClass::Other {
            diagnostics.push(Diagnostic::UnknownStatementClass {
                message: format!("statement {} did not match a known class", stmt.id),
                statement_id: stmt.id.to_string(),
                details: Some(stmt.sql.clone()),
            });
        }
        classes.push(class);
    }

    (classes, diagnostics)
}

fn classify_one(node: &NodeEnum) -> StatementClass {
    use StatementClass::*;
    match node {
        NodeEnum::CreateRoleStmt(_) | NodeEnum::AlterRoleStmt(_) | NodeEnum::DropRoleStmt(_) => {
            Role
        }
        NodeEnum::CreateSchemaStmt(_) => Schema,
        NodeEnum::CreateExtensionStmt(_) | NodeEnum::AlterExtensionStmt(_) => Extension,
        NodeEnum::CreatePlangStmt(_) => Language,
        NodeEnum::CreateFdwStmt(_) => ForeignDataWrapper,
        NodeEnum::CreateForeignServerStmt(_) => ForeignServer,
        NodeEnum::CreateUserMappingStmt(_) => UserMapping,
        NodeEnum::VariableSetStmt(_) => VariableSet,
        NodeEnum::DoStmt(_) => Do,
        NodeEnum::CompositeTypeStmt(_)
        | NodeEnum::CreateEnumStmt(_)
        | NodeEnum::CreateRangeStmt(_) => Type,
        NodeEnum::AlterEnumStmt(_) => AlterType,
        NodeEnum::CreateDomainStmt(_) => Domain,
        NodeEnum::DefineStmt(def) if def.kind() == pg_query::protobuf::ObjectType::ObjectCollation => {
            Collation
        }
        NodeEnum::CreateSeqStmt(_) => Sequence,
        NodeEnum::AlterSeqStmt(_) => AlterSequence,
        NodeEnum::CreateStmt(_) => Table,
        NodeEnum::CreateForeignTableStmt(_) => ForeignTable,
        NodeEnum::ViewStmt(_) => View,
        NodeEnum::CreateTableAsStmt(_) => MaterializedView,
        NodeEnum::AlterTableStmt(_) => AlterTable,
        NodeEnum::IndexStmt(_) => Index,
        NodeEnum::CreateTrigStmt(_) => Trigger,
        NodeEnum::RuleStmt(_) => Rule,
        NodeEnum::CreateFunctionStmt(_) => Function,
        NodeEnum::DefineStmt(def) if def.kind() == pg_query::protobuf::ObjectType::ObjectAggregate => {
            Aggregate
        }
        NodeEnum::CreatePolicyStmt(_) => Policy,
        NodeEnum::CreateEventTrigStmt(_) => EventTrigger,
        NodeEnum::CreatePublicationStmt(_) => Publication,
        NodeEnum::CreateSubscriptionStmt(_) => Subscription,
        NodeEnum::CommentStmt(_) => Comment,
        NodeEnum::GrantStmt(grant) => {
            if grant.is_grant {
                Grant
            } else {
                Revoke
            }
        }
        NodeEnum::AlterDefaultPrivilegesStmt(_) => AlterDefaultPrivileges,
        _ => Other,
    }
}
