//! Logical pre-sort: groups related changes into a human-readable order before the dependency
//! graph and topological sort run. The topological sort is stable with respect to this order —
//! it only reorders when a real dependency forces it.
//!
//! Sort key, lexicographic over 8 components: phase, schema, effective object type, "main"
//! (parent) stable id, actual object type, scope, operation, original index.

use crate::catalog::id::DbObjectId;
use crate::diff::operations::{MigrationStep, OperationKind};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PresortKey {
    phase: u8,
    schema: String,
    effective_type: u8,
    main_id: String,
    actual_type: u8,
    scope: u8,
    operation: u8,
    original_index: usize,
}

/// Fixed effective-object-type order. Sub-entities (index/trigger/rule/policy/constraint) are
/// mapped to their owning table's rank by `main_id` grouping, not by this table, but still need
/// their own rank here for the `actual_type` component that orders them within the parent block.
fn effective_type_rank(step: &MigrationStep) -> u8 {
    match step {
        MigrationStep::Schema(_) => 0,
        MigrationStep::Extension(_) => 1,
        MigrationStep::Role(_) => 2,
        MigrationStep::Language(_) => 3,
        MigrationStep::ForeignDataWrapper(_) => 4,
        MigrationStep::ForeignServer(_) => 5,
        MigrationStep::UserMapping(_) => 6,
        MigrationStep::Collation(_) => 7,
        MigrationStep::Domain(_) => 8,
        MigrationStep::Type(_) => 9,
        MigrationStep::Sequence(_) => 10,
        MigrationStep::Function(_) => 11,
        MigrationStep::Aggregate(_) => 12,
        MigrationStep::Table(_) => 13,
        MigrationStep::ForeignTable(_) => 14,
        MigrationStep::Index(_) => 15,
        MigrationStep::Constraint(_) => 16,
        MigrationStep::View(_) => 17,
        MigrationStep::MaterializedView(_) => 18,
        MigrationStep::Trigger(_) => 19,
        MigrationStep::Policy(_) => 20,
        MigrationStep::Rule(_) => 21,
        MigrationStep::EventTrigger(_) => 22,
        MigrationStep::Publication(_) => 23,
        MigrationStep::Subscription(_) => 24,
        MigrationStep::Membership(_) => 25,
        MigrationStep::DefaultPrivilege(_) => 26,
        MigrationStep::Grant(_) => 27,
    }
}

/// The "scope" of a change: default_privilege/object/comment/privilege/membership, used for key
/// component 6. Determined by matching the inner operation's shape rather than a stored field,
/// since the teacher's enums don't carry an explicit scope tag.
fn is_comment_scope(step: &MigrationStep) -> bool {
    use crate::diff::operations as ops;
    matches!(
        step,
        MigrationStep::Schema(ops::SchemaOperation::Comment(_))
            | MigrationStep::Collation(ops::CollationOperation::Comment(_))
            | MigrationStep::Language(ops::LanguageOperation::Comment(_))
            | MigrationStep::ForeignDataWrapper(ops::ForeignDataWrapperOperation::Comment(_))
            | MigrationStep::ForeignServer(ops::ForeignServerOperation::Comment(_))
            | MigrationStep::ForeignTable(ops::ForeignTableOperation::Comment(_))
            | MigrationStep::Index(ops::IndexOperation::Comment(_))
            | MigrationStep::Constraint(ops::ConstraintOperation::Comment(_))
            | MigrationStep::Trigger(ops::TriggerOperation::Comment(_))
            | MigrationStep::Policy(ops::PolicyOperation::Comment(_))
            | MigrationStep::Table(ops::TableOperation::Comment(_))
            | MigrationStep::View(ops::ViewOperation::Comment(_))
            | MigrationStep::MaterializedView(ops::MaterializedViewOperation::Comment(_))
            | MigrationStep::Type(ops::TypeOperation::Comment(_))
            | MigrationStep::Domain(ops::DomainOperation::Comment(_))
            | MigrationStep::Function(ops::FunctionOperation::Comment(_))
            | MigrationStep::Aggregate(ops::AggregateOperation::Comment(_))
            | MigrationStep::Sequence(ops::SequenceOperation::Comment(_))
            | MigrationStep::Extension(ops::ExtensionOperation::Comment(_))
    )
}

fn scope_rank(step: &MigrationStep, is_drop: bool) -> u8 {
    let scope = if matches!(step, MigrationStep::Grant(_)) {
        Scope::Privilege
    } else if matches!(step, MigrationStep::Membership(_)) {
        Scope::Membership
    } else if matches!(step, MigrationStep::DefaultPrivilege(_)) {
        Scope::DefaultPrivilege
    } else if is_comment_scope(step) {
        Scope::Comment
    } else {
        Scope::Object
    };

    if is_drop {
        match scope {
            Scope::Privilege => 1,
            Scope::Comment => 2,
            Scope::Object => 3,
            Scope::DefaultPrivilege | Scope::Membership => 4,
        }
    } else {
        match scope {
            Scope::DefaultPrivilege => 1,
            Scope::Object => 2,
            Scope::Comment => 3,
            Scope::Privilege => 4,
            Scope::Membership => 5,
        }
    }
}

enum Scope {
    Object,
    Comment,
    Privilege,
    Membership,
    DefaultPrivilege,
}

/// Stable id of the object this change should cluster under — a table for its indexes,
/// constraints, triggers, policies and rules; itself otherwise.
fn main_id(step: &MigrationStep) -> String {
    let id = step.id();
    let owning_table = match &id {
        DbObjectId::Constraint { schema, table, .. }
        | DbObjectId::Trigger { schema, table, .. }
        | DbObjectId::Policy { schema, table, .. }
        | DbObjectId::Rule { schema, table, .. } => Some(DbObjectId::Table {
            schema: schema.clone(),
            name: table.clone(),
        }),
        DbObjectId::Comment { object_id } => return object_id.to_stable_id(),
        _ => None,
    };
    owning_table
        .unwrap_or(id)
        .to_stable_id()
}

/// Phase of a change: drop-phase changes sort before create/alter-phase ones. An ALTER counts as
/// drop-phase only if it's itself classified as a drop by `operation_kind()` (this crate doesn't
/// split single ALTER statements into drop-shaped sub-actions the way spec.md's source language
/// does for DROP COLUMN/DROP CONSTRAINT, since those are already separate `ConstraintOperation`
/// / `TableOperation::Alter` actions rendered together).
fn phase(step: &MigrationStep) -> u8 {
    match step.operation_kind() {
        OperationKind::Drop => 0,
        OperationKind::Create | OperationKind::Alter => 1,
    }
}

fn operation_rank(step: &MigrationStep) -> u8 {
    match step.operation_kind() {
        OperationKind::Create => 1,
        OperationKind::Alter => 2,
        OperationKind::Drop => 3,
    }
}

pub fn presort_key(step: &MigrationStep, original_index: usize) -> PresortKey {
    let id = step.id();
    let schema = id.schema().unwrap_or("").to_string();
    let is_drop = matches!(step.operation_kind(), OperationKind::Drop);

    PresortKey {
        phase: phase(step),
        schema,
        effective_type: effective_type_rank(step),
        main_id: main_id(step),
        actual_type: effective_type_rank(step),
        scope: scope_rank(step, is_drop),
        operation: operation_rank(step),
        original_index,
    }
}

/// Sort steps by the logical pre-sort key, stably. This is a readability pass only: the
/// dependency graph and topological sort (`diff::graph`, `diff::toposort`) are what guarantee
/// correctness, and they preserve this order whenever dependencies allow it.
pub fn presort(steps: Vec<MigrationStep>) -> Vec<MigrationStep> {
    let mut keyed: Vec<(PresortKey, MigrationStep)> = steps
        .into_iter()
        .enumerate()
        .map(|(i, step)| (presort_key(&step, i), step))
        .collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.into_iter().map(|(_, step)| step).collect()
}
