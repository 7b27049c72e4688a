//! Hierarchical and scalable migration operations
//!
//! This module provides a more maintainable approach to migration steps
//! using hierarchical enums and trait-based rendering.

use crate::catalog::id::DbObjectId;

// Re-export SqlRenderer from render module
pub use crate::render::SqlRenderer;

pub use aggregate::*;
pub use collation::*;
pub use comments::*;
pub use constraint::*;
pub use default_privilege::*;
pub use domain::*;
pub use event_trigger::*;
pub use extension::*;
pub use foreign::*;
pub use function::*;
pub use grant::*;
pub use index::*;
pub use language::*;
pub use materialized_view::*;
pub use membership::*;
pub use policy::*;
pub use publication::*;
pub use role::*;
pub use rule::*;
pub use schema::*;
pub use sequence::*;
pub use subscription::*;
pub use table::*;
pub use trigger::*;
pub use types::*;
pub use view::*;

pub mod aggregate;
pub mod collation;
pub mod comments;
pub mod constraint;
pub mod default_privilege;
pub mod domain;
pub mod event_trigger;
pub mod extension;
pub mod foreign;
pub mod function;
pub mod grant;
pub mod index;
pub mod language;
pub mod materialized_view;
pub mod membership;
pub mod policy;
pub mod publication;
pub mod role;
pub mod rule;
pub mod schema;
pub mod sequence;
pub mod subscription;
pub mod table;
pub mod trigger;
pub mod types;
pub mod view;

/// Coarse classification of an operation used by cascade expansion and ordering to tell
/// drops, creates and in-place alters apart without matching on every concrete variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Create,
    Alter,
    Drop,
}

/// Main migration step - hierarchical structure for scalability
#[derive(Debug, Clone)]
pub enum MigrationStep {
    Schema(SchemaOperation),
    Table(TableOperation),
    View(ViewOperation),
    MaterializedView(MaterializedViewOperation),
    Type(TypeOperation),
    Domain(DomainOperation),
    Sequence(SequenceOperation),
    Function(FunctionOperation),
    Aggregate(AggregateOperation),
    Index(IndexOperation),
    Constraint(ConstraintOperation),
    Trigger(TriggerOperation),
    Extension(ExtensionOperation),
    Grant(GrantOperation),
    Policy(PolicyOperation),
    Role(RoleOperation),
    Language(LanguageOperation),
    Collation(CollationOperation),
    Membership(MembershipOperation),
    EventTrigger(EventTriggerOperation),
    Publication(PublicationOperation),
    Subscription(SubscriptionOperation),
    Rule(RuleOperation),
    DefaultPrivilege(DefaultPrivilegeOperation),
    ForeignDataWrapper(ForeignDataWrapperOperation),
    ForeignServer(ForeignServerOperation),
    UserMapping(UserMappingOperation),
    ForeignTable(ForeignTableOperation),
}

impl MigrationStep {
    /// Returns the database object ID for this migration step
    pub fn id(&self) -> DbObjectId {
        self.db_object_id()
    }

    /// Returns true if this step is a destructive operation (drop)
    pub fn is_drop(&self) -> bool {
        self.is_destructive()
    }

    /// Returns true if this step is a create operation
    pub fn is_create(&self) -> bool {
        matches!(
            self,
            MigrationStep::Schema(SchemaOperation::Create { .. })
                | MigrationStep::Extension(ExtensionOperation::Create { .. })
                | MigrationStep::Table(TableOperation::Create { .. })
                | MigrationStep::View(ViewOperation::Create { .. })
                | MigrationStep::MaterializedView(MaterializedViewOperation::Create { .. })
                | MigrationStep::Type(TypeOperation::Create { .. })
                | MigrationStep::Domain(DomainOperation::Create { .. })
                | MigrationStep::Sequence(SequenceOperation::Create { .. })
                | MigrationStep::Function(FunctionOperation::Create { .. })
                | MigrationStep::Aggregate(AggregateOperation::Create { .. })
                | MigrationStep::Index(IndexOperation::Create { .. })
                | MigrationStep::Constraint(ConstraintOperation::Create(_))
                | MigrationStep::Trigger(TriggerOperation::Create { .. })
                | MigrationStep::Grant(GrantOperation::Grant { .. })
                | MigrationStep::Policy(PolicyOperation::Create { .. })
                | MigrationStep::Role(RoleOperation::Create { .. })
                | MigrationStep::Language(LanguageOperation::Create { .. })
                | MigrationStep::Collation(CollationOperation::Create { .. })
                | MigrationStep::Membership(MembershipOperation::Grant { .. })
                | MigrationStep::EventTrigger(EventTriggerOperation::Create { .. })
                | MigrationStep::Publication(PublicationOperation::Create { .. })
                | MigrationStep::Rule(RuleOperation::Create { .. })
                | MigrationStep::DefaultPrivilege(DefaultPrivilegeOperation::Grant { .. })
                | MigrationStep::ForeignDataWrapper(ForeignDataWrapperOperation::Create { .. })
                | MigrationStep::ForeignServer(ForeignServerOperation::Create { .. })
                | MigrationStep::UserMapping(UserMappingOperation::Create { .. })
                | MigrationStep::ForeignTable(ForeignTableOperation::Create { .. })
        )
    }

    /// Returns the coarse create/alter/drop classification for this step, dispatching to the
    /// inner operation's own `operation_kind()`.
    pub fn operation_kind(&self) -> OperationKind {
        match self {
            MigrationStep::Schema(op) => op.operation_kind(),
            MigrationStep::Table(op) => op.operation_kind(),
            MigrationStep::View(op) => op.operation_kind(),
            MigrationStep::MaterializedView(op) => op.operation_kind(),
            MigrationStep::Type(op) => op.operation_kind(),
            MigrationStep::Domain(op) => op.operation_kind(),
            MigrationStep::Sequence(op) => op.operation_kind(),
            MigrationStep::Function(op) => op.operation_kind(),
            MigrationStep::Aggregate(op) => op.operation_kind(),
            MigrationStep::Index(op) => op.operation_kind(),
            MigrationStep::Constraint(op) => op.operation_kind(),
            MigrationStep::Trigger(op) => op.operation_kind(),
            MigrationStep::Extension(op) => op.operation_kind(),
            MigrationStep::Grant(op) => op.operation_kind(),
            MigrationStep::Policy(op) => op.operation_kind(),
            MigrationStep::Role(op) => op.operation_kind(),
            MigrationStep::Language(op) => op.operation_kind(),
            MigrationStep::Collation(op) => op.operation_kind(),
            MigrationStep::Membership(op) => op.operation_kind(),
            MigrationStep::EventTrigger(op) => op.operation_kind(),
            MigrationStep::Publication(op) => op.operation_kind(),
            MigrationStep::Subscription(op) => op.operation_kind(),
            MigrationStep::Rule(op) => op.operation_kind(),
            MigrationStep::DefaultPrivilege(op) => op.operation_kind(),
            MigrationStep::ForeignDataWrapper(op) => op.operation_kind(),
            MigrationStep::ForeignServer(op) => op.operation_kind(),
            MigrationStep::UserMapping(op) => op.operation_kind(),
            MigrationStep::ForeignTable(op) => op.operation_kind(),
        }
    }

    /// Returns true if this step is a "relationship" step that creates circular dependencies
    /// These steps should be executed in a second phase after all primary object creation
    pub fn is_relationship(&self) -> bool {
        match self {
            MigrationStep::Sequence(SequenceOperation::AlterOwnership { .. }) => true,
            MigrationStep::Constraint(ConstraintOperation::Create(constraint)) => {
                matches!(
                    constraint.constraint_type,
                    crate::catalog::constraint::ConstraintType::ForeignKey { .. }
                )
            }
            _ => false,
        }
    }

    /// Returns step-level dependencies that may not be in the catalog's forward_deps.
    /// This is used for dynamically generated steps (like REVOKE for missing defaults)
    /// that aren't part of the catalog but still need proper ordering.
    pub fn dependencies(&self) -> Vec<DbObjectId> {
        match self {
            MigrationStep::Grant(
                GrantOperation::Grant { grant }
                | GrantOperation::Revoke { grant }
                | GrantOperation::RevokeGrantOption { grant },
            ) => grant.depends_on.clone(),
            // Other operations use catalog.forward_deps exclusively
            _ => vec![],
        }
    }
}
