//! Generalized filter/serialize rules applied to the change list after the differ runs, before
//! the pre-sort. `config::filter::ObjectFilter` decides which *catalog objects* pgmt manages at
//! all; `FilterPattern`/`SerializeRule` decide, per generated change, whether it's kept in a
//! script and which `SerializeOptions` render it with — the same include/exclude glob shape as
//! `ObjectFilter`, generalized to match on the change itself rather than only schema/table name.

use crate::catalog::id::DbObjectId;
use crate::diff::operations::{GrantOperation, MigrationStep, OperationKind};
use glob::Pattern;
use serde::{Deserialize, Serialize};

/// A single predicate over a generated change. Every present field must match for the pattern as
/// a whole to match; an absent field imposes no constraint. `schema`/`name` are glob patterns in
/// the same style as `ObjectFilter`'s include/exclude lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterPattern {
    pub object_type: Option<String>,
    pub schema: Option<String>,
    pub operation: Option<Operation>,
    pub scope: Option<ChangeScope>,
    pub owner: Option<Vec<String>>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Alter,
    Drop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeScope {
    Object,
    Comment,
    Privilege,
    Membership,
    DefaultPrivilege,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SerializeOptions {
    #[serde(default)]
    pub skip_authorization: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializeRule {
    pub when: FilterPattern,
    pub options: SerializeOptions,
}

impl From<OperationKind> for Operation {
    fn from(kind: OperationKind) -> Self {
        match kind {
            OperationKind::Create => Operation::Create,
            OperationKind::Alter => Operation::Alter,
            OperationKind::Drop => Operation::Drop,
        }
    }
}

fn change_scope(step: &MigrationStep) -> ChangeScope {
    use crate::diff::operations as ops;
    if matches!(step, MigrationStep::Grant(_)) {
        return ChangeScope::Privilege;
    }
    if matches!(step, MigrationStep::Membership(_)) {
        return ChangeScope::Membership;
    }
    if matches!(step, MigrationStep::DefaultPrivilege(_)) {
        return ChangeScope::DefaultPrivilege;
    }
    let is_comment = matches!(
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
    );
    if is_comment {
        ChangeScope::Comment
    } else {
        ChangeScope::Object
    }
}

/// The object-type tag a `FilterPattern.object_type` string is matched against, e.g. "table",
/// "view", "function". Deliberately not the directory names `declarative::export` uses (those
/// pluralize some kinds for subdirectories; this is the singular per-change kind name).
fn object_type_name(step: &MigrationStep) -> &'static str {
    match step {
        MigrationStep::Schema(_) => "schema",
        MigrationStep::Table(_) => "table",
        MigrationStep::View(_) => "view",
        MigrationStep::MaterializedView(_) => "materialized_view",
        MigrationStep::Type(_) => "type",
        MigrationStep::Domain(_) => "domain",
        MigrationStep::Sequence(_) => "sequence",
        MigrationStep::Function(_) => "function",
        MigrationStep::Aggregate(_) => "aggregate",
        MigrationStep::Index(_) => "index",
        MigrationStep::Constraint(_) => "constraint",
        MigrationStep::Trigger(_) => "trigger",
        MigrationStep::Extension(_) => "extension",
        MigrationStep::Grant(_) => "grant",
        MigrationStep::Policy(_) => "policy",
        MigrationStep::Role(_) => "role",
        MigrationStep::Language(_) => "language",
        MigrationStep::Collation(_) => "collation",
        MigrationStep::Membership(_) => "membership",
        MigrationStep::EventTrigger(_) => "event_trigger",
        MigrationStep::Publication(_) => "publication",
        MigrationStep::Subscription(_) => "subscription",
        MigrationStep::Rule(_) => "rule",
        MigrationStep::DefaultPrivilege(_) => "default_privilege",
        MigrationStep::ForeignDataWrapper(_) => "foreign_data_wrapper",
        MigrationStep::ForeignServer(_) => "foreign_server",
        MigrationStep::UserMapping(_) => "user_mapping",
        MigrationStep::ForeignTable(_) => "foreign_table",
    }
}

/// The owner `FilterPattern.owner` can match against, when the change itself carries one. Only
/// grants currently carry an owner (`Grant::object_owner`); other kinds have no per-change owner
/// available post-diff, so an `owner` constraint never matches them.
fn change_owner(step: &MigrationStep) -> Option<&str> {
    match step {
        MigrationStep::Grant(
            GrantOperation::Grant { grant }
            | GrantOperation::Revoke { grant }
            | GrantOperation::RevokeGrantOption { grant },
        ) => Some(grant.object_owner.as_str()),
        _ => None,
    }
}

fn object_name(id: &DbObjectId) -> String {
    let stable = id.to_stable_id();
    stable.rsplit_once('.').map(|(_, n)| n.to_string()).unwrap_or(stable)
}

fn glob_matches(pattern: &str, value: &str) -> bool {
    Pattern::new(pattern).map(|p| p.matches(value)).unwrap_or(false)
}

impl FilterPattern {
    /// Whether `step` matches every constraint this pattern sets. An empty pattern matches
    /// everything.
    pub fn matches(&self, step: &MigrationStep) -> bool {
        let id = step.id();

        if let Some(object_type) = &self.object_type {
            if object_type != object_type_name(step) {
                return false;
            }
        }

        if let Some(schema) = &self.schema {
            match id.schema() {
                Some(actual) if glob_matches(schema, actual) => {}
                _ => return false,
            }
        }

        if let Some(operation) = self.operation {
            if operation != Operation::from(step.operation_kind()) {
                return false;
            }
        }

        if let Some(scope) = self.scope {
            if scope != change_scope(step) {
                return false;
            }
        }

        if let Some(owners) = &self.owner {
            match change_owner(step) {
                Some(actual) if owners.iter().any(|o| o == actual) => {}
                _ => return false,
            }
        }

        if let Some(name) = &self.name {
            if !glob_matches(name, &object_name(&id)) {
                return false;
            }
        }

        true
    }
}

/// Applies a list of patterns as an include/exclude filter over the change list: a change is kept
/// unless it matches one of `exclude`. Mirrors `ObjectFilter::should_include_schema`'s
/// exclude-wins-over-include shape, generalized to the full change.
pub fn filter_changes(
    steps: Vec<MigrationStep>,
    include: &[FilterPattern],
    exclude: &[FilterPattern],
) -> Vec<MigrationStep> {
    steps
        .into_iter()
        .filter(|step| {
            if exclude.iter().any(|p| p.matches(step)) {
                return false;
            }
            include.is_empty() || include.iter().any(|p| p.matches(step))
        })
        .collect()
}

/// Resolves the `SerializeOptions` to use for `step`: the options of the first matching rule, or
/// the default (equivalent to the teacher's existing `to_sql()` behavior) if none match.
pub fn resolve_serialize_options(step: &MigrationStep, rules: &[SerializeRule]) -> SerializeOptions {
    rules
        .iter()
        .find(|rule| rule.when.matches(step))
        .map(|rule| rule.options.clone())
        .unwrap_or_default()
}
