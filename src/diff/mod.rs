pub mod aggregates;
pub mod cascade;
pub mod collations;
pub mod columns;
pub mod comment_utils;
pub mod constraints;
pub mod custom_types;
pub mod default_privileges;
pub mod domains;
pub mod event_triggers;
pub mod extensions;
pub mod foreign;
pub mod functions;
pub mod grants;
pub mod graph;
pub mod indexes;
pub mod languages;
pub mod materialized_views;
pub mod memberships;
pub mod operations;
pub mod policies;
pub mod presort;
pub mod publications;
pub mod roles;
pub mod rules;
pub mod schemas;
pub mod sequences;
pub mod subscriptions;
pub mod tables;
pub mod toposort;
pub mod triggers;
pub mod views;

use crate::catalog::id::DbObjectId;
use crate::catalog::{
    Catalog, aggregate::Aggregate, constraint::Constraint, custom_type::CustomType, domain::Domain,
    extension::Extension, function::Function, index::Index, materialized_view::MaterializedView,
    sequence::Sequence, table::Table, view::View,
};
use crate::diff::operations::MigrationStep;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

pub fn diff_all(old: &Catalog, new: &Catalog) -> Vec<MigrationStep> {
    info!("Diffing catalogs...");
    let mut out = Vec::new();

    out.extend(diff_list(
        &old.schemas,
        &new.schemas,
        |s| DbObjectId::Schema {
            name: s.name.clone(),
        },
        schemas::diff,
    ));

    out.extend(diff_list(
        &old.extensions,
        &new.extensions,
        Extension::id,
        extensions::diff,
    ));

    out.extend(diff_list(
        &old.types,
        &new.types,
        CustomType::id,
        custom_types::diff,
    ));

    out.extend(diff_list(
        &old.domains,
        &new.domains,
        Domain::id,
        domains::diff,
    ));

    out.extend(diff_list(
        &old.sequences,
        &new.sequences,
        Sequence::id,
        sequences::diff,
    ));

    out.extend(diff_list(&old.tables, &new.tables, Table::id, tables::diff));

    out.extend(diff_list(
        &old.indexes,
        &new.indexes,
        Index::id,
        indexes::diff,
    ));

    out.extend(diff_list(
        &old.constraints,
        &new.constraints,
        Constraint::id,
        constraints::diff,
    ));

    out.extend(diff_list(
        &old.triggers,
        &new.triggers,
        |t| t.id(),
        triggers::diff,
    ));

    out.extend(diff_list(&old.views, &new.views, View::id, views::diff));

    out.extend(diff_list(
        &old.materialized_views,
        &new.materialized_views,
        MaterializedView::id,
        materialized_views::diff,
    ));

    out.extend(diff_list(
        &old.functions,
        &new.functions,
        Function::id,
        functions::diff,
    ));

    out.extend(diff_list(
        &old.aggregates,
        &new.aggregates,
        Aggregate::id,
        aggregates::diff,
    ));

    out.extend(diff_list(
        &old.policies,
        &new.policies,
        |p| p.id(),
        policies::diff,
    ));

    out.extend(diff_list(&old.roles, &new.roles, |r| r.id(), roles::diff));

    out.extend(diff_list(
        &old.languages,
        &new.languages,
        |l| l.id(),
        languages::diff,
    ));

    out.extend(diff_list(
        &old.collations,
        &new.collations,
        |c| c.id(),
        collations::diff,
    ));

    out.extend(diff_list(
        &old.memberships,
        &new.memberships,
        |m| m.id(),
        memberships::diff,
    ));

    out.extend(diff_list(
        &old.event_triggers,
        &new.event_triggers,
        |e| e.id(),
        event_triggers::diff,
    ));

    out.extend(diff_list(
        &old.publications,
        &new.publications,
        |p| p.id(),
        publications::diff,
    ));

    out.extend(diff_list(
        &old.subscriptions,
        &new.subscriptions,
        |s| s.id(),
        subscriptions::diff,
    ));

    out.extend(diff_list(&old.rules, &new.rules, |r| r.id(), rules::diff));

    out.extend(diff_list(
        &old.default_acls,
        &new.default_acls,
        |a| a.id(),
        default_privileges::diff,
    ));

    out.extend(diff_list(
        &old.foreign_data_wrappers,
        &new.foreign_data_wrappers,
        |f| f.id(),
        foreign::diff_fdw,
    ));

    out.extend(diff_list(
        &old.foreign_servers,
        &new.foreign_servers,
        |s| s.id(),
        foreign::diff_server,
    ));

    out.extend(diff_list(
        &old.user_mappings,
        &new.user_mappings,
        |m| m.id(),
        foreign::diff_user_mapping,
    ));

    out.extend(diff_list(
        &old.foreign_tables,
        &new.foreign_tables,
        |t| t.id(),
        foreign::diff_foreign_table,
    ));

    out.extend(grants::diff_grants(&old.grants, &new.grants));

    info!("Diff complete");
    out
}

pub fn diff_list<T, I: Eq + Ord + Clone, R>(
    old: &[T],
    new: &[T],
    id_of: impl Fn(&T) -> I,
    diff_fn: impl Fn(Option<&T>, Option<&T>) -> Vec<R>,
) -> Vec<R> {
    let mut old_map = BTreeMap::new();
    let mut new_map = BTreeMap::new();
    for o in old {
        old_map.insert(id_of(o), o);
    }
    for n in new {
        new_map.insert(id_of(n), n);
    }

    let all_ids: BTreeSet<_> = old_map.keys().chain(new_map.keys()).cloned().collect();

    all_ids
        .into_iter()
        .flat_map(|id| diff_fn(old_map.get(&id).cloned(), new_map.get(&id).cloned()))
        .collect()
}

/// Topo-sort the steps by their `dependencies()` using a multi-phase approach
/// Phase 1: Primary object creation/modification (schemas, extensions, tables, views, etc.)
/// Phase 2: Relationship establishment (sequence ownership, foreign keys, etc.)
/// Uses old_catalog for drop steps, and new_catalog for create/alter steps
pub fn diff_order(
    steps: Vec<MigrationStep>,
    old_catalog: &Catalog,
    new_catalog: &Catalog,
) -> anyhow::Result<Vec<MigrationStep>> {
    info!("Ordering migration steps...");
    let mut primary_steps = Vec::new();
    let mut relationship_steps = Vec::new();

    for step in steps {
        if step.is_relationship() {
            relationship_steps.push(step);
        } else {
            primary_steps.push(step);
        }
    }

    // Order primary steps (includes extensions, schemas, tables, etc.)
    let mut ordered_steps = order_steps_by_dependencies(primary_steps, old_catalog, new_catalog)?;

    // Then add ordered relationship steps
    let ordered_relationships =
        order_steps_by_dependencies(relationship_steps, old_catalog, new_catalog)?;
    ordered_steps.extend(ordered_relationships);

    Ok(ordered_steps)
}

/// Internal function to order steps using the dependency graph and priority-queue topological
/// sort (`diff::graph`, `diff::presort`, `diff::toposort`): presort gives every step a stable
/// readability rank, `graph::build_edges` turns `forward_deps`/`reverse_deps` plus the synthetic
/// ordering constraints (drop-before-create, extension-before-object, etc.) into real edges, and
/// Kahn's algorithm only deviates from the presort rank when an edge forces it to.
fn order_steps_by_dependencies(
    steps: Vec<MigrationStep>,
    old_catalog: &Catalog,
    new_catalog: &Catalog,
) -> anyhow::Result<Vec<MigrationStep>> {
    let n = steps.len();
    if n == 0 {
        return Ok(steps);
    }

    let presort_keys: Vec<_> = steps
        .iter()
        .enumerate()
        .map(|(i, step)| presort::presort_key(step, i))
        .collect();
    let mut rank_of: Vec<usize> = vec![0; n];
    let mut by_presort: Vec<usize> = (0..n).collect();
    by_presort.sort_by(|&a, &b| presort_keys[a].cmp(&presort_keys[b]));
    for (rank, &i) in by_presort.iter().enumerate() {
        rank_of[i] = rank;
    }

    let (_producers, dup_diagnostics) = graph::build_producer_index(&steps);
    let (edges, edge_diagnostics) = graph::build_edges(&steps, old_catalog, new_catalog);
    for diagnostic in dup_diagnostics.iter().chain(edge_diagnostics.iter()) {
        warn!("{}: {}", diagnostic.code(), diagnostic.message());
    }

    let priority: Vec<toposort::PriorityKey> =
        (0..n).map(|i| (rank_of[i], 0u32, i)).collect();

    match toposort::toposort(n, &edges, &priority) {
        toposort::ToposortOutcome::Ordered(order) => {
            Ok(order.into_iter().map(|i| steps[i].clone()).collect())
        }
        toposort::ToposortOutcome::Cyclic { cycles, .. } => {
            let member = cycles.first().and_then(|c| c.first().copied());
            let step_type = member.map(|i| step_type_name(&steps[i]));
            match (member, step_type) {
                (Some(i), Some(step_type)) => Err(anyhow::anyhow!(
                    "Dependency cycle detected involving {} operation on {:?}. This usually indicates circular dependencies between database objects. Check for circular references in your schema.",
                    step_type,
                    steps[i].id()
                )),
                _ => Err(anyhow::anyhow!(
                    "Dependency cycle detected in migration ordering. This usually indicates circular dependencies between database objects."
                )),
            }
        }
    }
}

fn step_type_name(step: &MigrationStep) -> &'static str {
    match step {
        MigrationStep::Schema(_) => "Schema",
        MigrationStep::Table(_) => "Table",
        MigrationStep::View(_) => "View",
        MigrationStep::MaterializedView(_) => "MaterializedView",
        MigrationStep::Type(_) => "Type",
        MigrationStep::Domain(_) => "Domain",
        MigrationStep::Sequence(_) => "Sequence",
        MigrationStep::Function(_) => "Function",
        MigrationStep::Aggregate(_) => "Aggregate",
        MigrationStep::Index(_) => "Index",
        MigrationStep::Constraint(_) => "Constraint",
        MigrationStep::Trigger(_) => "Trigger",
        MigrationStep::Extension(_) => "Extension",
        MigrationStep::Grant(_) => "Grant",
        MigrationStep::Policy(_) => "Policy",
        MigrationStep::Role(_) => "Role",
        MigrationStep::Language(_) => "Language",
        MigrationStep::Collation(_) => "Collation",
        MigrationStep::Membership(_) => "Membership",
        MigrationStep::EventTrigger(_) => "EventTrigger",
        MigrationStep::Publication(_) => "Publication",
        MigrationStep::Subscription(_) => "Subscription",
        MigrationStep::Rule(_) => "Rule",
        MigrationStep::DefaultPrivilege(_) => "DefaultPrivilege",
        MigrationStep::ForeignDataWrapper(_) => "ForeignDataWrapper",
        MigrationStep::ForeignServer(_) => "ForeignServer",
        MigrationStep::UserMapping(_) => "UserMapping",
        MigrationStep::ForeignTable(_) => "ForeignTable",
    }
}
