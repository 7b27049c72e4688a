//! Dependency graph construction: producer index, edge building from catalog `forward_deps`,
//! and the one custom constraint generator the differ pipeline requires (ALTER DEFAULT
//! PRIVILEGES ordered before matching CREATEs). Supersedes the graph-building half of the
//! inline logic in `order_steps_by_dependencies`, extracted so the declarative apply engine's
//! `declarative::graph` can follow the same shape without duplicating it.

use crate::catalog::Catalog;
use crate::catalog::id::DbObjectId;
use crate::diagnostics::{Diagnostic, ObjectRef};
use crate::diff::operations::{MigrationStep, OperationKind};
use std::collections::BTreeMap;

/// Maps each stable id created by exactly one step to that step's index. Ids created by more
/// than one step are reported as `Diagnostic::DuplicateProducer` and excluded from the map (the
/// first producer found still wins for edge-building purposes, matching "producers-by-stable-id
/// index... if multiple nodes create the same stable id -> diagnostic").
pub fn build_producer_index(
    steps: &[MigrationStep],
) -> (BTreeMap<DbObjectId, usize>, Vec<Diagnostic>) {
    let mut by_id: BTreeMap<DbObjectId, Vec<usize>> = BTreeMap::new();
    for (i, step) in steps.iter().enumerate() {
        if matches!(step.operation_kind(), OperationKind::Create) {
            by_id.entry(step.id()).or_default().push(i);
        }
    }

    let mut diagnostics = Vec::new();
    let mut index = BTreeMap::new();
    for (id, producers) in by_id {
        if producers.len() > 1 {
            diagnostics.push(Diagnostic::DuplicateProducer {
                message: format!(
                    "{} producers create {}",
                    producers.len(),
                    id.to_stable_id()
                ),
                object_refs: vec![ObjectRef::from(&id)],
                suggested_fix: Some(
                    "keep only one CREATE for this object across the compared catalogs"
                        .to_string(),
                ),
            });
        }
        index.insert(id, producers[0]);
    }
    (index, diagnostics)
}

/// One directed edge `from -> to` meaning `from` must execute before `to`.
pub type Edge = (usize, usize);

/// Builds the dependency edges for a step list using the catalogs' precomputed
/// `forward_deps`/`reverse_deps`, plus any step-level `dependencies()` as a fallback for
/// dynamically generated steps not present in either catalog (e.g. synthesized REVOKEs).
/// Returns the edges and diagnostics for any requirement that resolves to neither a known
/// producer nor an existing catalog object (assumed satisfied externally).
pub fn build_edges(
    steps: &[MigrationStep],
    old_catalog: &Catalog,
    new_catalog: &Catalog,
) -> (Vec<Edge>, Vec<Diagnostic>) {
    let mut id_to_indices: BTreeMap<DbObjectId, Vec<usize>> = BTreeMap::new();
    for (i, step) in steps.iter().enumerate() {
        id_to_indices.entry(step.id()).or_default().push(i);
    }

    let mut edges = Vec::new();
    let mut diagnostics = Vec::new();

    for (i, step) in steps.iter().enumerate() {
        let is_drop = step.is_drop();

        if let DbObjectId::Comment { object_id } = &step.id() {
            if let Some(indices) = id_to_indices.get(object_id.as_ref()) {
                for &dep_i in indices {
                    edges.push((dep_i, i));
                }
            }
            continue;
        }

        let catalog_deps = if is_drop {
            old_catalog.forward_deps.get(&step.id())
        } else {
            new_catalog.forward_deps.get(&step.id())
        };

        if let Some(deps) = catalog_deps {
            for dep in deps {
                if let Some(indices) = id_to_indices.get(dep) {
                    for &dep_i in indices {
                        if is_drop {
                            edges.push((i, dep_i));
                        } else {
                            edges.push((dep_i, i));
                        }
                    }
                } else {
                    let catalog = if is_drop { old_catalog } else { new_catalog };
                    if !catalog.contains_id(dep) {
                        diagnostics.push(missing_dependency_diagnostic(&step.id(), dep));
                    }
                }
            }
        } else {
            for dep in step.dependencies() {
                if let Some(indices) = id_to_indices.get(&dep) {
                    for &dep_i in indices {
                        edges.push((dep_i, i));
                    }
                } else if !new_catalog.contains_id(&dep) {
                    diagnostics.push(missing_dependency_diagnostic(&step.id(), &dep));
                }
            }
        }
    }

    edges.extend(default_privilege_constraint_edges(steps));
    edges.extend(create_before_other_edges(steps, &id_to_indices));
    edges.extend(drop_before_create_edges(steps, &id_to_indices));
    edges.extend(extension_before_object_edges(steps));

    (edges, diagnostics)
}

fn missing_dependency_diagnostic(object_id: &DbObjectId, dep: &DbObjectId) -> Diagnostic {
    Diagnostic::RuntimeAssumedExternalDependency {
        message: format!(
            "{} depends on {} which is not in the catalog (may be filtered by config)",
            object_id.to_stable_id(),
            dep.to_stable_id()
        ),
        object_refs: vec![ObjectRef::from(object_id), ObjectRef::from(dep)],
    }
}

/// ALTER DEFAULT PRIVILEGES for role R in schema S (or cluster-wide) must run before every
/// CREATE of a matching object type in S (or every schema), except CREATE ROLE and CREATE
/// SCHEMA, which are its own prerequisites and would otherwise form a cycle.
fn default_privilege_constraint_edges(steps: &[MigrationStep]) -> Vec<Edge> {
    use crate::diff::operations::DefaultPrivilegeOperation;

    let mut by_objtype_schema: BTreeMap<(String, Option<String>), Vec<usize>> = BTreeMap::new();
    for (i, step) in steps.iter().enumerate() {
        if !step.is_create() {
            continue;
        }
        if matches!(step, MigrationStep::Role(_) | MigrationStep::Schema(_)) {
            continue;
        }
        if let Some(objtype) = create_objtype(step) {
            let schema = step.id().schema().map(|s| s.to_string());
            by_objtype_schema
                .entry((objtype, schema))
                .or_default()
                .push(i);
        }
    }

    let mut edges = Vec::new();
    for (i, step) in steps.iter().enumerate() {
        let MigrationStep::DefaultPrivilege(DefaultPrivilegeOperation::Grant { acl }) = step
        else {
            continue;
        };
        let key = (acl.objtype.clone(), acl.schema.clone());
        if let Some(targets) = by_objtype_schema.get(&key) {
            for &target in targets {
                edges.push((i, target));
            }
        }
        // A global (schema = None) default privilege also constrains every schema-scoped create
        // of the same objtype.
        if acl.schema.is_none() {
            for ((objtype, schema), targets) in &by_objtype_schema {
                if objtype == &acl.objtype && schema.is_some() {
                    for &target in targets {
                        edges.push((i, target));
                    }
                }
            }
        }
    }
    edges
}

fn create_objtype(step: &MigrationStep) -> Option<String> {
    match step {
        MigrationStep::Table(_) => Some("table".to_string()),
        MigrationStep::Sequence(_) => Some("sequence".to_string()),
        MigrationStep::Function(_) => Some("function".to_string()),
        MigrationStep::Type(_) | MigrationStep::Domain(_) => Some("type".to_string()),
        _ => None,
    }
}

/// Every DROP of an id must precede every CREATE of the same id (rename-as-replace, or a
/// straightforward drop+recreate from an unrepresentable ALTER).
fn drop_before_create_edges(
    steps: &[MigrationStep],
    id_to_indices: &BTreeMap<DbObjectId, Vec<usize>>,
) -> Vec<Edge> {
    let mut edges = Vec::new();
    for (id, indices) in id_to_indices {
        let drops: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| steps[i].is_drop())
            .collect();
        let creates: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| steps[i].is_create())
            .collect();
        if drops.is_empty() || creates.is_empty() {
            continue;
        }
        let _ = id;
        for &d in &drops {
            for &c in &creates {
                edges.push((d, c));
            }
        }
    }
    edges
}

/// Every CREATE of an id must precede any non-create, non-drop step on the same id (e.g. a
/// COMMENT or GRANT that targets an object created earlier in the same run).
fn create_before_other_edges(
    steps: &[MigrationStep],
    id_to_indices: &BTreeMap<DbObjectId, Vec<usize>>,
) -> Vec<Edge> {
    let mut edges = Vec::new();
    for indices in id_to_indices.values() {
        let creates: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| steps[i].is_create())
            .collect();
        let others: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| !steps[i].is_create() && !steps[i].is_drop())
            .collect();
        for &c in &creates {
            for &o in &others {
                edges.push((c, o));
            }
        }
    }
    edges
}

/// All extension creations precede all non-extension, non-schema object creations: extensions
/// may provide types/functions other CREATEs depend on without that dependency being visible in
/// `forward_deps` (extension-owned objects aren't tracked individually).
fn extension_before_object_edges(steps: &[MigrationStep]) -> Vec<Edge> {
    let extension_creates: Vec<usize> = steps
        .iter()
        .enumerate()
        .filter(|(_, s)| matches!(s, MigrationStep::Extension(_)) && s.is_create())
        .map(|(i, _)| i)
        .collect();

    let other_creates: Vec<usize> = steps
        .iter()
        .enumerate()
        .filter(|(_, s)| {
            !matches!(s, MigrationStep::Extension(_) | MigrationStep::Schema(_)) && s.is_create()
        })
        .map(|(i, _)| i)
        .collect();

    let mut edges = Vec::new();
    for &e in &extension_creates {
        for &o in &other_creates {
            edges.push((e, o));
        }
    }
    edges
}
