//! Dependency graph for the declarative apply engine: same producer/consumer model as
//! `diff::graph`, but over statement indices instead of `MigrationStep`s, and with kind/signature
//! compatibility rules since a hand-written SQL file doesn't carry the stable typed ids a catalog
//! diff does.

use crate::diagnostics::{Diagnostic, ObjectRef as DiagObjectRef};
use crate::declarative::refs::{ObjectRef, Refs};
use std::collections::BTreeMap;

pub type Edge = (usize, usize);

/// A requirement of kind `table` is satisfiable by a producer of any of these kinds.
fn compatible_kinds(requirement_kind: &str) -> &'static [&'static str] {
    match requirement_kind {
        "table" => &["table", "view", "materialized_view", "foreign_table"],
        "type" => &[
            "type",
            "domain",
            "enum",
            "composite_type",
            "range",
            "table",
            "view",
            "materialized_view",
        ],
        _ => &[],
    }
}

fn kind_matches(requirement_kind: &str, producer_kind: &str) -> bool {
    requirement_kind == producer_kind || compatible_kinds(requirement_kind).contains(&producer_kind)
}

/// Candidate producers for one (schema, name) pair, keyed separately by kind so compatibility
/// checks can fan out across `table|view|...` without losing which statement produced what.
struct ProducerIndex {
    by_name: BTreeMap<(Option<String>, String), Vec<(usize, ObjectRef)>>,
}

impl ProducerIndex {
    fn build(statement_refs: &[Refs]) -> Self {
        let mut by_name: BTreeMap<(Option<String>, String), Vec<(usize, ObjectRef)>> =
            BTreeMap::new();
        for (i, refs) in statement_refs.iter().enumerate() {
            for p in &refs.provides {
                by_name
                    .entry((p.schema.clone(), p.name.clone()))
                    .or_default()
                    .push((i, p.clone()));
            }
        }
        Self { by_name }
    }

    fn candidates(&self, req: &ObjectRef) -> Vec<&(usize, ObjectRef)> {
        self.by_name
            .get(&(req.schema.clone(), req.name.clone()))
            .into_iter()
            .flatten()
            .filter(|(_, p)| kind_matches(&req.kind, &p.kind))
            .filter(|(_, p)| signature_compatible(req, p))
            .collect()
    }
}

fn signature_compatible(req: &ObjectRef, producer: &ObjectRef) -> bool {
    match (&req.signature, &producer.signature) {
        (None, _) => true,
        (Some(_), None) => true,
        (Some(a), Some(b)) => a == b || a.is_empty() || b.is_empty() || has_unknown(a) || has_unknown(b),
    }
}

fn has_unknown(sig: &str) -> bool {
    sig.split(',').any(|t| t.trim().eq_ignore_ascii_case("unknown"))
}

/// Builds dependency edges over `statement_refs` (index-aligned with the statement list).
/// Returns the edges plus diagnostics for ambiguous (`DUPLICATE_PRODUCER`) and unresolved
/// (`UNRESOLVED_DEPENDENCY`, with Levenshtein-nearest name suggestions) requirements.
pub fn build_edges(
    statement_refs: &[Refs],
    statement_ids: &[String],
) -> (Vec<Edge>, Vec<Diagnostic>) {
    let index = ProducerIndex::build(statement_refs);
    let mut edges = Vec::new();
    let mut diagnostics = Vec::new();

    let all_names: Vec<&str> = index
        .by_name
        .keys()
        .map(|(_, name)| name.as_str())
        .collect();

    for (i, refs) in statement_refs.iter().enumerate() {
        for req in &refs.requires {
            let candidates = index.candidates(req);
            let producers: Vec<usize> = candidates
                .iter()
                .map(|(idx, _)| *idx)
                .filter(|&idx| idx != i)
                .collect();

            match producers.len() {
                0 => {
                    diagnostics.push(unresolved_dependency(&statement_ids[i], req, &all_names));
                }
                1 => edges.push((producers[0], i)),
                _ => {
                    diagnostics.push(Diagnostic::DuplicateProducer {
                        message: format!(
                            "{} candidate producers for {} ({})",
                            producers.len(),
                            req.qualified_name(),
                            req.kind
                        ),
                        object_refs: producers
                            .iter()
                            .map(|&idx| DiagObjectRef::new("statement", statement_ids[idx].clone()))
                            .collect(),
                        suggested_fix: Some(
                            "qualify the reference or remove the duplicate producer".to_string(),
                        ),
                    });
                    // Still order against every candidate: running after all of them is always
                    // safe, even though which one "actually" supplies the dependency is unclear.
                    for p in producers {
                        edges.push((p, i));
                    }
                }
            }
        }
    }

    (edges, diagnostics)
}

fn unresolved_dependency(statement_id: &str, req: &ObjectRef, all_names: &[&str]) -> Diagnostic {
    let suggestion = nearest_name(&req.name, all_names);
    Diagnostic::UnresolvedDependency {
        message: format!(
            "no producer found for {} {} referenced by {statement_id}",
            req.kind,
            req.qualified_name()
        ),
        statement_id: Some(statement_id.to_string()),
        object_refs: vec![DiagObjectRef::new(req.kind.clone(), req.qualified_name())],
        suggested_fix: suggestion.map(|s| format!("did you mean '{s}'?")),
    }
}

fn nearest_name(target: &str, candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .filter(|c| !c.is_empty())
        .min_by_key(|c| strsim::levenshtein(target, c))
        .filter(|c| strsim::levenshtein(target, c) <= 3)
        .map(|c| c.to_string())
}
