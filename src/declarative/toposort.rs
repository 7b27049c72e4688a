//! Topological sort for the declarative apply engine. Reuses `diff::toposort`'s Kahn-plus-Tarjan
//! core directly — the core is already generic over node count, edges and priority keys, so there
//! is no need for a second implementation here, just the phase/weight table this pipeline uses to
//! build each statement's priority key.

use crate::declarative::classify::StatementClass;
use crate::diagnostics::{Diagnostic, ObjectRef};
use crate::diff::toposort::{toposort as kahn_toposort, PriorityKey, ToposortOutcome};

/// Orders `node_count` statements given their classes, dependency `edges`, and original source
/// index (used as the final tie-break and for cycle diagnostics). On success returns the order as
/// original indices; on a cycle, returns the ordered prefix plus a `CYCLE_DETECTED` diagnostic per
/// strongly-connected component.
pub fn order_statements(
    node_count: usize,
    edges: &[(usize, usize)],
    classes: &[StatementClass],
    statement_ids: &[String],
) -> (Vec<usize>, Vec<Diagnostic>) {
    let priority: Vec<PriorityKey> = (0..node_count)
        .map(|i| {
            let class = classes[i];
            (class.phase().rank() as usize, class.weight(), i)
        })
        .collect();

    match kahn_toposort(node_count, edges, &priority) {
        ToposortOutcome::Ordered(order) => (order, Vec::new()),
        ToposortOutcome::Cyclic {
            mut ordered_prefix,
            cycles,
        } => {
            let mut diagnostics = Vec::new();
            for members in cycles {
                // A cycle made up entirely of function/aggregate bodies calling each other is
                // not a real ordering conflict: CREATE FUNCTION doesn't validate its body (the
                // engine runs with check_function_bodies=off), so either creation order
                // succeeds and the post-creation validation pass catches a genuinely broken
                // body. Only structural cycles (tables, views, ...) block the run up front.
                if members
                    .iter()
                    .all(|&i| matches!(classes[i], StatementClass::Function | StatementClass::Aggregate))
                {
                    let mut members = members;
                    members.sort_unstable();
                    ordered_prefix.extend(members);
                    continue;
                }

                let refs = members
                    .iter()
                    .map(|&i| ObjectRef::new("statement", statement_ids[i].clone()))
                    .collect();
                diagnostics.push(Diagnostic::CycleDetected {
                    message: format!(
                        "cycle detected among {} statements: {}",
                        members.len(),
                        members
                            .iter()
                            .map(|&i| statement_ids[i].as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                    object_refs: refs,
                });
            }
            (ordered_prefix, diagnostics)
        }
    }
}
