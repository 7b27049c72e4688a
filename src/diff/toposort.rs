//! Generic Kahn's-algorithm topological sort with a priority-queue tie-break, plus a Tarjan SCC
//! fallback for cycle diagnostics. Generic over node index so both the differ pipeline
//! (`diff::graph`, nodes = `MigrationStep` indices) and the declarative apply engine
//! (`declarative::graph`, nodes = statement indices) share one implementation, matching
//! spec.md §4.5's "Kahn-style ordering with a priority queue keyed by the logical pre-sort
//! position" and its Tarjan-based cycle reporting.

use petgraph::algo::tarjan_scc;
use petgraph::graph::DiGraph;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Per-node tie-break key for the priority queue: (presort position, statement-class weight,
/// source index). Lower sorts first among nodes that are otherwise free to run.
pub type PriorityKey = (usize, u32, usize);

pub enum ToposortOutcome {
    /// Every node was consumed; this is the final order (as original indices).
    Ordered(Vec<usize>),
    /// The queue emptied before every node was consumed. Carries the partial order already
    /// produced and the remaining nodes grouped into cycles (non-trivial SCCs and self-loops)
    /// found by a Tarjan pass over what's left.
    Cyclic {
        ordered_prefix: Vec<usize>,
        cycles: Vec<Vec<usize>>,
    },
}

/// Runs Kahn's algorithm over `node_count` nodes connected by `edges` (`from` before `to`),
/// breaking ties among simultaneously-ready nodes using `priority[node]`.
pub fn toposort(node_count: usize, edges: &[(usize, usize)], priority: &[PriorityKey]) -> ToposortOutcome {
    assert_eq!(priority.len(), node_count, "priority key per node required");

    let mut out_edges: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    let mut indegree = vec![0usize; node_count];
    for &(from, to) in edges {
        if from == to {
            continue; // self-loops are handled by the cycle pass, not as a hard block
        }
        out_edges[from].push(to);
        indegree[to] += 1;
    }

    let mut heap: BinaryHeap<Reverse<(PriorityKey, usize)>> = BinaryHeap::new();
    for (node, &deg) in indegree.iter().enumerate() {
        if deg == 0 {
            heap.push(Reverse((priority[node], node)));
        }
    }

    let mut order = Vec::with_capacity(node_count);
    let mut remaining_indegree = indegree.clone();

    while let Some(Reverse((_, node))) = heap.pop() {
        order.push(node);
        for &next in &out_edges[node] {
            remaining_indegree[next] -= 1;
            if remaining_indegree[next] == 0 {
                heap.push(Reverse((priority[next], next)));
            }
        }
    }

    if order.len() == node_count {
        return ToposortOutcome::Ordered(order);
    }

    let consumed: std::collections::BTreeSet<usize> = order.iter().copied().collect();
    let remaining: Vec<usize> = (0..node_count).filter(|n| !consumed.contains(n)).collect();

    let cycles = find_cycles(&remaining, edges, &out_edges);

    ToposortOutcome::Cyclic {
        ordered_prefix: order,
        cycles,
    }
}

/// Runs Tarjan SCC over the subgraph induced by `remaining` nodes (plus self-loop edges, which
/// Tarjan alone wouldn't flag as non-trivial) and returns each group of mutually cyclic nodes.
fn find_cycles(remaining: &[usize], edges: &[(usize, usize)], out_edges: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let remaining_set: std::collections::BTreeSet<usize> = remaining.iter().copied().collect();

    let mut graph: DiGraph<usize, ()> = DiGraph::new();
    let mut node_to_idx = std::collections::BTreeMap::new();
    for &n in remaining {
        node_to_idx.insert(n, graph.add_node(n));
    }
    for &n in remaining {
        for &next in &out_edges[n] {
            if remaining_set.contains(&next) {
                graph.add_edge(node_to_idx[&n], node_to_idx[&next], ());
            }
        }
    }

    let mut cycles: Vec<Vec<usize>> = tarjan_scc(&graph)
        .into_iter()
        .filter(|scc| scc.len() > 1)
        .map(|scc| scc.into_iter().map(|idx| graph[idx]).collect())
        .collect();

    // Self-loops are trivial one-node SCCs under Tarjan; surface them explicitly.
    for &(from, to) in edges {
        if from == to && remaining_set.contains(&from) {
            cycles.push(vec![from]);
        }
    }

    cycles
}
