//! Dependency edges, parallel groups, and execution order.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use serde::Serialize;
use tracing::warn;

use super::MicroTask;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Blocks,
}

/// `from_index` must finish before `to_index` can start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DependencyEdge {
    pub from_index: usize,
    pub to_index: usize,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
}

#[must_use]
pub fn dependency_edges(steps: &[MicroTask]) -> Vec<DependencyEdge> {
    steps
        .iter()
        .enumerate()
        .flat_map(|(to_index, step)| {
            step.dependencies.iter().map(move |&from_index| DependencyEdge {
                from_index,
                to_index,
                kind: EdgeKind::Blocks,
            })
        })
        .collect()
}

/// Maximal runs of consecutive parallelizable steps, in list order. A lone
/// parallelizable step forms its own group.
#[must_use]
pub fn parallel_groups(steps: &[MicroTask]) -> Vec<Vec<usize>> {
    let mut groups = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    for (index, step) in steps.iter().enumerate() {
        if step.parallelizable {
            current.push(index);
        } else if !current.is_empty() {
            groups.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        groups.push(current);
    }
    groups
}

/// Kahn's algorithm over `dependencies`, taking the lowest ready index first.
///
/// If the graph has a cycle the original order `0..n` is returned.
#[must_use]
pub fn execution_order(step_count: usize, dependencies: &[DependencyEdge]) -> Vec<usize> {
    let mut in_degree = vec![0usize; step_count];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); step_count];
    for edge in dependencies {
        if edge.from_index >= step_count || edge.to_index >= step_count {
            continue;
        }
        in_degree[edge.to_index] += 1;
        dependents[edge.from_index].push(edge.to_index);
    }

    let mut ready: BinaryHeap<Reverse<usize>> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, degree)| **degree == 0)
        .map(|(index, _)| Reverse(index))
        .collect();

    let mut order = Vec::with_capacity(step_count);
    while let Some(Reverse(index)) = ready.pop() {
        order.push(index);
        for &next in &dependents[index] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                ready.push(Reverse(next));
            }
        }
    }

    if order.len() < step_count {
        warn!(
            steps = step_count,
            ordered = order.len(),
            "dependency cycle in decomposition, keeping original order"
        );
        return (0..step_count).collect();
    }
    order
}
