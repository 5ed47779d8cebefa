//! # Hierarchical Order
//!
//! Topological arrangement of scheme members under the ancestor relation.
//!
//! Ancestors come before their descendants. Among members that do not
//! constrain each other, the member with the smallest original index goes
//! first, so the result is deterministic and keeps the input order where it
//! can. Members caught in a cycle cannot all be ordered; the unplaced member
//! with the fewest unplaced ancestors (earliest on ties) is taken and the
//! sort continues.

use crate::{ComponentId, EdgeKind, Graph, Scheme};
use std::collections::{BTreeSet, VecDeque};

impl Graph {
    /// Every handle reachable from `id` along `kind` edges, `id` itself
    /// only if it lies on a cycle.
    #[must_use]
    pub fn reachable(&self, id: ComponentId, kind: EdgeKind) -> BTreeSet<ComponentId> {
        let mut seen = BTreeSet::new();
        let mut to_check: VecDeque<ComponentId> = self.edges(id, kind).iter().copied().collect();
        while let Some(current) = to_check.pop_front() {
            if seen.insert(current) {
                to_check.extend(self.edges(current, kind).iter().filter(|e| !seen.contains(*e)));
            }
        }
        seen
    }
}

impl Scheme {
    /// Members arranged so that every ancestor precedes its descendants.
    #[must_use]
    pub fn hierarchical_order(&self, graph: &Graph) -> Vec<ComponentId> {
        let members = self.members();
        let n = members.len();

        let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut indegree = vec![0_usize; n];
        for (i, &member) in members.iter().enumerate() {
            let below = graph.reachable(member, EdgeKind::Child);
            for (j, other) in members.iter().enumerate() {
                if i != j && below.contains(other) {
                    successors[i].push(j);
                    indegree[j] += 1;
                }
            }
        }

        let mut ready: BTreeSet<usize> = (0..n).filter(|&i| indegree[i] == 0).collect();
        let mut placed = vec![false; n];
        let mut order = Vec::with_capacity(n);

        while order.len() < n {
            let next = match ready.pop_first() {
                Some(i) => i,
                // only cycles are left; release the least constrained member
                None => match (0..n).filter(|&i| !placed[i]).min_by_key(|&i| (indegree[i], i)) {
                    Some(i) => i,
                    None => break,
                },
            };
            if placed[next] {
                continue;
            }
            placed[next] = true;
            order.push(members[next]);

            for &succ in &successors[next] {
                indegree[succ] = indegree[succ].saturating_sub(1);
                if indegree[succ] == 0 && !placed[succ] {
                    ready.insert(succ);
                }
            }
        }
        order
    }

    /// Reorder the members hierarchically and rebuild the caches by adding
    /// them again in the new order.
    pub fn halfsort_hierarchically(&mut self, graph: &Graph) {
        let order = self.hierarchical_order(graph);
        self.clear();
        self.add_all(graph, order);
        tracing::debug!(members = self.len(), "scheme sorted hierarchically");
    }
}
