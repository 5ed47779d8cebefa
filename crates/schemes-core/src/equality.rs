//! # Deep Equality
//!
//! Structural comparison of components and schemes.
//!
//! The walk starts from an edge list on each side (for schemes: the cached
//! roots going down and the cached leaves going up) and pairs every own
//! component with the first shallow-equal component in the other list.
//! Own components are visited at most once, keyed by handle.
//!
//! Closed cycles that are unreachable from the starting lists are not
//! compared.

use crate::{ComponentId, EdgeKind, Graph, Scheme};
use std::collections::BTreeSet;

/// One side of a comparison: the arena and the starting edge list.
#[derive(Clone, Copy)]
struct Side<'a> {
    graph: &'a Graph,
    edges: &'a [ComponentId],
}

/// Compare two edge lists and everything reachable from them along `kind`.
fn deep_equals_recursive(
    own: Side<'_>,
    other: Side<'_>,
    kind: EdgeKind,
    checked: &mut BTreeSet<ComponentId>,
) -> bool {
    if own.edges.len() != other.edges.len() {
        return false;
    }

    for &own_el in own.edges {
        if checked.contains(&own_el) {
            continue;
        }
        let Some(own_info) = own.graph.info(own_el) else {
            return false;
        };
        let Some(other_el) = other
            .edges
            .iter()
            .copied()
            .find(|&o| other.graph.info(o) == Some(own_info))
        else {
            return false;
        };

        checked.insert(own_el);
        let own_next = Side {
            graph: own.graph,
            edges: own.graph.edges(own_el, kind),
        };
        let other_next = Side {
            graph: other.graph,
            edges: other.graph.edges(other_el, kind),
        };
        if !deep_equals_recursive(own_next, other_next, kind, checked) {
            return false;
        }
    }
    true
}

/// Compare the synthetic super-root (children = `own_roots`) and
/// super-leaf (parents = `own_leaves`) of both sides.
fn deep_equals_bounds(
    own_graph: &Graph,
    own_roots: &[ComponentId],
    own_leaves: &[ComponentId],
    other_graph: &Graph,
    other_roots: &[ComponentId],
    other_leaves: &[ComponentId],
) -> bool {
    let down = deep_equals_recursive(
        Side {
            graph: own_graph,
            edges: own_roots,
        },
        Side {
            graph: other_graph,
            edges: other_roots,
        },
        EdgeKind::Child,
        &mut BTreeSet::new(),
    );
    down && deep_equals_recursive(
        Side {
            graph: own_graph,
            edges: own_leaves,
        },
        Side {
            graph: other_graph,
            edges: other_leaves,
        },
        EdgeKind::Parent,
        &mut BTreeSet::new(),
    )
}

impl Graph {
    /// True if `a` and `b` are shallow-equal and structurally equal both
    /// downward (children) and upward (parents).
    #[must_use]
    pub fn deep_equals(&self, a: ComponentId, b: ComponentId) -> bool {
        self.shallow_eq(a, b)
            && deep_equals_bounds(
                self,
                self.children(a),
                self.parents(a),
                self,
                self.children(b),
                self.parents(b),
            )
    }
}

impl Scheme {
    /// Deep equality against a scheme backed by the same arena.
    #[must_use]
    pub fn deep_equals(&self, graph: &Graph, other: &Scheme) -> bool {
        self.deep_equals_in(graph, other, graph)
    }

    /// Deep equality against a scheme backed by `other_graph`.
    #[must_use]
    pub fn deep_equals_in(&self, graph: &Graph, other: &Scheme, other_graph: &Graph) -> bool {
        deep_equals_bounds(
            graph,
            self.roots(),
            self.leaves(),
            other_graph,
            other.roots(),
            other.leaves(),
        )
    }
}
