//! # Deep Copy
//!
//! Clones a scheme together with every component reachable from it.
//!
//! The closure is collected over both edge directions, starting from the
//! members and the cached roots and leaves, so associated components (a
//! removed parent, a shared child outside the scheme) are cloned too. The
//! `checked` map sends every original handle to exactly one clone, which
//! keeps diamonds as diamonds and makes the copy isomorphic to the
//! original.

use crate::{ComponentId, EdgeKind, Graph, Scheme, SchemeError};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

impl Scheme {
    /// Clone this scheme and all reachable components into `graph`.
    ///
    /// The copy holds the clones of the members in member order; its caches
    /// are rebuilt from the cloned edges. Fails with
    /// `SchemeError::CloneUnsupported` when a reachable handle is not stored
    /// in `graph`, leaving already cloned components in the arena.
    pub fn deep_copy(&self, graph: &mut Graph) -> Result<Scheme, SchemeError> {
        let closure = self.closure(graph)?;

        let mut checked: BTreeMap<ComponentId, ComponentId> = BTreeMap::new();
        for &old in &closure {
            let new = graph.plain_copy(old)?;
            checked.insert(old, new);
        }

        for &old in &closure {
            let new = mapped(&checked, old)?;
            for kind in [EdgeKind::Parent, EdgeKind::Child] {
                let edges = graph
                    .edges(old, kind)
                    .iter()
                    .map(|&e| mapped(&checked, e))
                    .collect::<Result<Vec<_>, _>>()?;
                graph.set_edges(new, kind, edges);
            }
        }

        let mut copy = Scheme::with_capacity(self.len());
        for member in self.iter() {
            copy.add(graph, mapped(&checked, member)?);
        }
        copy.validate_roots_and_leaves(graph);

        tracing::debug!(
            members = copy.len(),
            cloned = checked.len(),
            "deep copy finished"
        );
        Ok(copy)
    }

    /// Every handle reachable from the members, roots and leaves, in
    /// breadth-first order.
    fn closure(&self, graph: &Graph) -> Result<Vec<ComponentId>, SchemeError> {
        let mut closure = Vec::new();
        let mut seen = BTreeSet::new();
        let mut to_check: VecDeque<ComponentId> = self
            .iter()
            .chain(self.roots().iter().copied())
            .chain(self.leaves().iter().copied())
            .collect();

        while let Some(current) = to_check.pop_front() {
            if !seen.insert(current) {
                continue;
            }
            if !graph.contains_component(current) {
                return Err(SchemeError::CloneUnsupported(current));
            }
            closure.push(current);
            for kind in [EdgeKind::Parent, EdgeKind::Child] {
                to_check.extend(graph.edges(current, kind).iter().filter(|e| !seen.contains(*e)));
            }
        }
        Ok(closure)
    }
}

fn mapped(
    checked: &BTreeMap<ComponentId, ComponentId>,
    old: ComponentId,
) -> Result<ComponentId, SchemeError> {
    checked
        .get(&old)
        .copied()
        .ok_or(SchemeError::CloneUnsupported(old))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(graph: &mut Graph, names: &[&str]) -> Vec<ComponentId> {
        let ids: Vec<ComponentId> = names.iter().map(|n| graph.add_named(*n)).collect();
        for pair in ids.windows(2) {
            graph.add_child(pair[0], pair[1]);
            graph.force_family_together(pair[0]);
        }
        ids
    }

    #[test]
    fn copy_is_fresh_and_deep_equal() {
        let mut graph = Graph::new();
        let ids = chain(&mut graph, &["a", "b", "c"]);
        let scheme = Scheme::from_components(&graph, ids.clone());

        let copy = scheme.deep_copy(&mut graph).expect("copy");
        assert_eq!(copy.len(), 3);
        assert!(copy.iter().all(|id| !ids.contains(&id)));
        assert!(copy.deep_equals(&graph, &scheme));
        assert!(scheme.deep_equals(&graph, &copy));
        assert!(copy.members_equal(&graph, &scheme, &graph));
        assert!(copy.all_families_valid(&graph));
    }

    #[test]
    fn diamond_stays_a_diamond() {
        let mut graph = Graph::new();
        let top = graph.add_named("top");
        let left = graph.add_named("left");
        let right = graph.add_named("right");
        let bottom = graph.add_named("bottom");
        for (p, c) in [(top, left), (top, right), (left, bottom), (right, bottom)] {
            graph.add_child(p, c);
            graph.add_parent(c, p);
        }
        let scheme = Scheme::from_components(&graph, [top, left, right, bottom]);

        let copy = scheme.deep_copy(&mut graph).expect("copy");
        let new_bottom = copy.get(3).expect("bottom");
        let new_left = copy.get(1).expect("left");
        let new_right = copy.get(2).expect("right");
        assert_eq!(graph.parents(new_bottom), &[new_left, new_right]);
        assert_eq!(graph.component_count(), 8);
    }

    #[test]
    fn associated_components_are_cloned() {
        let mut graph = Graph::new();
        let ids = chain(&mut graph, &["Mutter", "Kind", "Enkel"]);
        let mut scheme = Scheme::from_components(&graph, ids.clone());
        scheme.remove(&graph, ids[0]);

        let copy = scheme.deep_copy(&mut graph).expect("copy");
        assert_eq!(copy.len(), 2);
        let kind = copy.get(0).expect("kind");
        let mutter = graph.parents(kind)[0];
        assert_ne!(mutter, ids[0]);
        assert_eq!(graph.name(mutter), Some("Mutter"));
        assert!(graph.is_parent_of(mutter, kind));
        assert!(!copy.iter().any(|id| id == mutter));
    }

    #[test]
    fn duplicate_members_map_to_one_clone() {
        let mut graph = Graph::new();
        let a = graph.add_named("a");
        let mut scheme = Scheme::new();
        scheme.add(&graph, a);
        scheme.add(&graph, a);

        let copy = scheme.deep_copy(&mut graph).expect("copy");
        assert_eq!(copy.get(0), copy.get(1));
        assert_eq!(graph.component_count(), 2);
    }

    #[test]
    fn dangling_edge_is_clone_unsupported() {
        let mut graph = Graph::new();
        let a = graph.add_named("a");
        graph.set_edges(a, EdgeKind::Child, vec![ComponentId(42)]);
        let scheme = Scheme::from_components(&graph, [a]);

        let result = scheme.deep_copy(&mut graph);
        assert!(matches!(
            result,
            Err(SchemeError::CloneUnsupported(ComponentId(42)))
        ));
    }

    #[test]
    fn copy_of_copy_still_equal() {
        let mut graph = Graph::new();
        let ids = chain(&mut graph, &["x", "y"]);
        let scheme = Scheme::from_components(&graph, ids);

        let first = scheme.deep_copy(&mut graph).expect("copy");
        let second = first.deep_copy(&mut graph).expect("copy");
        assert!(second.deep_equals(&graph, &scheme));
    }
}
