//! # Property-Based Tests
//!
//! Invariants of schemes built from random acyclic graphs.
//!
//! Every generated component has a distinct name containing regex
//! metacharacters; edges only point from a lower to a higher index, so the
//! graph is acyclic. Members are added in a shuffled order.

use proptest::collection::vec;
use proptest::prelude::*;
use schemes_core::{ComponentId, Graph, Scheme, SearchOrder, scheme_from_xml, scheme_to_xml};
use std::collections::BTreeSet;

// =============================================================================
// GENERATORS
// =============================================================================

#[derive(Debug, Clone)]
struct Shape {
    edges: BTreeSet<(usize, usize)>,
    order: Vec<usize>,
}

fn arb_shape() -> impl Strategy<Value = Shape> {
    (1usize..10).prop_flat_map(|n| {
        let edges = vec((0..n, 0..n), 0..n * 2).prop_map(|pairs| {
            pairs
                .into_iter()
                .filter(|(a, b)| a < b)
                .collect::<BTreeSet<_>>()
        });
        let order = Just((0..n).collect::<Vec<_>>()).prop_shuffle();
        (edges, order).prop_map(|(edges, order)| Shape { edges, order })
    })
}

fn name_of(index: usize) -> String {
    format!("c{index}.(x)+")
}

/// Build the shape into a fresh arena. Returns the handles by creation index.
fn build(shape: &Shape) -> (Graph, Scheme, Vec<ComponentId>) {
    let mut graph = Graph::new();
    let ids: Vec<ComponentId> = (0..shape.order.len())
        .map(|i| graph.add_named(name_of(i)))
        .collect();
    for &(parent, child) in &shape.edges {
        graph.add_child(ids[parent], ids[child]);
    }
    for &id in &ids {
        graph.force_family_together(id);
    }
    let mut scheme = Scheme::new();
    scheme.add_all(&graph, shape.order.iter().map(|&i| ids[i]));
    (graph, scheme, ids)
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Forcing families together leaves every edge mirrored.
    #[test]
    fn forced_families_are_valid(shape in arb_shape()) {
        let (graph, scheme, _) = build(&shape);

        prop_assert!(scheme.all_families_valid(&graph));
        for id in scheme.iter() {
            for &child in graph.children(id) {
                prop_assert!(graph.is_child_of(child, id));
            }
        }
    }

    /// The caches hold exactly the members without parents or children.
    #[test]
    fn caches_match_members(shape in arb_shape()) {
        let (graph, scheme, _) = build(&shape);

        let roots: Vec<ComponentId> = scheme.iter().filter(|&id| graph.is_root(id)).collect();
        let leaves: Vec<ComponentId> = scheme.iter().filter(|&id| graph.is_leaf(id)).collect();
        prop_assert_eq!(scheme.roots(), roots.as_slice());
        prop_assert_eq!(scheme.leaves(), leaves.as_slice());

        let mut rebuilt = scheme.clone();
        rebuilt.validate_roots_and_leaves(&graph);
        prop_assert_eq!(rebuilt.roots(), scheme.roots());
        prop_assert_eq!(rebuilt.leaves(), scheme.leaves());
    }

    /// Both search orders find the same component when every component is a
    /// member.
    #[test]
    fn search_orders_agree(shape in arb_shape(), pick in any::<prop::sample::Index>()) {
        let (graph, scheme, ids) = build(&shape);
        let target = pick.index(ids.len());
        let name = name_of(target);

        let fifo = scheme.get_by_string(&graph, &name, SearchOrder::Fifo);
        let from_roots = scheme.get_by_string(&graph, &name, SearchOrder::FromRoots);
        prop_assert_eq!(&fifo, &vec![ids[target]]);
        prop_assert_eq!(fifo, from_roots);
    }

    /// An escaped name used as a pattern finds what the exact name finds.
    #[test]
    fn escaped_pattern_matches_exact(shape in arb_shape(), pick in any::<prop::sample::Index>()) {
        let (graph, scheme, ids) = build(&shape);
        let name = name_of(pick.index(ids.len()));

        let exact = scheme.get_by_string(&graph, &name, SearchOrder::Fifo);
        let pattern = scheme.get_by_regex(&graph, &regex::escape(&name), SearchOrder::Fifo);
        prop_assert_eq!(exact, pattern);
    }

    /// After sorting, no member is an ancestor of an earlier member.
    #[test]
    fn halfsort_orders_ancestors_first(shape in arb_shape()) {
        let (graph, mut scheme, _) = build(&shape);
        let before: BTreeSet<ComponentId> = scheme.iter().collect();

        scheme.halfsort_hierarchically(&graph);
        let members = scheme.members();
        let after: BTreeSet<ComponentId> = members.iter().copied().collect();
        prop_assert_eq!(before, after);
        prop_assert_eq!(members.len(), shape.order.len());
        for (i, &later) in members.iter().enumerate() {
            for &earlier in &members[..i] {
                prop_assert!(!graph.is_ancestor_of(later, earlier));
            }
        }
    }

    /// A sorted scheme survives an XML round trip.
    #[test]
    fn sorted_scheme_round_trips(shape in arb_shape()) {
        let (graph, mut scheme, _) = build(&shape);
        scheme.halfsort_hierarchically(&graph);

        let xml = scheme_to_xml(&graph, &scheme).expect("save");
        let mut loaded_graph = Graph::new();
        let mut loaded = Scheme::new();
        scheme_from_xml(&mut loaded_graph, &mut loaded, &xml).expect("load");

        prop_assert!(loaded.members_equal(&loaded_graph, &scheme, &graph));
        prop_assert!(loaded.deep_equals_in(&loaded_graph, &scheme, &graph));
        prop_assert!(loaded.all_families_valid(&loaded_graph));
    }

    /// Copying is repeatable and every copy equals the source.
    #[test]
    fn deep_copy_is_idempotent(shape in arb_shape()) {
        let (mut graph, scheme, _) = build(&shape);
        let once = scheme.deep_copy(&mut graph).expect("copy");
        let twice = once.deep_copy(&mut graph).expect("copy");

        prop_assert!(scheme.deep_equals(&graph, &once));
        prop_assert!(scheme.deep_equals(&graph, &twice));
        prop_assert!(once.deep_equals(&graph, &twice));
        prop_assert_eq!(once.roots().len(), scheme.roots().len());
        prop_assert_eq!(once.leaves().len(), scheme.leaves().len());
    }

    /// Deep equality is reflexive.
    #[test]
    fn deep_equality_is_reflexive(shape in arb_shape()) {
        let (graph, scheme, _) = build(&shape);
        prop_assert!(scheme.deep_equals(&graph, &scheme));
    }

    /// Dropping a root or leaf member from a copy breaks equality with the
    /// source.
    #[test]
    fn boundary_removal_breaks_equality(shape in arb_shape(), pick in any::<prop::sample::Index>()) {
        let (mut graph, scheme, _) = build(&shape);
        let mut copy = scheme.deep_copy(&mut graph).expect("copy");
        let boundary: Vec<ComponentId> = copy
            .iter()
            .filter(|&id| graph.is_root(id) || graph.is_leaf(id))
            .collect();
        prop_assume!(!boundary.is_empty());

        prop_assert!(copy.remove(&graph, boundary[pick.index(boundary.len())]));
        prop_assert!(!scheme.deep_equals(&graph, &copy));
    }

    /// Equality walks from the caches, so dropping a member with both
    /// parents and children goes unnoticed.
    #[test]
    fn interior_removal_keeps_equality(shape in arb_shape(), pick in any::<prop::sample::Index>()) {
        let (mut graph, scheme, _) = build(&shape);
        let mut copy = scheme.deep_copy(&mut graph).expect("copy");
        let interior: Vec<ComponentId> = copy
            .iter()
            .filter(|&id| !graph.is_root(id) && !graph.is_leaf(id))
            .collect();
        if interior.is_empty() {
            return Ok(());
        }

        prop_assert!(copy.remove(&graph, interior[pick.index(interior.len())]));
        prop_assert!(scheme.deep_equals(&graph, &copy));
    }
}
