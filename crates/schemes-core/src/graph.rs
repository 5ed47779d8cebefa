//! # Component Arena
//!
//! The `Graph` owns every component and hands out [`ComponentId`] handles.
//! Edges are stored as handles, so cycles and shared children need no
//! back-pointers and no reference counting.
//!
//! All data structures use `BTreeMap`/`BTreeSet` for deterministic ordering.
//!
//! ## Equality
//!
//! Edge membership (`is_parent_of`, `remove_child`, ...) and the target test
//! of the ancestor search compare payloads (shallow equality). Visited sets
//! compare handles.

use crate::primitives::{TREE_BRANCH, TREE_CUTOFF, TREE_LAST};
use crate::{Component, ComponentId, EdgeKind, HierarchyOrdering, Information, SchemeError};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

// =============================================================================
// GRAPH
// =============================================================================

/// Arena of components.
///
/// Components are never destroyed: removing one from a scheme drops a handle,
/// not the component, and its edges to other components stay intact.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// Component storage: ComponentId -> Component
    components: BTreeMap<ComponentId, Component>,

    /// Next available ComponentId
    next_component_id: u64,
}

impl Graph {
    /// Create an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new component without edges and return its handle.
    pub fn insert_component(&mut self, info: Information) -> ComponentId {
        self.insert(Component::new(info))
    }

    /// Shorthand for a component with a name and an empty description.
    pub fn add_named(&mut self, name: impl Into<String>) -> ComponentId {
        self.insert_component(Information::named(name))
    }

    fn insert(&mut self, component: Component) -> ComponentId {
        let id = ComponentId(self.next_component_id);
        self.next_component_id = self.next_component_id.saturating_add(1);
        self.components.insert(id, component);
        id
    }

    /// Look up a component.
    #[must_use]
    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(&id)
    }

    /// Look up a component for editing its payload.
    ///
    /// Edges are edited through the graph so that handles are checked.
    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        self.components.get_mut(&id)
    }

    /// True if the handle denotes a stored component.
    #[must_use]
    pub fn contains_component(&self, id: ComponentId) -> bool {
        self.components.contains_key(&id)
    }

    /// Number of stored components.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// All components in handle order.
    pub fn components(&self) -> impl Iterator<Item = (ComponentId, &Component)> {
        self.components.iter().map(|(id, c)| (*id, c))
    }

    /// Payload of a component.
    #[must_use]
    pub fn info(&self, id: ComponentId) -> Option<&Information> {
        self.components.get(&id).map(Component::info)
    }

    /// Name of a component; `None` if the handle is unknown or the name absent.
    #[must_use]
    pub fn name(&self, id: ComponentId) -> Option<&str> {
        self.info(id).and_then(Information::name)
    }

    /// Payload equality of two stored components.
    #[must_use]
    pub fn shallow_eq(&self, a: ComponentId, b: ComponentId) -> bool {
        match (self.info(a), self.info(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    /// Position of the first entry of `list` that is shallow-equal to `target`.
    pub(crate) fn position_shallow(
        &self,
        list: &[ComponentId],
        target: ComponentId,
    ) -> Option<usize> {
        let wanted = self.info(target)?;
        list.iter().position(|e| self.info(*e) == Some(wanted))
    }

    // =========================================================================
    // EDGE ACCESS
    // =========================================================================

    /// The edge list of `id` selected by `kind`; empty for unknown handles.
    #[must_use]
    pub fn edges(&self, id: ComponentId, kind: EdgeKind) -> &[ComponentId] {
        self.components
            .get(&id)
            .map(|c| c.edges(kind))
            .unwrap_or_default()
    }

    /// Edge list selected by a legacy integer code (1 = parents, 2 = children).
    ///
    /// Any other code fails with `SchemeError::InvalidArgument`.
    pub fn edges_by_code(&self, id: ComponentId, code: u8) -> Result<&[ComponentId], SchemeError> {
        let kind = EdgeKind::try_from(code)?;
        Ok(self.edges(id, kind))
    }

    /// Parents of `id`.
    #[must_use]
    pub fn parents(&self, id: ComponentId) -> &[ComponentId] {
        self.edges(id, EdgeKind::Parent)
    }

    /// Children of `id`.
    #[must_use]
    pub fn children(&self, id: ComponentId) -> &[ComponentId] {
        self.edges(id, EdgeKind::Child)
    }

    /// True if `id` is stored and has no parents.
    #[must_use]
    pub fn is_root(&self, id: ComponentId) -> bool {
        self.component(id).is_some_and(Component::is_root)
    }

    /// True if `id` is stored and has no children.
    #[must_use]
    pub fn is_leaf(&self, id: ComponentId) -> bool {
        self.component(id).is_some_and(Component::is_leaf)
    }

    pub(crate) fn set_edges(&mut self, id: ComponentId, kind: EdgeKind, edges: Vec<ComponentId>) {
        if let Some(component) = self.components.get_mut(&id) {
            *component.edges_mut(kind) = edges;
        }
    }

    // =========================================================================
    // FAMILY QUERIES
    // =========================================================================

    /// True if `other` is among the children of `id`.
    #[must_use]
    pub fn is_parent_of(&self, id: ComponentId, other: ComponentId) -> bool {
        self.position_shallow(self.children(id), other).is_some()
    }

    /// True if `other` is among the parents of `id`.
    #[must_use]
    pub fn is_child_of(&self, id: ComponentId, other: ComponentId) -> bool {
        self.position_shallow(self.parents(id), other).is_some()
    }

    /// True if `other` can be reached from `id` by following child edges.
    #[must_use]
    pub fn is_ancestor_of(&self, id: ComponentId, other: ComponentId) -> bool {
        self.reaches(self.children(id), other, EdgeKind::Child)
    }

    /// True if `other` can be reached from `id` by following parent edges.
    #[must_use]
    pub fn is_descendant_of(&self, id: ComponentId, other: ComponentId) -> bool {
        self.reaches(self.parents(id), other, EdgeKind::Parent)
    }

    /// Search from `start` along `kind` edges for a component shallow-equal
    /// to `target`. Every handle is expanded at most once, so cycles terminate.
    fn reaches(&self, start: &[ComponentId], target: ComponentId, kind: EdgeKind) -> bool {
        let Some(wanted) = self.info(target) else {
            return false;
        };

        let mut checked = BTreeSet::new();
        let mut to_check: VecDeque<ComponentId> = start.iter().copied().collect();

        while let Some(current) = to_check.pop_front() {
            if !checked.insert(current) {
                continue;
            }
            if self.info(current) == Some(wanted) {
                return true;
            }
            for &next in self.edges(current, kind) {
                if !checked.contains(&next) {
                    to_check.push_back(next);
                }
            }
        }
        false
    }

    /// A family is valid if the component is not its own ancestor or
    /// descendant and every edge is mirrored on the other end.
    #[must_use]
    pub fn has_valid_family(&self, id: ComponentId) -> bool {
        if !self.contains_component(id) {
            return false;
        }
        if self.is_ancestor_of(id, id) || self.is_descendant_of(id, id) {
            return false;
        }
        self.parents(id).iter().all(|&p| self.is_parent_of(p, id))
            && self.children(id).iter().all(|&c| self.is_child_of(c, id))
    }

    /// Compare two components by ancestry.
    #[must_use]
    pub fn compare_hierarchy(&self, a: ComponentId, b: ComponentId) -> HierarchyOrdering {
        if self.is_ancestor_of(a, b) || self.is_descendant_of(b, a) {
            HierarchyOrdering::Less
        } else if self.is_descendant_of(a, b) || self.is_ancestor_of(b, a) {
            HierarchyOrdering::Greater
        } else {
            HierarchyOrdering::Incomparable
        }
    }

    // =========================================================================
    // ONE-SIDED MUTATORS
    // =========================================================================

    /// Append `parent` to the parents of `id`. `parent` is not changed.
    ///
    /// Returns `false` without change if either handle is unknown.
    pub fn add_parent(&mut self, id: ComponentId, parent: ComponentId) -> bool {
        self.link(id, parent, EdgeKind::Parent)
    }

    /// Append `child` to the children of `id`. `child` is not changed.
    ///
    /// Returns `false` without change if either handle is unknown.
    pub fn add_child(&mut self, id: ComponentId, child: ComponentId) -> bool {
        self.link(id, child, EdgeKind::Child)
    }

    /// Remove the first parent of `id` that is shallow-equal to `parent`.
    pub fn remove_parent(&mut self, id: ComponentId, parent: ComponentId) -> bool {
        self.unlink(id, parent, EdgeKind::Parent)
    }

    /// Remove the first child of `id` that is shallow-equal to `child`.
    pub fn remove_child(&mut self, id: ComponentId, child: ComponentId) -> bool {
        self.unlink(id, child, EdgeKind::Child)
    }

    fn link(&mut self, id: ComponentId, other: ComponentId, kind: EdgeKind) -> bool {
        if !self.contains_component(other) {
            return false;
        }
        match self.components.get_mut(&id) {
            Some(component) => {
                component.edges_mut(kind).push(other);
                true
            }
            None => false,
        }
    }

    fn unlink(&mut self, id: ComponentId, other: ComponentId, kind: EdgeKind) -> bool {
        let Some(pos) = self.position_shallow(self.edges(id, kind), other) else {
            return false;
        };
        match self.components.get_mut(&id) {
            Some(component) => {
                component.edges_mut(kind).remove(pos);
                true
            }
            None => false,
        }
    }

    /// True if the `kind` edge from `id` to `other` has its mirror: `other`
    /// lists `id` in its opposite list.
    fn is_mirrored(&self, id: ComponentId, other: ComponentId, kind: EdgeKind) -> bool {
        self.position_shallow(self.edges(other, kind.opposite()), id)
            .is_some()
    }

    /// Every edge of `id` as `(kind, other)`, parents first.
    fn family(&self, id: ComponentId) -> Vec<(EdgeKind, ComponentId)> {
        [EdgeKind::Parent, EdgeKind::Child]
            .into_iter()
            .flat_map(|kind| self.edges(id, kind).iter().map(move |&other| (kind, other)))
            .collect()
    }

    /// Make every parent list `id` as a child and every child list `id` as a
    /// parent, appending where the back-edge is missing.
    pub fn force_family_together(&mut self, id: ComponentId) {
        let family = self.family(id);
        for (kind, other) in family {
            if !self.is_mirrored(id, other, kind) {
                self.link(other, id, kind.opposite());
            }
        }
    }

    /// Remove `id` from the children of its parents and from the parents of
    /// its children. The edge lists of `id` itself are kept.
    pub fn force_family_apart(&mut self, id: ComponentId) {
        let family = self.family(id);
        for (kind, other) in family {
            if self.is_mirrored(id, other, kind) {
                self.unlink(other, id, kind.opposite());
            }
        }
    }

    // =========================================================================
    // COPYING & RENDERING
    // =========================================================================

    /// Store a payload-only copy of `id` (no edges) and return its handle.
    pub fn plain_copy(&mut self, id: ComponentId) -> Result<ComponentId, SchemeError> {
        let copy = self
            .component(id)
            .map(Component::plain_copy)
            .ok_or(SchemeError::CloneUnsupported(id))?;
        Ok(self.insert(copy))
    }

    /// Render the subgraph below `id` as an indented text tree.
    ///
    /// One line per visited edge: `level` spaces, `├` or `└`, the name. A
    /// component whose subtree is drawn at another position gets ` → ...`
    /// instead of being expanded again.
    #[must_use]
    pub fn descendants_to_string(&self, id: ComponentId) -> String {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Mark {
            Level(usize),
            Expanded,
        }

        let mut out = String::new();
        let children = self.children(id);
        let mut marked: BTreeMap<ComponentId, Mark> =
            children.iter().map(|&c| (c, Mark::Level(0))).collect();
        let mut stack: Vec<(&[ComponentId], usize)> = vec![(children, 0)];

        while let Some(frame) = stack.last_mut() {
            let Some(&current) = frame.0.get(frame.1) else {
                stack.pop();
                continue;
            };
            frame.1 += 1;
            let has_more = frame.1 < frame.0.len();
            let level = stack.len() - 1;

            out.push_str(&" ".repeat(level));
            out.push(if has_more { TREE_BRANCH } else { TREE_LAST });
            if let Some(info) = self.info(current) {
                out.push_str(&info.to_string());
            }

            let grandchildren = self.children(current);
            match marked.get(&current).copied() {
                None => {
                    marked.insert(current, Mark::Level(level));
                }
                Some(Mark::Level(l)) if l == level => {
                    marked.insert(current, Mark::Expanded);
                    if !grandchildren.is_empty() {
                        for &next in grandchildren {
                            marked.entry(next).or_insert(Mark::Level(level + 1));
                        }
                        stack.push((grandchildren, 0));
                    }
                }
                Some(_) => {
                    if !grandchildren.is_empty() {
                        out.push_str(TREE_CUTOFF);
                    }
                }
            }
            out.push('\n');
        }
        out
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Literature -> {Authors, Light Novels}, Authors -> Nisio Isin,
    /// Nisio Isin -> DN (LN), Light Novels -> DN (LN); all mirrored.
    fn diamond() -> (Graph, [ComponentId; 5]) {
        let mut graph = Graph::new();
        let lit = graph.add_named("Literature");
        let aut = graph.add_named("Authors");
        let lino = graph.add_named("Light Novels");
        let isin = graph.add_named("Nisio Isin");
        let dnln = graph.add_named("DN (LN)");
        graph.add_child(lit, aut);
        graph.add_child(lit, lino);
        graph.force_family_together(lit);
        graph.add_child(aut, isin);
        graph.force_family_together(aut);
        graph.add_parent(dnln, isin);
        graph.add_parent(dnln, lino);
        graph.force_family_together(dnln);
        (graph, [lit, aut, lino, isin, dnln])
    }

    #[test]
    fn mutators_are_one_sided() {
        let mut graph = Graph::new();
        let a = graph.add_named("a");
        let b = graph.add_named("b");

        assert!(graph.add_child(a, b));
        assert!(graph.is_parent_of(a, b));
        assert!(!graph.is_child_of(b, a));
        assert!(!graph.has_valid_family(a));

        graph.force_family_together(a);
        assert!(graph.is_child_of(b, a));
        assert!(graph.has_valid_family(a));
        assert!(graph.has_valid_family(b));
    }

    #[test]
    fn unknown_handles_are_rejected() {
        let mut graph = Graph::new();
        let a = graph.add_named("a");
        let ghost = ComponentId(999);

        assert!(!graph.add_parent(a, ghost));
        assert!(!graph.add_child(ghost, a));
        assert!(graph.parents(a).is_empty());
        assert!(!graph.has_valid_family(ghost));
        assert!(graph.edges(ghost, EdgeKind::Child).is_empty());
    }

    #[test]
    fn remove_uses_shallow_equality() {
        let mut graph = Graph::new();
        let a = graph.add_named("a");
        let b = graph.add_named("b");
        let twin = graph.add_named("b");

        graph.add_child(a, b);
        graph.add_child(a, b);
        assert!(graph.remove_child(a, twin));
        assert_eq!(graph.children(a), &[b]);
        assert!(graph.remove_child(a, b));
        assert!(!graph.remove_child(a, b));
    }

    #[test]
    fn ancestry_through_diamond() {
        let (graph, [lit, aut, lino, isin, dnln]) = diamond();

        assert!(graph.is_ancestor_of(lit, dnln));
        assert!(graph.is_ancestor_of(aut, dnln));
        assert!(!graph.is_ancestor_of(lino, isin));
        assert!(graph.is_descendant_of(dnln, lit));
        assert!(!graph.is_descendant_of(lit, dnln));
        assert!([lit, aut, lino, isin, dnln]
            .iter()
            .all(|&id| graph.has_valid_family(id)));
    }

    #[test]
    fn cycles_terminate_and_invalidate() {
        let mut graph = Graph::new();
        let a = graph.add_named("a");
        let b = graph.add_named("b");
        let c = graph.add_named("c");
        graph.add_child(a, b);
        graph.add_child(b, c);
        graph.add_child(c, a);
        for id in [a, b, c] {
            graph.force_family_together(id);
        }

        assert!(graph.is_ancestor_of(a, a));
        assert!(!graph.has_valid_family(b));
    }

    #[test]
    fn force_family_apart_detaches_other_ends() {
        let (mut graph, [lit, aut, _, isin, _]) = diamond();

        graph.force_family_apart(aut);
        assert!(!graph.is_parent_of(lit, aut));
        assert!(!graph.is_child_of(isin, aut));
        // the receiver keeps its own lists
        assert_eq!(graph.parents(aut), &[lit]);
        assert_eq!(graph.children(aut), &[isin]);
    }

    #[test]
    fn force_family_together_mirrors_both_lists_once() {
        let mut graph = Graph::new();
        let up = graph.add_named("up");
        let mid = graph.add_named("mid");
        let down = graph.add_named("down");
        graph.add_parent(mid, up);
        graph.add_child(mid, down);
        // already mirrored on one end
        graph.add_parent(down, mid);

        graph.force_family_together(mid);
        for kind in [EdgeKind::Parent, EdgeKind::Child] {
            for &other in graph.edges(mid, kind) {
                assert_eq!(graph.edges(other, kind.opposite()), &[mid]);
            }
        }
        assert!(graph.has_valid_family(mid));

        graph.force_family_apart(mid);
        assert!(graph.children(up).is_empty());
        assert!(graph.parents(down).is_empty());
    }

    #[test]
    fn edges_by_code_dispatch() {
        let (graph, [lit, aut, ..]) = diamond();

        assert_eq!(graph.edges_by_code(aut, 1).expect("parents"), &[lit]);
        assert_eq!(graph.edges_by_code(lit, 2).expect("children").len(), 2);
        assert!(matches!(
            graph.edges_by_code(lit, 3),
            Err(SchemeError::InvalidArgument(_))
        ));
    }

    #[test]
    fn compare_hierarchy_is_partial() {
        let (graph, [lit, aut, lino, _, dnln]) = diamond();

        assert_eq!(graph.compare_hierarchy(lit, dnln), HierarchyOrdering::Less);
        assert_eq!(graph.compare_hierarchy(dnln, aut), HierarchyOrdering::Greater);
        assert_eq!(
            graph.compare_hierarchy(aut, lino),
            HierarchyOrdering::Incomparable
        );
    }

    #[test]
    fn plain_copy_is_detached() {
        let (mut graph, [lit, ..]) = diamond();
        let copy = graph.plain_copy(lit).expect("copy");

        assert_ne!(copy, lit);
        assert!(graph.shallow_eq(copy, lit));
        assert!(graph.is_leaf(copy));
        assert!(graph.is_root(copy));
        assert!(matches!(
            graph.plain_copy(ComponentId(999)),
            Err(SchemeError::CloneUnsupported(ComponentId(999)))
        ));
    }

    #[test]
    fn descendants_render_with_cutoff() {
        let (graph, [lit, ..]) = diamond();

        let expected = "├Authors\n └Nisio Isin\n  └DN (LN)\n└Light Novels\n └DN (LN)\n";
        assert_eq!(graph.descendants_to_string(lit), expected);
    }

    #[test]
    fn descendants_render_marks_revisited_subtrees() {
        let mut graph = Graph::new();
        let top = graph.add_named("top");
        let shared = graph.add_named("shared");
        let mid = graph.add_named("mid");
        let below = graph.add_named("below");
        // top -> {mid, shared}, mid -> shared, shared -> below
        graph.add_child(top, mid);
        graph.add_child(top, shared);
        graph.add_child(mid, shared);
        graph.add_child(shared, below);

        let rendered = graph.descendants_to_string(top);
        assert_eq!(
            rendered,
            "├mid\n └shared → ...\n└shared\n └below\n"
        );
    }
}
