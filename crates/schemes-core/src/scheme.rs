//! # Scheme
//!
//! An ordered sequence of component handles plus two caches: the roots and
//! the leaves, both in insertion order.
//!
//! The caches describe the edges as they were when a component entered the
//! scheme. Editing edges of members afterwards makes them stale until
//! [`Scheme::validate_roots_and_leaves`] is called.
//!
//! Graph algorithms over whole schemes live in sibling modules:
//! - `query` - search by name or pattern
//! - `equality` - deep equality
//! - `copy` - deep copy
//! - `hierarchy` - hierarchical half-sort

use crate::{ComponentId, Graph, Information, SchemeError};
use serde::{Deserialize, Serialize};

// =============================================================================
// SCHEME
// =============================================================================

/// An ordered collection of components with root/leaf caches.
///
/// Members are handles into a [`Graph`]; one graph may back many schemes
/// and a component may belong to several of them. Members may link to
/// components outside the scheme (associated components).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scheme {
    members: Vec<ComponentId>,
    roots: Vec<ComponentId>,
    leaves: Vec<ComponentId>,
}

impl Scheme {
    /// Create an empty scheme.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty scheme with room for `capacity` members.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            members: Vec::with_capacity(capacity),
            roots: Vec::new(),
            leaves: Vec::new(),
        }
    }

    /// Create a scheme holding `ids` in order, skipping unknown handles.
    #[must_use]
    pub fn from_components(graph: &Graph, ids: impl IntoIterator<Item = ComponentId>) -> Self {
        let mut scheme = Self::new();
        scheme.members = ids
            .into_iter()
            .filter(|id| graph.contains_component(*id))
            .collect();
        scheme.validate_roots_and_leaves(graph);
        scheme
    }

    // =========================================================================
    // INSPECTION
    // =========================================================================

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True if the scheme has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in scheme order.
    #[must_use]
    pub fn members(&self) -> &[ComponentId] {
        &self.members
    }

    /// Iterate over the members in scheme order.
    pub fn iter(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.members.iter().copied()
    }

    /// Member at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<ComponentId> {
        self.members.get(index).copied()
    }

    /// Position of the first member shallow-equal to `id`.
    #[must_use]
    pub fn index_of(&self, graph: &Graph, id: ComponentId) -> Option<usize> {
        graph.position_shallow(&self.members, id)
    }

    /// Cached roots in insertion order.
    #[must_use]
    pub fn roots(&self) -> &[ComponentId] {
        &self.roots
    }

    /// Cached leaves in insertion order.
    #[must_use]
    pub fn leaves(&self) -> &[ComponentId] {
        &self.leaves
    }

    /// Cached root at `index`.
    #[must_use]
    pub fn root(&self, index: usize) -> Option<ComponentId> {
        self.roots.get(index).copied()
    }

    /// Cached leaf at `index`.
    #[must_use]
    pub fn leaf(&self, index: usize) -> Option<ComponentId> {
        self.leaves.get(index).copied()
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// True if a member is shallow-equal to `id`.
    #[must_use]
    pub fn contains(&self, graph: &Graph, id: ComponentId) -> bool {
        self.index_of(graph, id).is_some()
    }

    /// True if some member is an ancestor of `id`.
    #[must_use]
    pub fn contains_ancestor_of(&self, graph: &Graph, id: ComponentId) -> bool {
        self.members.iter().any(|&m| graph.is_ancestor_of(m, id))
    }

    /// True if some member is a descendant of `id`.
    #[must_use]
    pub fn contains_descendant_of(&self, graph: &Graph, id: ComponentId) -> bool {
        self.members.iter().any(|&m| graph.is_descendant_of(m, id))
    }

    /// `contains`, optionally widened to ancestors and/or descendants.
    #[must_use]
    pub fn contains_related(
        &self,
        graph: &Graph,
        id: ComponentId,
        include_ancestors: bool,
        include_descendants: bool,
    ) -> bool {
        self.contains(graph, id)
            || (include_ancestors && self.contains_ancestor_of(graph, id))
            || (include_descendants && self.contains_descendant_of(graph, id))
    }

    /// True if every member has a valid family.
    #[must_use]
    pub fn all_families_valid(&self, graph: &Graph) -> bool {
        self.members.iter().all(|&m| graph.has_valid_family(m))
    }

    /// Pairwise shallow equality of the member lists, in order.
    ///
    /// `other` may live in a different arena.
    #[must_use]
    pub fn members_equal(&self, graph: &Graph, other: &Scheme, other_graph: &Graph) -> bool {
        self.len() == other.len()
            && self
                .members
                .iter()
                .zip(&other.members)
                .all(|(&a, &b)| match (graph.info(a), other_graph.info(b)) {
                    (Some(x), Some(y)) => x == y,
                    _ => false,
                })
    }

    /// Render every cached root followed by its descendant tree.
    #[must_use]
    pub fn roots_to_string(&self, graph: &Graph) -> String {
        let mut out = String::new();
        for &root in &self.roots {
            if let Some(info) = graph.info(root) {
                out.push_str(&info.to_string());
            }
            out.push('\n');
            out.push_str(&graph.descendants_to_string(root));
        }
        out
    }

    // =========================================================================
    // CACHE MAINTENANCE
    // =========================================================================

    /// Rebuild both caches from the current edges of all members.
    pub fn validate_roots_and_leaves(&mut self, graph: &Graph) {
        self.roots.clear();
        self.leaves.clear();
        let members = std::mem::take(&mut self.members);
        for &id in &members {
            self.cache_add(graph, id);
        }
        self.members = members;
    }

    fn cache_add(&mut self, graph: &Graph, id: ComponentId) {
        if graph.is_root(id) {
            self.roots.push(id);
        }
        if graph.is_leaf(id) {
            self.leaves.push(id);
        }
    }

    fn cache_remove(&mut self, id: ComponentId) {
        if let Some(pos) = self.roots.iter().position(|&r| r == id) {
            self.roots.remove(pos);
        }
        if let Some(pos) = self.leaves.iter().position(|&l| l == id) {
            self.leaves.remove(pos);
        }
    }

    fn check_index(&self, index: usize, len: usize) -> Result<(), SchemeError> {
        if index < len {
            Ok(())
        } else {
            Err(SchemeError::IndexOutOfBounds {
                index,
                len: self.members.len(),
            })
        }
    }

    // =========================================================================
    // MUTATORS
    // =========================================================================

    /// Append a component. Unknown handles are ignored.
    pub fn add(&mut self, graph: &Graph, id: ComponentId) -> bool {
        if !graph.contains_component(id) {
            return false;
        }
        self.members.push(id);
        self.cache_add(graph, id);
        true
    }

    /// Append several components; true if at least one was added.
    pub fn add_all(&mut self, graph: &Graph, ids: impl IntoIterator<Item = ComponentId>) -> bool {
        ids.into_iter()
            .fold(false, |changed, id| self.add(graph, id) || changed)
    }

    /// Insert a component at `index` (`index == len` appends).
    pub fn insert(
        &mut self,
        graph: &Graph,
        index: usize,
        id: ComponentId,
    ) -> Result<bool, SchemeError> {
        self.check_index(index, self.members.len() + 1)?;
        if !graph.contains_component(id) {
            return Ok(false);
        }
        self.members.insert(index, id);
        self.cache_add(graph, id);
        Ok(true)
    }

    /// Insert several components starting at `index`, keeping their order.
    pub fn insert_all(
        &mut self,
        graph: &Graph,
        index: usize,
        ids: impl IntoIterator<Item = ComponentId>,
    ) -> Result<bool, SchemeError> {
        self.check_index(index, self.members.len() + 1)?;
        let ids: Vec<ComponentId> = ids
            .into_iter()
            .filter(|id| graph.contains_component(*id))
            .collect();
        self.members.splice(index..index, ids.iter().copied());
        for &id in &ids {
            self.cache_add(graph, id);
        }
        Ok(!ids.is_empty())
    }

    /// Replace the member at `index` and return the previous one.
    ///
    /// The previous member leaves both caches; the new one enters them
    /// under the same rule as [`Scheme::add`].
    pub fn set(
        &mut self,
        graph: &Graph,
        index: usize,
        id: ComponentId,
    ) -> Result<ComponentId, SchemeError> {
        if !graph.contains_component(id) {
            return Err(SchemeError::InvalidArgument(format!(
                "unknown component {}",
                id
            )));
        }
        self.check_index(index, self.members.len())?;
        let old = std::mem::replace(&mut self.members[index], id);
        self.cache_remove(old);
        self.cache_add(graph, id);
        Ok(old)
    }

    /// Remove the first member shallow-equal to `id`.
    pub fn remove(&mut self, graph: &Graph, id: ComponentId) -> bool {
        match self.index_of(graph, id) {
            Some(index) => self.remove_at(index).is_ok(),
            None => false,
        }
    }

    /// Remove and return the member at `index`.
    pub fn remove_at(&mut self, index: usize) -> Result<ComponentId, SchemeError> {
        self.check_index(index, self.members.len())?;
        let removed = self.members.remove(index);
        self.cache_remove(removed);
        Ok(removed)
    }

    /// Remove every member shallow-equal to one of `ids`.
    pub fn remove_all(&mut self, graph: &Graph, ids: &[ComponentId]) -> bool {
        self.filter_members(|m| graph.position_shallow(ids, m).is_none())
    }

    /// Keep only members shallow-equal to one of `ids`.
    pub fn retain_all(&mut self, graph: &Graph, ids: &[ComponentId]) -> bool {
        self.filter_members(|m| graph.position_shallow(ids, m).is_some())
    }

    fn filter_members(&mut self, mut keep: impl FnMut(ComponentId) -> bool) -> bool {
        let mut removed = Vec::new();
        self.members.retain(|&m| {
            let kept = keep(m);
            if !kept {
                removed.push(m);
            }
            kept
        });
        for &id in &removed {
            self.cache_remove(id);
        }
        !removed.is_empty()
    }

    /// Remove all members and empty both caches.
    pub fn clear(&mut self) {
        self.members.clear();
        self.roots.clear();
        self.leaves.clear();
    }

    /// Swap `old` for a new component carrying `info`, `parents` and
    /// `children`.
    ///
    /// The old component is detached from its family, the new one is
    /// attached to its own, and it takes the old one's place in the scheme
    /// (or is appended when `old` is not a member). Returns the new handle.
    pub fn replace(
        &mut self,
        graph: &mut Graph,
        old: ComponentId,
        info: Information,
        parents: &[ComponentId],
        children: &[ComponentId],
    ) -> Result<ComponentId, SchemeError> {
        if let Some(unknown) = parents
            .iter()
            .chain(children)
            .find(|id| !graph.contains_component(**id))
        {
            return Err(SchemeError::InvalidArgument(format!(
                "unknown component {}",
                unknown
            )));
        }

        graph.force_family_apart(old);
        let index = self.index_of(graph, old);

        let new = graph.insert_component(info);
        for &parent in parents {
            graph.add_parent(new, parent);
        }
        for &child in children {
            graph.add_child(new, child);
        }
        graph.force_family_together(new);

        match index {
            Some(index) => {
                self.set(graph, index, new)?;
            }
            None => {
                self.add(graph, new);
            }
        }
        // neighbours of both components changed their root/leaf status
        self.validate_roots_and_leaves(graph);
        Ok(new)
    }
}

// =============================================================================
// TESTS
// =============================================================================
