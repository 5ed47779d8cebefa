//! # Component
//!
//! A node of a scheme: payload plus two ordered edge lists.
//!
//! Edge lists hold handles, may contain duplicates and are edited one side at
//! a time. Keeping both directions mirrored is the caller's job (see
//! [`Graph::force_family_together`](crate::Graph::force_family_together)).
//! Operations that have to follow handles live on [`Graph`](crate::Graph).

use crate::{ComponentId, EdgeKind, Information};

/// A component record as stored in the arena.
#[derive(Debug, Clone, Default)]
pub struct Component {
    info: Information,
    parents: Vec<ComponentId>,
    children: Vec<ComponentId>,
}

impl Component {
    /// Create a component without edges.
    #[must_use]
    pub fn new(info: Information) -> Self {
        Self {
            info,
            parents: Vec::new(),
            children: Vec::new(),
        }
    }

    /// The payload.
    #[must_use]
    pub fn info(&self) -> &Information {
        &self.info
    }

    /// The name, if present.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.info.name()
    }

    /// The description, if present.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.info.description()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.info.name = name;
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.info.description = description;
    }

    /// Parents in insertion order.
    #[must_use]
    pub fn parents(&self) -> &[ComponentId] {
        &self.parents
    }

    /// Children in insertion order.
    #[must_use]
    pub fn children(&self) -> &[ComponentId] {
        &self.children
    }

    /// The edge list selected by `kind`.
    #[must_use]
    pub fn edges(&self, kind: EdgeKind) -> &[ComponentId] {
        match kind {
            EdgeKind::Parent => &self.parents,
            EdgeKind::Child => &self.children,
        }
    }

    pub(crate) fn edges_mut(&mut self, kind: EdgeKind) -> &mut Vec<ComponentId> {
        match kind {
            EdgeKind::Parent => &mut self.parents,
            EdgeKind::Child => &mut self.children,
        }
    }

    /// True if the component has no parents.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// True if the component has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Payload equality, edges ignored.
    #[must_use]
    pub fn shallow_eq(&self, other: &Component) -> bool {
        self.info == other.info
    }

    /// Copy of the payload with both edge lists empty.
    #[must_use]
    pub fn plain_copy(&self) -> Self {
        Self::new(self.info.clone())
    }
}
