//! # Core Type Definitions
//!
//! This module contains the small value types shared by the whole crate:
//! - Component handles (`ComponentId`)
//! - Component payload (`Information`)
//! - Edge list selectors (`EdgeKind`)
//! - Results of the hierarchical comparison (`HierarchyOrdering`)
//! - Search strategies (`SearchOrder`)
//! - Error types (`SchemeError`)
//!
//! ## Determinism Guarantees
//!
//! Handles implement `Ord` so every visited set and identity map in the
//! crate can be a `BTreeSet`/`BTreeMap` with reproducible iteration.

use crate::primitives::{EDGE_CODE_CHILD, EDGE_CODE_PARENT};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// COMPONENT HANDLE
// =============================================================================

/// Handle of a component stored in a [`Graph`](crate::Graph).
///
/// Handles are allocated monotonically and never reused. Two handles are
/// equal only if they denote the very same component; payload equality is
/// a separate notion (see [`Information`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ComponentId(pub u64);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// INFORMATION (payload)
// =============================================================================

/// Payload carried by a component: a name and a description.
///
/// An absent value is distinct from an empty string, both for equality and
/// for hashing. Two components are *shallow-equal* iff their payloads are
/// equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Information {
    /// External identity used to resolve parent references on load.
    pub name: Option<String>,
    /// Free text.
    pub description: Option<String>,
}

impl Information {
    /// Create a payload with both fields present.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: Some(description.into()),
        }
    }

    /// Create a payload with the given name and an empty description.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, "")
    }

    /// Create a payload with both fields absent.
    #[must_use]
    pub fn absent() -> Self {
        Self {
            name: None,
            description: None,
        }
    }

    /// The name, if present.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The description, if present.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl Default for Information {
    fn default() -> Self {
        Self::new("", "")
    }
}

impl fmt::Display for Information {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name().unwrap_or_default())
    }
}

// =============================================================================
// EDGE KIND
// =============================================================================

/// Selects one of the two edge lists of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Upward edges.
    Parent,
    /// Downward edges.
    Child,
}

impl EdgeKind {
    /// The list that mirrors this one on the other end of an edge.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Parent => Self::Child,
            Self::Child => Self::Parent,
        }
    }

    /// Legacy integer code of this kind.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Parent => EDGE_CODE_PARENT,
            Self::Child => EDGE_CODE_CHILD,
        }
    }
}

impl TryFrom<u8> for EdgeKind {
    type Error = SchemeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            EDGE_CODE_PARENT => Ok(Self::Parent),
            EDGE_CODE_CHILD => Ok(Self::Child),
            other => Err(SchemeError::InvalidArgument(format!(
                "Illegal iterator type: {} is out of range",
                other
            ))),
        }
    }
}

// =============================================================================
// HIERARCHY ORDERING
// =============================================================================

/// Outcome of comparing two components by ancestry.
///
/// This is a partial order: it is antisymmetric and transitive only while
/// the families involved are valid. `Incomparable` is *not* equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HierarchyOrdering {
    /// The left component is an ancestor of the right one.
    Less,
    /// The left component is a descendant of the right one.
    Greater,
    /// Neither is reachable from the other.
    Incomparable,
}

// =============================================================================
// SEARCH ORDER
// =============================================================================

/// Strategy used by the name searches of a scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SearchOrder {
    /// Every member, in scheme order.
    #[default]
    Fifo,
    /// Breadth-first from the cached roots over child edges. Members that
    /// are unreachable from a root are skipped, associated components that
    /// are reachable are included.
    FromRoots,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised by scheme operations.
///
/// - Mutators report ordinary misses with `bool`, never with an error
/// - `Dependency` and `Malformed` display exactly their sentinel text
/// - The CORE never panics; all errors are recoverable
#[derive(Debug, Error)]
pub enum SchemeError {
    /// A value was rejected at the API boundary.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A position lies outside the member sequence.
    #[error("Index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// A component could not be cloned during a deep copy.
    #[error("Clone not supported for component {0}")]
    CloneUnsupported(ComponentId),

    /// A parent reference could not be resolved while loading.
    #[error("{0}")]
    Dependency(String),

    /// The document does not follow the scheme grammar.
    #[error("{0}")]
    Malformed(String),

    /// The XML tokenizer rejected the input.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The underlying reader or writer failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SchemeError {
    /// True for the scheme-specific failures: unresolved dependencies and
    /// malformed documents.
    #[must_use]
    pub fn is_scheme_error(&self) -> bool {
        matches!(self, Self::Dependency(_) | Self::Malformed(_) | Self::Xml(_))
    }
}

// =============================================================================
// TESTS
// =============================================================================
