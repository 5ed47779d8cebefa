//! # schemes-core
//!
//! In-memory schemes: ordered collections of named components linked as a
//! directed multigraph, usually acyclic.
//!
//! ## Layout
//!
//! - `types` → handles, payload, edge kinds, errors
//! - `component` + `graph` → the component arena and family operations
//! - `scheme` → the member sequence with root/leaf caches
//! - `query`, `equality`, `copy`, `hierarchy` → algorithms over schemes
//! - `formats` → XML persistence and Graphviz export
//!
//! ## Architectural Constraints
//!
//! - Single-threaded and synchronous: no locking, no async
//! - Deterministic: `BTreeMap`/`BTreeSet` only, no randomness
//! - No panics: every fallible operation returns `Result`, ordinary misses
//!   return `false` or an empty result
//! - Components are shared, never destroyed; a handle that is not stored in
//!   the arena behaves like an absent component
//!
//! ## Example
//!
//! ```
//! use schemes_core::{Graph, Scheme};
//!
//! let mut graph = Graph::new();
//! let parent = graph.add_named("Literature");
//! let child = graph.add_named("Authors");
//! graph.add_child(parent, child);
//! graph.force_family_together(parent);
//!
//! let mut scheme = Scheme::new();
//! scheme.add_all(&graph, [parent, child]);
//! assert_eq!(scheme.roots(), &[parent]);
//! assert_eq!(scheme.roots_to_string(&graph), "Literature\n└Authors\n");
//! ```

// =============================================================================
// MODULES
// =============================================================================

pub mod component;
pub mod copy;
pub mod equality;
pub mod formats;
pub mod graph;
pub mod hierarchy;
pub mod primitives;
pub mod query;
pub mod scheme;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{ComponentId, EdgeKind, HierarchyOrdering, Information, SchemeError, SearchOrder};

// =============================================================================
// RE-EXPORTS: Graph & Scheme
// =============================================================================

pub use component::Component;
pub use graph::Graph;
pub use query::NameMatcher;
pub use scheme::Scheme;

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{
    export_dot, load_scheme, read_scheme, save_scheme, scheme_from_xml, scheme_to_dot,
    scheme_to_xml, write_dot, write_scheme,
};
