//! # Primitives
//!
//! Hardcoded constants of the scheme document grammars.
//!
//! The XML scheme document and the DOT export are compatibility-critical:
//! tag names, indentation, line endings and error texts are fixed here and
//! shared by the writers, the readers and the tests.

// =============================================================================
// EDGE KIND CODES
// =============================================================================

/// Integer code of the parent edge list (legacy iterator selector).
pub const EDGE_CODE_PARENT: u8 = 1;

/// Integer code of the child edge list (legacy iterator selector).
pub const EDGE_CODE_CHILD: u8 = 2;

// =============================================================================
// XML SCHEME DOCUMENT
// =============================================================================

/// Root element of a scheme document.
pub const XML_SCHEME: &str = "scheme";

/// Container of all component elements.
pub const XML_NODES: &str = "nodes";

/// One component.
pub const XML_NODE: &str = "node";

/// Component name.
pub const XML_NAME: &str = "name";

/// Component description.
pub const XML_DESCRIPTION: &str = "description";

/// Container of the parent references of a component.
pub const XML_PARENTS: &str = "parents";

/// One parent reference, by name.
pub const XML_PARENT: &str = "parent";

/// Version written into the document prolog.
pub const XML_VERSION: &str = "1.0";

/// Indentation added per nesting level.
pub const INDENT: &str = "  ";

/// Line terminator of both document formats.
pub const LINE_BREAK: &str = "\r\n";

// =============================================================================
// XML ERROR TEXTS
// =============================================================================

/// Reported when no document start could be read.
pub const ERR_EXPECTED_START_DOCUMENT: &str = "Unexpected XML start!";

/// Reported when input ends early or continues after the root element.
pub const ERR_EXPECTED_END_DOCUMENT: &str = "Unexpected XML end!";

/// Prefix of every element-level error.
pub const ERR_UNEXPECTED_ELEMENT: &str = "Unexpected XML element!";

/// Reported when a start tag was required.
pub const ERR_EXPECTED_START_ELEMENT: &str = "Unexpected XML element! Start element expected";

/// Reported when an end tag was required.
pub const ERR_EXPECTED_END_ELEMENT: &str = "Unexpected XML element! End element expected";

/// Error text for a tag with the wrong local name.
#[must_use]
pub fn err_tag_expected(tag: &str) -> String {
    format!("{} {} tag expected!", ERR_UNEXPECTED_ELEMENT, tag)
}

/// Error text for a parent reference that cannot be resolved.
#[must_use]
pub fn err_parent_missing(name: &str) -> String {
    format!("Parent {} missing!", name)
}

// =============================================================================
// DOT EXPORT
// =============================================================================

/// Opening line of the exported digraph.
pub const DOT_START: &str = "digraph G {";

/// Closing brace of the exported digraph (no trailing line break).
pub const DOT_END: &str = "}";

/// Opens the child list of an edge statement.
pub const DOT_CHILDREN_START: &str = " -> { ";

/// Separates two children inside an edge statement.
pub const DOT_CHILDREN_SEP: &str = "; ";

/// Closes the child list of an edge statement.
pub const DOT_CHILDREN_END: &str = " }";

// =============================================================================
// TEXT TREE RENDERING
// =============================================================================

/// Marker of an entry with further siblings below it.
pub const TREE_BRANCH: char = '├';

/// Marker of the last entry on its level.
pub const TREE_LAST: char = '└';

/// Appended to an entry whose subtree is drawn elsewhere.
pub const TREE_CUTOFF: &str = " → ...";
