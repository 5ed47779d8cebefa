//! # Formats Module
//!
//! Document grammars of a scheme.
//!
//! - `xml` - the persistent scheme document (read and write)
//! - `dot` - Graphviz export (write only)
//!
//! Codecs borrow their reader or writer for exactly one call and flush
//! before returning.

pub mod dot;
pub mod xml;

pub use dot::{export_dot, scheme_to_dot, write_dot};
pub use xml::{load_scheme, read_scheme, save_scheme, scheme_from_xml, scheme_to_xml, write_scheme};
