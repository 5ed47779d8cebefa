//! # Graphviz Export
//!
//! One statement per member, in scheme order:
//!
//! ```text
//! digraph G {
//!   "Literature" -> { "Authors"; "Light Novels" }
//!   "DN (LN)"
//! }
//! ```
//!
//! Lines end with CRLF; the closing brace has no line break. Export only.

use crate::primitives::{
    DOT_CHILDREN_END, DOT_CHILDREN_SEP, DOT_CHILDREN_START, DOT_END, DOT_START, INDENT, LINE_BREAK,
};
use crate::{Graph, Scheme, SchemeError};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Quote a name for a DOT identifier; absent names become `""`.
fn quoted(name: Option<&str>) -> String {
    let name = name.unwrap_or_default();
    let mut out = String::with_capacity(name.len() + 2);
    out.push('"');
    for c in name.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Write `scheme` as a Graphviz digraph.
pub fn write_dot<W: Write>(graph: &Graph, scheme: &Scheme, mut sink: W) -> Result<(), SchemeError> {
    sink.write_all(DOT_START.as_bytes())?;
    sink.write_all(LINE_BREAK.as_bytes())?;

    for id in scheme.iter() {
        let mut line = String::from(INDENT);
        line.push_str(&quoted(graph.name(id)));

        let children = graph.children(id);
        if !children.is_empty() {
            let names: Vec<String> = children.iter().map(|&c| quoted(graph.name(c))).collect();
            line.push_str(DOT_CHILDREN_START);
            line.push_str(&names.join(DOT_CHILDREN_SEP));
            line.push_str(DOT_CHILDREN_END);
        }
        line.push_str(LINE_BREAK);
        sink.write_all(line.as_bytes())?;
    }

    sink.write_all(DOT_END.as_bytes())?;
    sink.flush()?;
    tracing::debug!(members = scheme.len(), "scheme exported as DOT");
    Ok(())
}

/// Render `scheme` as a Graphviz digraph string.
pub fn scheme_to_dot(graph: &Graph, scheme: &Scheme) -> Result<String, SchemeError> {
    let mut buffer = Vec::new();
    write_dot(graph, scheme, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| SchemeError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Write `scheme` as a Graphviz digraph to the file at `path`.
pub fn export_dot(graph: &Graph, scheme: &Scheme, path: impl AsRef<Path>) -> Result<(), SchemeError> {
    let file = File::create(path)?;
    write_dot(graph, scheme, BufWriter::new(file))
}
