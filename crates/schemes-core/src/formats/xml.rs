//! # XML Scheme Documents
//!
//! Reads and writes the scheme document:
//!
//! ```text
//! <?xml version="1.0"?>
//! <scheme>
//!   <nodes>
//!     <node>
//!       <name>Authors</name>
//!       <description>
//!         ...
//!       </description>
//!       <parents>
//!         <parent>Literature</parent>
//!       </parents>
//!     </node>
//!   </nodes>
//! </scheme>
//! ```
//!
//! Parents are stored by name and resolved against the components read so
//! far, so every parent has to precede its children. Sort the scheme with
//! [`Scheme::halfsort_hierarchically`] before saving when that is not
//! already the case.

use crate::primitives::{
    ERR_EXPECTED_END_DOCUMENT, ERR_EXPECTED_END_ELEMENT, ERR_EXPECTED_START_DOCUMENT,
    ERR_EXPECTED_START_ELEMENT, ERR_UNEXPECTED_ELEMENT, INDENT, LINE_BREAK, XML_DESCRIPTION,
    XML_NAME, XML_NODE, XML_NODES, XML_PARENT, XML_PARENTS, XML_SCHEME, XML_VERSION,
    err_parent_missing, err_tag_expected,
};
use crate::{ComponentId, Graph, Information, Scheme, SchemeError, SearchOrder};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

// =============================================================================
// WRITER
// =============================================================================

/// Writes one element per line, indenting nested elements.
struct IndentedXmlWriter<W: Write> {
    writer: Writer<W>,
    indentation: String,
}

impl<W: Write> IndentedXmlWriter<W> {
    fn new(sink: W) -> Self {
        Self {
            writer: Writer::new(sink),
            indentation: String::new(),
        }
    }

    fn raw(&mut self, text: &str) -> Result<(), SchemeError> {
        if !text.is_empty() {
            self.writer
                .write_event(Event::Text(BytesText::from_escaped(text)))?;
        }
        Ok(())
    }

    fn indent(&mut self) -> Result<(), SchemeError> {
        if !self.indentation.is_empty() {
            self.writer
                .write_event(Event::Text(BytesText::from_escaped(self.indentation.as_str())))?;
        }
        Ok(())
    }

    fn prolog(&mut self) -> Result<(), SchemeError> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new(XML_VERSION, None, None)))?;
        self.raw(LINE_BREAK)
    }

    fn start_element(&mut self, tag: &str) -> Result<(), SchemeError> {
        self.indent()?;
        self.writer.write_event(Event::Start(BytesStart::new(tag)))?;
        self.indentation.push_str(INDENT);
        self.raw(LINE_BREAK)
    }

    fn end_element(&mut self, tag: &str) -> Result<(), SchemeError> {
        let len = self.indentation.len().saturating_sub(INDENT.len());
        self.indentation.truncate(len);
        self.indent()?;
        self.writer.write_event(Event::End(BytesEnd::new(tag)))?;
        self.raw(LINE_BREAK)
    }

    /// `<tag>text</tag>` on a single line.
    fn full_element(&mut self, tag: &str, text: &str) -> Result<(), SchemeError> {
        self.indent()?;
        self.writer.write_event(Event::Start(BytesStart::new(tag)))?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.writer.write_event(Event::End(BytesEnd::new(tag)))?;
        self.raw(LINE_BREAK)
    }

    /// Escaped text on its own indented line.
    fn text_line(&mut self, text: &str) -> Result<(), SchemeError> {
        self.indent()?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.raw(LINE_BREAK)
    }

    fn finish(self) -> Result<W, SchemeError> {
        let mut sink = self.writer.into_inner();
        sink.flush()?;
        Ok(sink)
    }
}

/// Write `scheme` as an XML document, members in scheme order.
///
/// Absent names and descriptions are written as empty text.
pub fn write_scheme<W: Write>(graph: &Graph, scheme: &Scheme, sink: W) -> Result<(), SchemeError> {
    let mut xml = IndentedXmlWriter::new(sink);
    xml.prolog()?;
    xml.start_element(XML_SCHEME)?;
    xml.start_element(XML_NODES)?;

    for id in scheme.iter() {
        let Some(component) = graph.component(id) else {
            continue;
        };
        xml.start_element(XML_NODE)?;
        xml.full_element(XML_NAME, component.name().unwrap_or_default())?;
        xml.start_element(XML_DESCRIPTION)?;
        xml.text_line(component.description().unwrap_or_default())?;
        xml.end_element(XML_DESCRIPTION)?;
        xml.start_element(XML_PARENTS)?;
        for &parent in component.parents() {
            xml.full_element(XML_PARENT, graph.name(parent).unwrap_or_default())?;
        }
        xml.end_element(XML_PARENTS)?;
        xml.end_element(XML_NODE)?;
    }

    xml.end_element(XML_NODES)?;
    xml.end_element(XML_SCHEME)?;
    xml.finish()?;

    tracing::debug!(members = scheme.len(), "scheme written as XML");
    Ok(())
}

/// Render `scheme` as an XML document string.
pub fn scheme_to_xml(graph: &Graph, scheme: &Scheme) -> Result<String, SchemeError> {
    let mut buffer = Vec::new();
    write_scheme(graph, scheme, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| SchemeError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Write `scheme` to the file at `path`, replacing it.
pub fn save_scheme(graph: &Graph, scheme: &Scheme, path: impl AsRef<Path>) -> Result<(), SchemeError> {
    let file = File::create(path)?;
    write_scheme(graph, scheme, BufWriter::new(file))
}

// =============================================================================
// READER
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Tag {
    Start(String),
    End(String),
    Eof,
}

/// Pull cursor over start and end tags.
struct XmlCursor<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
}

impl<R: BufRead> XmlCursor<R> {
    fn new(source: R) -> Self {
        let mut reader = Reader::from_reader(source);
        reader.config_mut().expand_empty_elements = true;
        Self {
            reader,
            buf: Vec::new(),
        }
    }

    /// Next tag, skipping whitespace, comments, processing instructions and
    /// the prolog.
    fn next_tag(&mut self) -> Result<Tag, SchemeError> {
        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf)? {
                Event::Start(e) => return Ok(Tag::Start(utf8(e.local_name().as_ref()))),
                Event::End(e) => return Ok(Tag::End(utf8(e.local_name().as_ref()))),
                Event::Eof => return Ok(Tag::Eof),
                Event::Text(t) if !t.iter().all(u8::is_ascii_whitespace) => {
                    return Err(malformed(ERR_UNEXPECTED_ELEMENT));
                }
                Event::CData(_) => return Err(malformed(ERR_UNEXPECTED_ELEMENT)),
                _ => {}
            }
        }
    }

    /// Text content up to the end tag of the element just entered.
    fn element_text(&mut self) -> Result<String, SchemeError> {
        let mut text = String::new();
        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf)? {
                Event::Text(t) => text.push_str(&t.unescape()?),
                Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c)),
                Event::End(_) => return Ok(text),
                Event::Start(_) => return Err(malformed(ERR_EXPECTED_END_ELEMENT)),
                Event::Eof => return Err(malformed(ERR_EXPECTED_END_DOCUMENT)),
                _ => {}
            }
        }
    }
}

fn utf8(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn malformed(message: impl Into<String>) -> SchemeError {
    SchemeError::Malformed(message.into())
}

fn expect_start(tag: &Tag, name: &str) -> Result<(), SchemeError> {
    match tag {
        Tag::Start(found) if found == name => Ok(()),
        Tag::Start(_) => Err(malformed(err_tag_expected(name))),
        Tag::End(_) => Err(malformed(ERR_EXPECTED_START_ELEMENT)),
        Tag::Eof => Err(malformed(ERR_EXPECTED_END_DOCUMENT)),
    }
}

fn expect_end(tag: &Tag, name: &str) -> Result<(), SchemeError> {
    match tag {
        Tag::End(found) if found == name => Ok(()),
        Tag::End(_) => Err(malformed(err_tag_expected(name))),
        Tag::Start(_) => Err(malformed(ERR_EXPECTED_END_ELEMENT)),
        Tag::Eof => Err(malformed(ERR_EXPECTED_END_DOCUMENT)),
    }
}

/// Read a scheme document and append its components to `scheme`,
/// allocating them in `graph`.
///
/// Parent names are resolved against `scheme` as read so far (first match
/// in scheme order); an unknown name fails with `SchemeError::Dependency`.
/// On failure the scheme keeps every component read before the error.
/// The root/leaf caches are rebuilt in both cases.
pub fn read_scheme<R: BufRead>(
    graph: &mut Graph,
    scheme: &mut Scheme,
    source: R,
) -> Result<(), SchemeError> {
    let before = scheme.len();
    let mut cursor = XmlCursor::new(source);
    let result = read_document(&mut cursor, graph, scheme);
    scheme.validate_roots_and_leaves(graph);

    match &result {
        Ok(()) => tracing::debug!(read = scheme.len().saturating_sub(before), "scheme read from XML"),
        Err(SchemeError::Dependency(message)) => {
            tracing::warn!(read = scheme.len().saturating_sub(before), %message, "scheme load stopped");
        }
        Err(e) => tracing::debug!(error = %e, "scheme load failed"),
    }
    result
}

fn read_document<R: BufRead>(
    cursor: &mut XmlCursor<R>,
    graph: &mut Graph,
    scheme: &mut Scheme,
) -> Result<(), SchemeError> {
    let first = cursor.next_tag()?;
    if first == Tag::Eof {
        return Err(malformed(ERR_EXPECTED_START_DOCUMENT));
    }
    expect_start(&first, XML_SCHEME)?;
    expect_start(&cursor.next_tag()?, XML_NODES)?;

    let mut tag = cursor.next_tag()?;
    while matches!(&tag, Tag::Start(name) if name == XML_NODE) {
        read_node(cursor, graph, scheme)?;
        tag = cursor.next_tag()?;
    }
    if let Tag::Start(_) = tag {
        return Err(malformed(err_tag_expected(XML_NODE)));
    }
    expect_end(&tag, XML_NODES)?;
    expect_end(&cursor.next_tag()?, XML_SCHEME)?;

    match cursor.next_tag()? {
        Tag::Eof => Ok(()),
        _ => Err(malformed(ERR_EXPECTED_END_DOCUMENT)),
    }
}

fn read_node<R: BufRead>(
    cursor: &mut XmlCursor<R>,
    graph: &mut Graph,
    scheme: &mut Scheme,
) -> Result<(), SchemeError> {
    expect_start(&cursor.next_tag()?, XML_NAME)?;
    let name = cursor.element_text()?;
    expect_start(&cursor.next_tag()?, XML_DESCRIPTION)?;
    let description = cursor.element_text()?.trim().to_string();
    expect_start(&cursor.next_tag()?, XML_PARENTS)?;

    let mut parent_names: Vec<String> = Vec::new();
    loop {
        match cursor.next_tag()? {
            Tag::Start(tag) if tag == XML_PARENT => {
                let parent = cursor.element_text()?;
                if !parent_names.contains(&parent) {
                    parent_names.push(parent);
                }
            }
            Tag::End(tag) if tag == XML_PARENTS => break,
            Tag::Start(_) => return Err(malformed(err_tag_expected(XML_PARENT))),
            Tag::End(_) => return Err(malformed(err_tag_expected(XML_PARENTS))),
            Tag::Eof => return Err(malformed(ERR_EXPECTED_END_DOCUMENT)),
        }
    }

    let parents = parent_names
        .iter()
        .map(|parent| {
            scheme
                .get_by_string(graph, parent, SearchOrder::Fifo)
                .first()
                .copied()
                .ok_or_else(|| SchemeError::Dependency(err_parent_missing(parent)))
        })
        .collect::<Result<Vec<ComponentId>, _>>()?;
    expect_end(&cursor.next_tag()?, XML_NODE)?;

    let id = graph.insert_component(Information::new(name, description));
    for parent in parents {
        graph.add_parent(id, parent);
    }
    graph.force_family_together(id);
    scheme.add(graph, id);
    Ok(())
}

/// Read a scheme document from a string.
pub fn scheme_from_xml(graph: &mut Graph, scheme: &mut Scheme, xml: &str) -> Result<(), SchemeError> {
    read_scheme(graph, scheme, xml.as_bytes())
}

/// Read the scheme document at `path`.
pub fn load_scheme(graph: &mut Graph, scheme: &mut Scheme, path: impl AsRef<Path>) -> Result<(), SchemeError> {
    let file = File::open(path)?;
    read_scheme(graph, scheme, BufReader::new(file))
}

impl Scheme {
    /// Save this scheme as an XML document at `path`.
    pub fn save(&self, graph: &Graph, path: impl AsRef<Path>) -> Result<(), SchemeError> {
        save_scheme(graph, self, path)
    }

    /// Append the components of the XML document at `path`.
    pub fn load(&mut self, graph: &mut Graph, path: impl AsRef<Path>) -> Result<(), SchemeError> {
        load_scheme(graph, self, path)
    }
}

// =============================================================================
// TESTS
// =============================================================================
