//! Streaming, namespace-aware cursor over an XML document.
//!
//! The cursor hands out one [`XmlElement`] per start tag. After receiving a
//! non-empty element the caller must consume its content with exactly one
//! of [`XmlCursor::next_child`] (until it yields `None`),
//! [`XmlCursor::read_text`], or [`XmlCursor::skip`].

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;

use crate::namespace::DavNamespaces;

/// Errors raised while walking a document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum XmlError {
    /// The document is not well-formed.
    #[error("XML syntax error: {0}")]
    Syntax(String),
    /// The document ended inside an open element.
    #[error("Unexpected end of document")]
    UnexpectedEof,
    /// The document has no root element.
    #[error("Document has no root element")]
    NoRoot,
    /// A text-only element holds child elements.
    #[error("Element {0} holds child elements")]
    StructuredContent(String),
    /// Content after the root element.
    #[error("Trailing content after the root element")]
    TrailingContent,
}

/// One start (or empty) tag with its resolved name and attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    /// Resolved namespace URI, if the element is in a namespace.
    pub namespace: Option<String>,
    /// Local name.
    pub local_name: String,
    /// Unprefixed attributes, unescaped, in document order.
    pub attributes: Vec<(String, String)>,
    /// Self-closing element (`<x/>`).
    pub is_empty: bool,
}

impl XmlElement {
    /// Whether the element has the given namespace and local name.
    pub fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.namespace.as_deref() == Some(namespace) && self.local_name == local_name
    }

    /// Value of an attribute by local name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Clark notation of the element name.
    pub fn clark(&self) -> String {
        DavNamespaces::clark(self.namespace.as_deref().unwrap_or_default(), &self.local_name)
    }
}

/// Cursor over a borrowed document.
pub struct XmlCursor<'a> {
    reader: NsReader<&'a [u8]>,
    depth: usize,
}

impl<'a> XmlCursor<'a> {
    /// Creates a cursor at the start of `document`.
    pub fn new(document: &'a str) -> Self {
        let mut reader = NsReader::from_str(document);
        reader.trim_text(true);
        Self { reader, depth: 0 }
    }

    /// Reads the root element.
    pub fn root(&mut self) -> Result<XmlElement, XmlError> {
        self.next_child()?.ok_or(XmlError::NoRoot)
    }

    /// Next child element of the current parent, or `None` once the parent's
    /// end tag (or the end of the document at top level) is reached.
    ///
    /// Text between children is ignored.
    pub fn next_child(&mut self) -> Result<Option<XmlElement>, XmlError> {
        loop {
            let (resolved, event) = self
                .reader
                .read_resolved_event()
                .map_err(|e| XmlError::Syntax(e.to_string()))?;

            match event {
                Event::Start(start) => {
                    let element = element_from(resolved, &start, false)?;
                    self.depth += 1;
                    return Ok(Some(element));
                }
                Event::Empty(start) => return element_from(resolved, &start, true).map(Some),
                Event::End(_) => {
                    if self.depth == 0 {
                        return Err(XmlError::Syntax("unbalanced end tag".to_string()));
                    }
                    self.depth -= 1;
                    return Ok(None);
                }
                Event::Eof if self.depth == 0 => return Ok(None),
                Event::Eof => return Err(XmlError::UnexpectedEof),
                _ => continue,
            }
        }
    }

    /// Text content of `element`, consuming it up to its end tag.
    ///
    /// Fails with [`XmlError::StructuredContent`] when the element holds
    /// child elements.
    pub fn read_text(&mut self, element: &XmlElement) -> Result<String, XmlError> {
        if element.is_empty {
            return Ok(String::new());
        }

        let mut text = String::new();
        loop {
            let event = self
                .reader
                .read_event()
                .map_err(|e| XmlError::Syntax(e.to_string()))?;

            match event {
                Event::Text(t) => {
                    let unescaped = t.unescape().map_err(|e| XmlError::Syntax(e.to_string()))?;
                    text.push_str(&unescaped);
                }
                Event::CData(c) => {
                    let raw = c.into_inner();
                    text.push_str(&String::from_utf8_lossy(&raw));
                }
                Event::Start(_) | Event::Empty(_) => {
                    return Err(XmlError::StructuredContent(element.clark()));
                }
                Event::End(_) => {
                    self.depth -= 1;
                    return Ok(text);
                }
                Event::Eof => return Err(XmlError::UnexpectedEof),
                _ => {}
            }
        }
    }

    /// Consumes `element` and everything inside it.
    pub fn skip(&mut self, element: &XmlElement) -> Result<(), XmlError> {
        if element.is_empty {
            return Ok(());
        }

        let mut nested = 0usize;
        loop {
            let event = self
                .reader
                .read_event()
                .map_err(|e| XmlError::Syntax(e.to_string()))?;

            match event {
                Event::Start(_) => nested += 1,
                Event::End(_) if nested == 0 => {
                    self.depth -= 1;
                    return Ok(());
                }
                Event::End(_) => nested -= 1,
                Event::Eof => return Err(XmlError::UnexpectedEof),
                _ => {}
            }
        }
    }

    /// Verifies nothing but whitespace, comments, or processing
    /// instructions follows the root element.
    pub fn finish(mut self) -> Result<(), XmlError> {
        loop {
            let event = self
                .reader
                .read_event()
                .map_err(|e| XmlError::Syntax(e.to_string()))?;
            match event {
                Event::Eof => return Ok(()),
                Event::Comment(_) | Event::PI(_) => {}
                Event::Text(t) if t.iter().all(u8::is_ascii_whitespace) => {}
                _ => return Err(XmlError::TrailingContent),
            }
        }
    }
}

fn element_from(
    resolved: ResolveResult<'_>,
    start: &BytesStart<'_>,
    is_empty: bool,
) -> Result<XmlElement, XmlError> {
    let namespace = match resolved {
        ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.as_ref()).into_owned()),
        ResolveResult::Unbound => None,
        ResolveResult::Unknown(prefix) => {
            return Err(XmlError::Syntax(format!(
                "unknown namespace prefix '{}'",
                String::from_utf8_lossy(&prefix)
            )));
        }
    };

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| XmlError::Syntax(e.to_string()))?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| XmlError::Syntax(e.to_string()))?
            .into_owned();
        attributes.push((key, value));
    }

    Ok(XmlElement {
        namespace,
        local_name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
        attributes,
        is_empty,
    })
}
