//! One parse function per search filter element.
//!
//! Every function takes the cursor positioned just after the element's
//! start tag, consumes the element completely, and either returns a fully
//! validated [`FilterNode`] or a [`DavError::MalformedFilter`] naming the
//! element in clark notation.

use calshare_core::types::FilterNode;

use crate::error::DavError;
use crate::namespace::DavNamespaces;
use crate::xml::{XmlCursor, XmlElement, XmlError};

/// The filter elements of the search namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// `comp-filter`
    Comp,
    /// `prop-filter`
    Prop,
    /// `param-filter`
    Param,
    /// `search-term`
    SearchTerm,
    /// `offset`
    Offset,
    /// `limit`
    Limit,
}

impl FilterKind {
    const ALL: [Self; 6] = [
        Self::Comp,
        Self::Prop,
        Self::Param,
        Self::SearchTerm,
        Self::Offset,
        Self::Limit,
    ];

    /// Local element name.
    pub fn local_name(self) -> &'static str {
        match self {
            Self::Comp => "comp-filter",
            Self::Prop => "prop-filter",
            Self::Param => "param-filter",
            Self::SearchTerm => "search-term",
            Self::Offset => "offset",
            Self::Limit => "limit",
        }
    }

    /// Classify an element; `None` for anything outside the filter grammar.
    pub fn of(element: &XmlElement, namespaces: &DavNamespaces) -> Option<Self> {
        if element.namespace.as_deref() != Some(namespaces.search.as_str()) {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|kind| kind.local_name() == element.local_name)
    }
}

/// Parse any filter element; unknown elements are skipped and yield `None`.
pub fn parse_filter(
    cursor: &mut XmlCursor<'_>,
    element: &XmlElement,
    namespaces: &DavNamespaces,
) -> Result<Option<FilterNode>, DavError> {
    let Some(kind) = FilterKind::of(element, namespaces) else {
        cursor.skip(element).map_err(|e| malformed(element, e))?;
        return Ok(None);
    };

    let node = match kind {
        FilterKind::Comp => parse_comp_filter(cursor, element)?,
        FilterKind::Prop => parse_prop_filter(cursor, element)?,
        FilterKind::Param => parse_param_filter(cursor, element)?,
        FilterKind::SearchTerm => parse_search_term(cursor, element)?,
        FilterKind::Offset => parse_offset(cursor, element)?,
        FilterKind::Limit => parse_limit(cursor, element)?,
    };

    tracing::trace!(filter = node.kind(), "Parsed search filter");
    Ok(Some(node))
}

/// `<comp-filter name="VEVENT"/>`
pub fn parse_comp_filter(
    cursor: &mut XmlCursor<'_>,
    element: &XmlElement,
) -> Result<FilterNode, DavError> {
    let name = required_attribute(element, "name")?;
    cursor.skip(element).map_err(|e| malformed(element, e))?;
    Ok(FilterNode::CompFilter { name })
}

/// `<prop-filter name="SUMMARY"/>`
pub fn parse_prop_filter(
    cursor: &mut XmlCursor<'_>,
    element: &XmlElement,
) -> Result<FilterNode, DavError> {
    let name = required_attribute(element, "name")?;
    cursor.skip(element).map_err(|e| malformed(element, e))?;
    Ok(FilterNode::PropFilter { name })
}

/// `<param-filter property="ATTENDEE" name="CN"/>`
pub fn parse_param_filter(
    cursor: &mut XmlCursor<'_>,
    element: &XmlElement,
) -> Result<FilterNode, DavError> {
    let property = required_attribute(element, "property")?;
    let parameter = required_attribute(element, "name")?;
    cursor.skip(element).map_err(|e| malformed(element, e))?;
    Ok(FilterNode::ParamFilter {
        property,
        parameter,
    })
}

/// `<search-term>text</search-term>`
pub fn parse_search_term(
    cursor: &mut XmlCursor<'_>,
    element: &XmlElement,
) -> Result<FilterNode, DavError> {
    let term = cursor.read_text(element).map_err(|e| match e {
        XmlError::StructuredContent(_) => DavError::MalformedFilter(format!(
            "The {} element must hold text only",
            element.clark()
        )),
        other => malformed(element, other),
    })?;
    Ok(FilterNode::SearchTermFilter { term })
}

/// `<offset>10</offset>`
pub fn parse_offset(
    cursor: &mut XmlCursor<'_>,
    element: &XmlElement,
) -> Result<FilterNode, DavError> {
    let value = read_unsigned(cursor, element)?;
    Ok(FilterNode::OffsetFilter { value })
}

/// `<limit>10</limit>`
pub fn parse_limit(
    cursor: &mut XmlCursor<'_>,
    element: &XmlElement,
) -> Result<FilterNode, DavError> {
    let value = read_unsigned(cursor, element)?;
    Ok(FilterNode::LimitFilter { value })
}

fn required_attribute(element: &XmlElement, name: &str) -> Result<String, DavError> {
    match element.attribute(name).map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(DavError::MalformedFilter(format!(
            "The {} element requires a valid {name} attribute",
            element.clark()
        ))),
    }
}

fn read_unsigned(cursor: &mut XmlCursor<'_>, element: &XmlElement) -> Result<u64, DavError> {
    let invalid = || {
        DavError::MalformedFilter(format!(
            "The {} element requires a non-negative integer value",
            element.clark()
        ))
    };

    let text = cursor.read_text(element).map_err(|_| invalid())?;
    let digits = text.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    digits.parse().map_err(|_| invalid())
}

fn malformed(element: &XmlElement, error: XmlError) -> DavError {
    DavError::MalformedFilter(format!("The {} element is malformed: {error}", element.clark()))
}
