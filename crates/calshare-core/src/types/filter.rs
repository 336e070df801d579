//! Search filter nodes and the query they assemble into.

use serde::{Deserialize, Serialize};

/// A property/parameter pair targeted by a `param-filter`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamRef {
    /// iCalendar/vCard property name, e.g. `ATTENDEE`.
    pub property: String,
    /// Parameter name on that property, e.g. `CN`.
    pub parameter: String,
}

/// One leaf of a structured search query.
///
/// Required fields are validated when the node is parsed; a node that
/// exists is always usable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterNode {
    /// Restrict to a component name (`VEVENT`, `VTODO`, ...).
    CompFilter {
        /// Component name.
        name: String,
    },
    /// Search inside a property (`SUMMARY`, `LOCATION`, ...).
    PropFilter {
        /// Property name.
        name: String,
    },
    /// Search inside a property parameter.
    ParamFilter {
        /// Property name.
        property: String,
        /// Parameter name.
        parameter: String,
    },
    /// The text to look for.
    SearchTermFilter {
        /// Search term.
        term: String,
    },
    /// Number of leading results to skip.
    OffsetFilter {
        /// Offset value.
        value: u64,
    },
    /// Maximum number of results.
    LimitFilter {
        /// Limit value.
        value: u64,
    },
}

impl FilterNode {
    /// Short name of the filter kind, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CompFilter { .. } => "comp-filter",
            Self::PropFilter { .. } => "prop-filter",
            Self::ParamFilter { .. } => "param-filter",
            Self::SearchTermFilter { .. } => "search-term",
            Self::OffsetFilter { .. } => "offset",
            Self::LimitFilter { .. } => "limit",
        }
    }
}

/// A complete calendar search, as handed to the query engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Component names to search in.
    pub comps: Vec<String>,
    /// Property names to search in.
    pub props: Vec<String>,
    /// Property parameters to search in.
    pub params: Vec<ParamRef>,
    /// The search term.
    pub search_term: Option<String>,
    /// Maximum number of results.
    pub limit: Option<u64>,
    /// Number of results to skip.
    pub offset: Option<u64>,
}

impl SearchQuery {
    /// Fold one filter node into the query. Scalar filters overwrite earlier
    /// values.
    pub fn push(&mut self, node: FilterNode) {
        match node {
            FilterNode::CompFilter { name } => self.comps.push(name),
            FilterNode::PropFilter { name } => self.props.push(name),
            FilterNode::ParamFilter {
                property,
                parameter,
            } => self.params.push(ParamRef {
                property,
                parameter,
            }),
            FilterNode::SearchTermFilter { term } => self.search_term = Some(term),
            FilterNode::OffsetFilter { value } => self.offset = Some(value),
            FilterNode::LimitFilter { value } => self.limit = Some(value),
        }
    }
}

impl FromIterator<FilterNode> for SearchQuery {
    fn from_iter<I: IntoIterator<Item = FilterNode>>(iter: I) -> Self {
        let mut query = Self::default();
        for node in iter {
            query.push(node);
        }
        query
    }
}
