//! Calendar search filter grammar.

pub mod parser;
pub mod report;

pub use parser::{
    FilterKind, parse_comp_filter, parse_filter, parse_limit, parse_offset, parse_param_filter,
    parse_prop_filter, parse_search_term,
};
pub use report::CalendarSearchReport;
