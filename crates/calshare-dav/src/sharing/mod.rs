//! Share document handling: sniffing, parsing, and the POST plugin.

pub mod doctype;
pub mod document;
pub mod plugin;

pub use doctype::{DocumentType, sniff_document};
pub use document::ShareMutationParser;
pub use plugin::{SHARING_MARKER_VALUE, SharingPlugin, SharingState};
