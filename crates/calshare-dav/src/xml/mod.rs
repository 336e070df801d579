//! XML reading helpers.

pub mod cursor;

pub use cursor::{XmlCursor, XmlElement, XmlError};
