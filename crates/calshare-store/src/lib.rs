//! # calshare-store
//!
//! In-memory implementations of the calshare collaborator traits:
//! a principal directory, a calendar store with share grants, and a
//! calendar object search engine. All state lives in `DashMap`s and is lost
//! on restart.

pub mod backend;
pub mod calendars;
pub mod directory;
pub mod objects;

pub use backend::MemoryBackend;
pub use calendars::{MemoryStore, StoredCalendar};
pub use directory::{Account, Directory};
pub use objects::{CalendarObject, MemoryQueryEngine, ObjectProperty};
