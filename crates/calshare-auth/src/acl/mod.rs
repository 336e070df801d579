//! Access control: effective ACEs from ownership + share grants, and
//! privilege checks over them.

pub mod checker;
pub mod resolver;

pub use checker::{AclChecker, has_privilege};
pub use resolver::AclResolver;
