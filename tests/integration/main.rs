//! End-to-end tests driving the axum router in-process.

mod acl_test;
mod auth_test;
mod helpers;
mod search_test;
mod sharing_test;
