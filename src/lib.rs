//! orgtree: organizational hierarchy engine
//!
//! Turns flat parent-pointer records into a forest and tracks which nodes
//! are expanded while the hierarchy is browsed.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
