//! Classroom - coding workspace core
//!
//! A write-through Cache over an asynchronous store, a path-addressed
//! project tree per owner, and a sandbox that runs project files in an
//! isolated interpreter.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod sandbox;
pub mod store;
pub mod ui;
pub mod workspace;

pub use cache::Cache;
pub use error::{ClassroomError, ClassroomResult};
pub use sandbox::Sandbox;
pub use workspace::Workspace;
