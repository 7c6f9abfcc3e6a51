//! Path-addressed project tree for one owner
//!
//! Files and folders live in a flat [`Project`] and are addressed by path.
//! [`Workspace`] applies tree operations and writes the project back through
//! the Cache; [`TreeNode`] is the nested view built for display.

pub mod kind;
pub mod model;
pub mod path;
pub mod render;
pub mod role;
pub mod session;
mod tree;

pub use kind::FileKind;
pub use model::{File, Folder, Project};
pub use render::TreeNode;
pub use role::{Capabilities, Owner, Role};
pub use session::OpenSession;
pub use tree::Workspace;
