//! CLI command implementations

pub mod config;
pub mod db;
pub mod file;
pub mod folder;
pub mod project;
pub mod run;
pub mod tab;
pub mod tree;

pub use config::execute as config;
pub use db::execute as db;
pub use file::execute as file;
pub use folder::execute as folder;
pub use project::execute as project;
pub use run::execute as run;
pub use tab::execute as tab;
pub use tree::execute as tree;
