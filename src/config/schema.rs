//! Configuration schema for Classroom
//!
//! Configuration is stored at `~/.config/classroom/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::workspace::Role;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Backing store settings
    pub store: StoreConfig,

    /// Code runner settings
    pub sandbox: SandboxConfig,

    /// Workspace defaults
    pub workspace: WorkspaceConfig,
}

impl Config {
    /// Reject values that parse but cannot be used
    pub fn validate(&self) -> Result<(), String> {
        if !matches!(self.general.log_format.as_str(), "text" | "json") {
            return Err(format!(
                "general.log_format must be \"text\" or \"json\", got {:?}",
                self.general.log_format
            ));
        }
        if self.sandbox.interpreter.trim().is_empty() {
            return Err("sandbox.interpreter must not be empty".to_string());
        }
        if self.workspace.owner.trim().is_empty() {
            return Err("workspace.owner must not be empty".to_string());
        }
        Ok(())
    }
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Backing store configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding one JSON file per collection
    /// (defaults to `<state dir>/store`)
    pub dir: Option<PathBuf>,

    /// Directory holding flat legacy arrays, imported once on first run
    /// (defaults to `<state dir>/legacy`)
    pub legacy_dir: Option<PathBuf>,

    /// Keep everything in memory; nothing survives the process
    pub in_memory: bool,
}

/// Code runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Interpreter executable that receives the program on stdin
    pub interpreter: String,

    /// Arguments passed to the interpreter
    pub args: Vec<String>,

    /// Clear the output log before each run
    pub clear_log_on_run: bool,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            interpreter: "node".to_string(),
            args: vec!["-".to_string()],
            clear_log_on_run: true,
        }
    }
}

/// Workspace defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Owner id whose project the CLI opens
    pub owner: String,

    /// Role of that owner
    pub role: Role,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            owner: "teacher".to_string(),
            role: Role::Teacher,
        }
    }
}
