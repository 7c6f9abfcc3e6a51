//! UI module for consistent CLI output
//!
//! Uses `cliclack` for interactive prompts with automatic fallback to plain
//! output in CI/non-interactive environments.
//!
//! # Example
//!
//! ```rust,ignore
//! use classroom::ui::{self, UiContext};
//!
//! let ctx = UiContext::detect().with_auto_yes(args.yes);
//!
//! ui::intro(&ctx, "Project");
//! ui::step_ok(&ctx, "Created /src/app.js");
//!
//! if ui::confirm(&ctx, "Remove every file?", false).await? {
//!     // ...
//! }
//! ```

mod context;
mod log;
mod output;
mod prompts;
mod theme;

pub use context::UiContext;
pub use log::TerminalLog;
pub use output::{
    intro, key_value, key_value_status, outro_success, remark, section, step_info, step_ok,
    step_ok_detail, step_warn, step_warn_hint,
};
pub use prompts::confirm;
pub use theme::{init_theme, ClassroomTheme};
