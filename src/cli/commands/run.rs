//! Run command - execute the project in the sandbox

use crate::cli::args::RunArgs;
use crate::cli::context::{require_file, AppContext};
use crate::error::{ClassroomError, ClassroomResult};
use crate::sandbox::{ProcessRuntime, RunMode, Sandbox};
use crate::ui::{self, TerminalLog, UiContext};
use std::sync::Arc;
use tokio::fs;
use tracing::debug;

/// Execute the run command
pub async fn execute(args: RunArgs, app: &AppContext) -> ClassroomResult<()> {
    let ctx = UiContext::detect();
    let workspace = app.workspace()?;

    let active = match &args.active {
        Some(path) => Some(require_file(&workspace, path)?),
        None => workspace.active_file(),
    };
    debug!(
        "Running {} file(s), active: {:?}",
        workspace.files().len(),
        active.map(|f| f.path.as_str())
    );

    let runtime = Arc::new(ProcessRuntime::from_config(&app.config.sandbox));
    let clear = app.config.sandbox.clear_log_on_run && !args.keep_log;
    let mut sandbox = Sandbox::new(runtime, Arc::new(TerminalLog::new())).clear_on_run(clear);

    debug!("Using the {} runtime ({})", sandbox.runtime_name(), app.config.sandbox.interpreter);
    let mode = sandbox.run(workspace.files(), active).await;
    sandbox.settle().await;

    match (mode, args.preview) {
        (RunMode::Document { markup }, Some(preview)) => {
            fs::write(&preview, markup).await.map_err(|e| {
                ClassroomError::io(format!("writing preview to {}", preview.display()), e)
            })?;
            ui::step_ok_detail(&ctx, "Preview written", &preview.display().to_string());
        }
        (_, Some(_)) => {
            ui::step_warn_hint(&ctx, "No preview written", "the project has no markup file");
        }
        (_, None) => {}
    }

    Ok(())
}
