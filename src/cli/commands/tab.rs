//! Tab command - manage open editor tabs

use crate::cli::args::{TabAction, TabArgs};
use crate::cli::context::{require_file, AppContext};
use crate::error::ClassroomResult;
use crate::ui::{self, UiContext};
use crate::workspace::Workspace;
use console::style;

/// Execute the tab command
pub async fn execute(args: TabArgs, app: &AppContext) -> ClassroomResult<()> {
    let mut workspace = app.workspace()?;

    match args.action {
        None | Some(TabAction::List) => list(&workspace),
        Some(TabAction::Open { path }) => {
            let id = require_file(&workspace, &path)?.id.clone();
            workspace.open_tab(&id);
            app.save_session(&workspace)?;
            list(&workspace);
        }
        Some(TabAction::Close { path }) => {
            let id = require_file(&workspace, &path)?.id.clone();
            workspace.close_tab(&id);
            app.save_session(&workspace)?;
            list(&workspace);
        }
    }

    Ok(())
}

fn list(workspace: &Workspace) {
    let session = workspace.session();
    if session.tabs().is_empty() {
        ui::step_info(&UiContext::detect(), "No open tabs");
        return;
    }

    for id in session.tabs() {
        let Some(file) = workspace.file(id) else {
            continue;
        };
        if session.active() == Some(id.as_str()) {
            println!("{} {}", style("*").green().bold(), style(&file.path).bold());
        } else {
            println!("  {}", file.path);
        }
    }
}
