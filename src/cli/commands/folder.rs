//! Folder command - create and remove folders

use crate::cli::args::{FolderAction, FolderArgs};
use crate::cli::context::{require_folder, AppContext};
use crate::error::ClassroomResult;
use crate::ui::{self, UiContext};

/// Execute the folder command
pub async fn execute(args: FolderArgs, app: &AppContext) -> ClassroomResult<()> {
    let ctx = UiContext::detect();
    let mut workspace = app.workspace()?;

    match args.action {
        FolderAction::New { name, parent } => {
            let folder = workspace.create_folder(&name, &parent)?;
            ui::step_ok(&ctx, &format!("Created {}", folder.path));
        }

        FolderAction::Rm { path } => {
            let folder = require_folder(&workspace, &path)?;
            let (id, shown) = (folder.id.clone(), folder.path.clone());
            let files_before = workspace.files().len();
            workspace.delete_folder(&id)?;
            app.save_session(&workspace)?;
            ui::step_ok_detail(
                &ctx,
                &format!("Deleted {shown}"),
                &format!("{} file(s)", files_before - workspace.files().len()),
            );
        }
    }

    Ok(())
}
