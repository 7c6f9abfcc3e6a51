//! Project command - summary, export, import and clear

use crate::cli::args::{ProjectAction, ProjectArgs};
use crate::cli::context::AppContext;
use crate::error::{ClassroomError, ClassroomResult};
use crate::ui::{self, UiContext};
use crate::workspace::{FileKind, Workspace};
use std::path::Path;
use tokio::fs;

/// Execute the project command
pub async fn execute(args: ProjectArgs, app: &AppContext) -> ClassroomResult<()> {
    let mut workspace = app.workspace()?;

    match args.action {
        None | Some(ProjectAction::Info) => show_info(&workspace, app),
        Some(ProjectAction::Export { output }) => {
            let json = workspace.export_project()?;
            match output {
                Some(path) => {
                    write_file(&path, &json).await?;
                    ui::step_ok_detail(
                        &UiContext::detect(),
                        "Project exported",
                        &path.display().to_string(),
                    );
                }
                None => println!("{}", json),
            }
        }
        Some(ProjectAction::Import { file }) => {
            let payload = fs::read_to_string(&file)
                .await
                .map_err(|e| ClassroomError::io(format!("reading {}", file.display()), e))?;
            workspace.import_project(&payload)?;
            app.save_session(&workspace)?;
            ui::step_ok_detail(
                &UiContext::detect(),
                "Project imported",
                &format!(
                    "{} file(s), {} folder(s)",
                    workspace.files().len(),
                    workspace.folders().len()
                ),
            );
        }
        Some(ProjectAction::Clear { yes }) => {
            let ctx = UiContext::detect().with_auto_yes(yes);
            if !ui::confirm(&ctx, "Remove every file and folder?", false).await? {
                ui::step_warn_hint(&ctx, "Project left unchanged", "Use --yes to confirm");
                return Ok(());
            }
            workspace.clear()?;
            app.save_session(&workspace)?;
            ui::outro_success(&ctx, "Project cleared");
        }
    }

    Ok(())
}

fn show_info(workspace: &Workspace, app: &AppContext) {
    let ctx = UiContext::detect();
    let owner = workspace.owner();
    ui::intro(&ctx, "Project");

    ui::key_value(&ctx, "Owner", &owner.id);
    ui::key_value(&ctx, "Role", &owner.role.to_string());
    ui::key_value(&ctx, "Files", &workspace.files().len().to_string());
    ui::key_value(&ctx, "Folders", &workspace.folders().len().to_string());

    ui::section(&ctx, "By kind");
    for kind in [
        FileKind::Markup,
        FileKind::Stylesheet,
        FileKind::Script,
        FileKind::Data,
        FileKind::PlainText,
    ] {
        let count = workspace.files().iter().filter(|f| f.kind == kind).count();
        if count > 0 {
            ui::key_value(&ctx, kind.tag(), &count.to_string());
        }
    }

    let caps = workspace.capabilities();
    ui::section(&ctx, "Capabilities");
    for (label, allowed) in [
        ("Assign homework", caps.can_assign_homework),
        ("Submit homework", caps.can_submit_homework),
        ("Grade", caps.can_grade),
    ] {
        ui::key_value_status(&ctx, label, yes_no(allowed), allowed);
    }

    if !app.cache.is_persistent() {
        ui::step_warn(&ctx, "Changes are kept in memory only");
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

pub(crate) async fn write_file(path: &Path, content: &str) -> ClassroomResult<()> {
    fs::write(path, content)
        .await
        .map_err(|e| ClassroomError::io(format!("writing {}", path.display()), e))
}
