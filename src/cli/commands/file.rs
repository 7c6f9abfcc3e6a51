//! File command - create, show, edit and remove files

use crate::cli::args::{FileAction, FileArgs};
use crate::cli::context::{require_file, AppContext};
use crate::error::{ClassroomError, ClassroomResult};
use crate::ui::{self, UiContext};
use crate::workspace::path;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncReadExt;
use tracing::debug;
use walkdir::WalkDir;

/// Execute the file command
pub async fn execute(args: FileArgs, app: &AppContext) -> ClassroomResult<()> {
    let ctx = UiContext::detect();
    let mut workspace = app.workspace()?;

    match args.action {
        FileAction::New {
            name,
            folder,
            content,
        } => {
            let file = workspace.create_file(&name, content, &folder)?;
            workspace.open_tab(&file.id);
            app.save_session(&workspace)?;
            ui::step_ok_detail(&ctx, &format!("Created {}", file.path), file.kind.tag());
        }

        FileAction::Show { path } => {
            let file = require_file(&workspace, &path)?;
            print!("{}", file.content);
            if !file.content.ends_with('\n') && !file.content.is_empty() {
                println!();
            }
        }

        FileAction::Write {
            path,
            content,
            from,
        } => {
            let id = require_file(&workspace, &path)?.id.clone();
            let content = match (content, from) {
                (Some(content), _) => content,
                (None, Some(from)) => read_local(&from).await?,
                (None, None) => read_stdin().await?,
            };
            let bytes = content.len();
            if let Some(file) = workspace.update_content(&id, content)? {
                ui::step_ok_detail(
                    &ctx,
                    &format!("Wrote {}", file.path),
                    &format!("{bytes} bytes"),
                );
            }
        }

        FileAction::Rename { path, new_name } => {
            let id = require_file(&workspace, &path)?.id.clone();
            if let Some(file) = workspace.rename_file(&id, &new_name)? {
                ui::step_ok(&ctx, &format!("Renamed to {}", file.path));
            }
        }

        FileAction::Rm { path } => {
            let file = require_file(&workspace, &path)?;
            let (id, shown) = (file.id.clone(), file.path.clone());
            workspace.delete_file(&id)?;
            app.save_session(&workspace)?;
            ui::step_ok(&ctx, &format!("Deleted {shown}"));
        }

        FileAction::Upload { dir, into } => {
            let entries = collect_upload(&dir, &into).await?;
            if entries.is_empty() {
                ui::step_warn_hint(&ctx, "No files found", &dir.display().to_string());
                return Ok(());
            }
            let created = workspace.upload(entries)?;
            for file in &created {
                ui::remark(&ctx, &file.path);
            }
            ui::step_ok(&ctx, &format!("Uploaded {} file(s)", created.len()));
        }
    }

    Ok(())
}

/// Relative project paths and contents of every text file under `dir`
async fn collect_upload(dir: &Path, into: &str) -> ClassroomResult<Vec<(String, String)>> {
    let prefix = path::normalize_folder(into)?;
    let mut entries = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            ClassroomError::User(format!("Cannot read {}: {}", dir.display(), e))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(dir) else {
            continue;
        };
        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        match fs::read_to_string(entry.path()).await {
            Ok(content) => entries.push((format!("{}{}", prefix, relative), content)),
            Err(e) => debug!("Skipping {}: {}", entry.path().display(), e),
        }
    }

    Ok(entries)
}

async fn read_local(path: &Path) -> ClassroomResult<String> {
    fs::read_to_string(path)
        .await
        .map_err(|e| ClassroomError::io(format!("reading {}", path.display()), e))
}

async fn read_stdin() -> ClassroomResult<String> {
    let mut content = String::new();
    tokio::io::stdin()
        .read_to_string(&mut content)
        .await
        .map_err(|e| ClassroomError::io("reading stdin", e))?;
    Ok(content)
}
