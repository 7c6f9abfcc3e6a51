//! Db command - inspect, export, import or reset the shared collections

use super::project::write_file;
use crate::cli::args::{DbAction, DbArgs, OutputFormat};
use crate::cli::context::AppContext;
use crate::error::{ClassroomError, ClassroomResult};
use crate::ui::{self, UiContext};
use console::style;
use serde_json::{json, Value};
use tokio::fs;

/// Execute the db command
pub async fn execute(args: DbArgs, app: &AppContext) -> ClassroomResult<()> {
    match args.action {
        None => show_stats(app, OutputFormat::Table)?,
        Some(DbAction::Stats { format }) => show_stats(app, format)?,
        Some(DbAction::Export { output }) => {
            let json = serde_json::to_string_pretty(&app.cache.export_snapshot())?;
            match output {
                Some(path) => {
                    write_file(&path, &json).await?;
                    ui::step_ok_detail(
                        &UiContext::detect(),
                        "Snapshot exported",
                        &path.display().to_string(),
                    );
                }
                None => println!("{}", json),
            }
        }
        Some(DbAction::Import { file }) => import(app, &file).await?,
        Some(DbAction::Reset { yes }) => {
            let ctx = UiContext::detect().with_auto_yes(yes);
            if !ui::confirm(&ctx, "Delete every record in every collection?", false).await? {
                ui::step_warn_hint(&ctx, "Database left unchanged", "Use --yes to confirm");
                return Ok(());
            }
            let report = app.cache.clear_all().await;
            for collection in &report.legacy_imported {
                ui::remark(&ctx, &format!("Re-imported legacy {}", collection));
            }
            ui::outro_success(&ctx, "Database reset");
        }
    }

    Ok(())
}

fn show_stats(app: &AppContext, format: OutputFormat) -> ClassroomResult<()> {
    let stats = app.cache.stats();

    match format {
        OutputFormat::Json => {
            let counts: serde_json::Map<String, Value> = stats
                .iter()
                .map(|(c, n)| (c.name().to_string(), json!(n)))
                .collect();
            let doc = json!({
                "backend": app.cache.backend_name(),
                "persistent": app.cache.is_persistent(),
                "failedWrites": app.cache.failed_writes(),
                "collections": counts,
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        OutputFormat::Plain => {
            for (collection, count) in &stats {
                println!("{}\t{}", collection, count);
            }
        }
        OutputFormat::Table => {
            let ctx = UiContext::detect();
            ui::intro(&ctx, "Database");
            ui::key_value_status(
                &ctx,
                "Backend",
                app.cache.backend_name(),
                app.cache.is_persistent(),
            );

            let hydration = app.cache.hydration();
            for collection in &hydration.failed {
                ui::step_warn(&ctx, &format!("Could not load {}", collection));
            }

            println!();
            println!(
                "{:<16} {:>8}",
                style("COLLECTION").bold(),
                style("RECORDS").bold()
            );
            println!("{}", "-".repeat(25));
            for (collection, count) in &stats {
                println!("{:<16} {:>8}", collection.name(), count);
            }
        }
    }

    Ok(())
}

async fn import(app: &AppContext, file: &std::path::Path) -> ClassroomResult<()> {
    let ctx = UiContext::detect();
    let payload = fs::read_to_string(file)
        .await
        .map_err(|e| ClassroomError::io(format!("reading {}", file.display()), e))?;
    let snapshot: Value = serde_json::from_str(&payload)
        .map_err(|e| ClassroomError::SnapshotInvalid(e.to_string()))?;

    let report = app.cache.import_snapshot(&snapshot)?;
    for (collection, count) in &report.imported {
        ui::step_ok_detail(
            &ctx,
            &format!("Imported {}", collection),
            &format!("{count} record(s)"),
        );
    }
    for collection in &report.skipped {
        ui::step_warn_hint(
            &ctx,
            &format!("Skipped {}", collection),
            "expected an array of records with keys",
        );
    }
    if report.imported.is_empty() && report.skipped.is_empty() {
        ui::step_info(&ctx, "Snapshot contained no known collections");
    }

    Ok(())
}
