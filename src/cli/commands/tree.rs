//! Tree command - show the project tree

use crate::cli::args::{OutputFormat, TreeArgs};
use crate::cli::context::AppContext;
use crate::error::ClassroomResult;
use crate::ui::{self, UiContext};
use crate::workspace::TreeNode;
use console::style;

/// Execute the tree command
pub async fn execute(args: TreeArgs, app: &AppContext) -> ClassroomResult<()> {
    let workspace = app.workspace()?;
    let tree = workspace.materialize_tree();

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tree)?),
        OutputFormat::Plain => print!("{}", tree.to_listing()),
        OutputFormat::Table => {
            let ctx = UiContext::detect();
            if tree.children().is_empty() {
                ui::step_info(&ctx, "Project is empty");
                return Ok(());
            }
            let active = workspace.session().active();
            println!("{}", style("/").bold());
            for child in tree.children() {
                print_node(child, 1, active);
            }
            println!();
            println!("{} item(s)", tree.descendant_count());
        }
    }

    Ok(())
}

fn print_node(node: &TreeNode, depth: usize, active: Option<&str>) {
    let indent = "  ".repeat(depth);
    match node {
        TreeNode::Folder { name, children, .. } => {
            println!("{}{}/", indent, style(name).blue().bold());
            for child in children {
                print_node(child, depth + 1, active);
            }
        }
        TreeNode::File { id, name, kind, .. } => {
            let marker = if active == Some(id.as_str()) { "*" } else { " " };
            println!("{}{}{} {}", indent, marker, name, style(kind).dim());
        }
    }
}
