//! Choosing what to run
//!
//! Priority: a markup file anywhere in the candidates selects document mode
//! with every stylesheet and script attached; otherwise any scripts select
//! script-only mode; otherwise the active file is run on its own if its kind
//! is runnable.

use crate::workspace::{File, FileKind};

/// What a run will execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Markup plus concatenated stylesheets and scripts
    Document {
        markup: String,
        styles: String,
        scripts: String,
    },

    /// Concatenated script source
    Script { source: String },

    /// Nothing runnable
    Nothing,
}

/// Build the plan for `candidates`, falling back to `active`
pub fn plan(candidates: &[File], active: Option<&File>) -> Plan {
    if let Some(markup) = candidates.iter().find(|f| f.kind == FileKind::Markup) {
        return Plan::Document {
            markup: markup.content.clone(),
            styles: concat(candidates, FileKind::Stylesheet),
            scripts: concat(candidates, FileKind::Script),
        };
    }

    if candidates.iter().any(|f| f.kind == FileKind::Script) {
        return Plan::Script {
            source: concat(candidates, FileKind::Script),
        };
    }

    match active {
        Some(file) if file.kind == FileKind::Script => Plan::Script {
            source: file.content.clone(),
        },
        Some(file) if file.kind == FileKind::Markup => Plan::Document {
            markup: file.content.clone(),
            styles: String::new(),
            scripts: String::new(),
        },
        _ => Plan::Nothing,
    }
}

/// Contents of every file of `kind`, in list order, joined by newlines
fn concat(files: &[File], kind: FileKind) -> String {
    files
        .iter()
        .filter(|f| f.kind == kind)
        .map(|f| f.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
