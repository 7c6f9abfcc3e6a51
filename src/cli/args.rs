//! CLI argument definitions using clap derive

use crate::workspace::Role;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Classroom - coding workspace for teachers and students
///
/// Manages a per-owner project tree backed by a local store and runs it in
/// an isolated interpreter.
#[derive(Parser, Debug)]
#[command(name = "classroom")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CLASSROOM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Owner whose project to open (overrides workspace.owner)
    #[arg(long, global = true, env = "CLASSROOM_OWNER")]
    pub owner: Option<String>,

    /// Role of the owner (overrides workspace.role)
    #[arg(long, global = true, value_enum)]
    pub role: Option<Role>,

    /// Diagnostic log format (overrides general.log_format)
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the project tree
    Tree(TreeArgs),

    /// Create, show, edit and remove files
    File(FileArgs),

    /// Create and remove folders
    Folder(FolderArgs),

    /// Manage open editor tabs
    Tab(TabArgs),

    /// Run the project
    Run(RunArgs),

    /// Inspect, export or replace the whole project
    Project(ProjectArgs),

    /// Inspect, export or reset the shared database
    Db(DbArgs),

    /// Show or edit configuration
    Config(ConfigArgs),
}

/// Output format for listings
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
    /// Plain text
    Plain,
}

/// Format of diagnostic log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Arguments for the tree command
#[derive(Parser, Debug)]
pub struct TreeArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the file command
#[derive(Parser, Debug)]
pub struct FileArgs {
    #[command(subcommand)]
    pub action: FileAction,
}

/// File actions
#[derive(Subcommand, Debug)]
pub enum FileAction {
    /// Create a file; the kind follows the extension
    New {
        /// File name, e.g. app.js
        name: String,

        /// Folder to create it in
        #[arg(short, long, default_value = "/")]
        folder: String,

        /// Initial content (defaults to the kind's template)
        #[arg(long)]
        content: Option<String>,
    },

    /// Print a file's content
    Show {
        /// File path, e.g. /src/app.js
        path: String,
    },

    /// Replace a file's content
    Write {
        /// File path
        path: String,

        /// New content
        #[arg(long, conflicts_with = "from")]
        content: Option<String>,

        /// Read new content from a local file (stdin if neither is given)
        #[arg(long)]
        from: Option<PathBuf>,
    },

    /// Rename a file in place
    Rename {
        /// File path
        path: String,

        /// New file name
        new_name: String,
    },

    /// Delete a file
    Rm {
        /// File path
        path: String,
    },

    /// Copy a local directory into the project
    Upload {
        /// Local directory to upload
        dir: PathBuf,

        /// Project folder to upload into
        #[arg(long, default_value = "/")]
        into: String,
    },
}

/// Arguments for the folder command
#[derive(Parser, Debug)]
pub struct FolderArgs {
    #[command(subcommand)]
    pub action: FolderAction,
}

/// Folder actions
#[derive(Subcommand, Debug)]
pub enum FolderAction {
    /// Create a folder
    New {
        /// Folder name
        name: String,

        /// Parent folder
        #[arg(short, long, default_value = "/")]
        parent: String,
    },

    /// Delete a folder and everything in it
    Rm {
        /// Folder path, e.g. /src/
        path: String,
    },
}

/// Arguments for the tab command
#[derive(Parser, Debug)]
pub struct TabArgs {
    #[command(subcommand)]
    pub action: Option<TabAction>,
}

/// Tab actions
#[derive(Subcommand, Debug)]
pub enum TabAction {
    /// Open a file's tab and make it active
    Open {
        /// File path
        path: String,
    },

    /// Close a file's tab
    Close {
        /// File path
        path: String,
    },

    /// List open tabs
    List,
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// File to run when the project has no markup or scripts
    /// (defaults to the active tab)
    #[arg(long)]
    pub active: Option<String>,

    /// Write the assembled preview document here (document mode only)
    #[arg(long)]
    pub preview: Option<PathBuf>,

    /// Keep earlier output instead of clearing it
    #[arg(long)]
    pub keep_log: bool,
}

/// Arguments for the project command
#[derive(Parser, Debug)]
pub struct ProjectArgs {
    #[command(subcommand)]
    pub action: Option<ProjectAction>,
}

/// Project actions
#[derive(Subcommand, Debug)]
pub enum ProjectAction {
    /// Show project summary
    Info,

    /// Write the project as JSON
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace the project with an exported one
    Import {
        /// Exported project file
        file: PathBuf,
    },

    /// Remove every file and folder
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the db command
#[derive(Parser, Debug)]
pub struct DbArgs {
    #[command(subcommand)]
    pub action: Option<DbAction>,
}

/// Database actions
#[derive(Subcommand, Debug)]
pub enum DbAction {
    /// Show record counts per collection
    Stats {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Write a snapshot of the shared collections
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace collections from a snapshot
    Import {
        /// Snapshot file
        file: PathBuf,
    },

    /// Delete every record in every collection
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_file_new() {
        let cli =
            Cli::try_parse_from(["classroom", "file", "new", "app.js", "-f", "src"]).unwrap();
        match cli.command {
            Commands::File(FileArgs {
                action: FileAction::New { name, folder, content },
            }) => {
                assert_eq!(name, "app.js");
                assert_eq!(folder, "src");
                assert!(content.is_none());
            }
            _ => panic!("Expected file new"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::try_parse_from([
            "classroom",
            "tree",
            "--owner",
            "s1",
            "--role",
            "student",
            "--log-format",
            "json",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.owner.as_deref(), Some("s1"));
        assert_eq!(cli.role, Some(Role::Student));
        assert_eq!(cli.log_format, Some(LogFormat::Json));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn parse_run() {
        let cli = Cli::try_parse_from([
            "classroom",
            "run",
            "--active",
            "/a.js",
            "--preview",
            "out.html",
        ])
        .unwrap();
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.active.as_deref(), Some("/a.js"));
                assert_eq!(args.preview, Some(PathBuf::from("out.html")));
                assert!(!args.keep_log);
            }
            _ => panic!("Expected run"),
        }
    }

    #[test]
    fn write_content_conflicts_with_from() {
        let result = Cli::try_parse_from([
            "classroom", "file", "write", "/a.js", "--content", "x", "--from", "f.js",
        ]);
        assert!(result.is_err());
    }
}
