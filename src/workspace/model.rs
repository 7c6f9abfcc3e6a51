//! Project data model

use super::kind::FileKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Allocate a fresh unique node id
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// A file in a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    /// Unique file id
    pub id: String,

    /// File name, last path segment
    pub name: String,

    /// Enclosing folder path followed by `name`
    pub path: String,

    /// Kind inferred from the name
    #[serde(rename = "type")]
    pub kind: FileKind,

    /// File contents
    #[serde(default)]
    pub content: String,

    /// When the file was created
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    /// When the file was last changed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl File {
    /// Create a file in `folder` (a normalized folder path)
    pub fn new(name: &str, content: String, folder: &str) -> Self {
        Self {
            id: new_id(),
            name: name.to_string(),
            path: format!("{}{}", folder, name),
            kind: FileKind::from_name(name),
            content,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Mark the file as changed now
    pub fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}

/// A folder in a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Unique folder id
    pub id: String,

    /// Folder name, last path segment
    pub name: String,

    /// Full path, starting and ending with `/`
    pub path: String,

    /// When the folder was created
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Folder {
    /// Create a folder named `name` inside `parent` (a normalized folder path)
    pub fn new(name: &str, parent: &str) -> Self {
        Self {
            id: new_id(),
            name: name.to_string(),
            path: format!("{}{}/", parent, name),
            created_at: Utc::now(),
        }
    }
}

/// One owner's files and folders
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub files: Vec<File>,

    #[serde(default)]
    pub folders: Vec<Folder>,
}

impl Project {
    /// Starter project given to owners without a stored one
    pub fn starter() -> Self {
        Self {
            files: vec![
                File::new("index.html", STARTER_HTML.to_string(), "/"),
                File::new("style.css", STARTER_CSS.to_string(), "/"),
                File::new("script.js", STARTER_JS.to_string(), "/"),
            ],
            folders: Vec::new(),
        }
    }
}

const STARTER_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>My Project</title>
    <link rel="stylesheet" href="style.css">
</head>
<body>
    <h1>Welcome to the JavaScript playground</h1>
    <div id="app"></div>
    <script src="script.js"></script>
</body>
</html>"#;

const STARTER_CSS: &str = "body {\n    font-family: Arial, sans-serif;\n    margin: 20px;\n    background: #f0f2f5;\n}\nh1 { color: #333; }";

const STARTER_JS: &str = "// JavaScript\nconsole.log('Hello, World!');\ndocument.getElementById('app').innerHTML = '<p>Start coding!</p>';";
