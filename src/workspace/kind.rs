//! File kinds inferred from extensions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a workspace file, inferred from its name's extension
///
/// Serialized with the tags stored projects already use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileKind {
    #[serde(rename = "html")]
    Markup,
    #[serde(rename = "css")]
    Stylesheet,
    #[serde(rename = "javascript")]
    Script,
    #[serde(rename = "json")]
    Data,
    #[serde(rename = "text")]
    PlainText,
}

impl FileKind {
    /// Infer the kind from a file name; unknown extensions are plain text
    pub fn from_name(name: &str) -> Self {
        let Some((_, ext)) = name.rsplit_once('.') else {
            return Self::PlainText;
        };
        match ext.to_ascii_lowercase().as_str() {
            "html" | "htm" => Self::Markup,
            "css" => Self::Stylesheet,
            "js" => Self::Script,
            "json" => Self::Data,
            _ => Self::PlainText,
        }
    }

    /// Content given to a new file of this kind when none is supplied
    pub fn default_content(&self) -> &'static str {
        match self {
            Self::Markup => {
                "<!DOCTYPE html>\n<html>\n<head>\n    <title>Document</title>\n</head>\n<body>\n    \n</body>\n</html>"
            }
            Self::Stylesheet => "/* CSS代码 */\n",
            Self::Script => "// JavaScript代码\n",
            Self::Data => "{\n    \n}",
            Self::PlainText => "",
        }
    }

    /// Stored tag for this kind
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Markup => "html",
            Self::Stylesheet => "css",
            Self::Script => "javascript",
            Self::Data => "json",
            Self::PlainText => "text",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}
