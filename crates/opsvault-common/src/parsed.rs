use serde::{Deserialize, Serialize};

/// How the command-log segmenter treats lines that carry no prompt syntax.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Allow-list heuristic: a bare line starting with a common command verb
    /// opens a new entry; everything else is output.
    #[default]
    Auto,
    /// Every non-prompt, non-empty line is its own command; no output
    /// capture.
    Lines,
}

/// One segmented command from a pasted transcript, before commit. Ids are
/// generation-time only and are replaced by the store on append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedLogEntry {
    pub id: String,
    pub command: String,
    pub output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
}

/// One captured configuration file from a `pwd`/`cat` transcript, before
/// commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedConfigEntry {
    pub id: String,
    pub path: String,
    pub content: String,
    #[serde(rename = "type")]
    pub file_type: String,
}
