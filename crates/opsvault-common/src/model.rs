use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generate a fresh record id.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current time as epoch milliseconds, the timestamp unit used throughout
/// the vault and its backup format.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Coarse grouping for reusable command snippets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "File System")]
    FileSystem,
    #[serde(rename = "Network")]
    Network,
    #[serde(rename = "Process")]
    Process,
    #[serde(rename = "User Management")]
    UserMgmt,
    #[serde(rename = "Archive/Compression")]
    Archive,
    #[serde(rename = "System Info")]
    SystemInfo,
    #[serde(rename = "Package Mgmt")]
    PackageMgmt,
    #[default]
    #[serde(rename = "Other")]
    Other,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Category::FileSystem => "File System",
            Category::Network => "Network",
            Category::Process => "Process",
            Category::UserMgmt => "User Management",
            Category::Archive => "Archive/Compression",
            Category::SystemInfo => "System Info",
            Category::PackageMgmt => "Package Mgmt",
            Category::Other => "Other",
        };
        f.write_str(name)
    }
}

/// A reusable command snippet in the library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandItem {
    pub id: String,
    pub command: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub category: Category,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
    Password,
    Key,
}

/// A registered server. `auth_value` holds the password or the key
/// path/content; it is never printed unmasked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerItem {
    pub id: String,
    pub project: String,
    pub name: String,
    pub host: String,
    pub username: String,
    pub port: u16,
    pub auth_type: AuthMethod,
    pub auth_value: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub updated_at: i64,
}

/// A work-session thread under a server, grouping command logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerThread {
    pub id: String,
    pub server_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// One logged command within a thread. Editor invocations carry the file
/// body before and after the edit instead of plain output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerCommandLog {
    pub id: String,
    pub thread_id: String,
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_content_before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_content_after: Option<String>,
    pub order: u32,
    pub created_at: i64,
}

/// A captured configuration file tied to a server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    pub id: String,
    pub server_id: String,
    pub path: String,
    pub content: String,
    #[serde(rename = "type")]
    pub file_type: String,
    pub updated_at: i64,
}

/// Input shape for adding a snippet to the command library.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandDraft {
    pub command: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Input shape for creating a server; id and timestamp are assigned by the
/// store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerDraft {
    pub project: String,
    pub name: String,
    pub host: String,
    pub username: String,
    pub port: u16,
    pub auth_type: AuthMethod,
    pub auth_value: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Input shape for logging a single command by hand (as opposed to the bulk
/// transcript import path).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogDraft {
    pub command: String,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub directory: Option<String>,
    #[serde(default)]
    pub file_content_before: Option<String>,
    #[serde(default)]
    pub file_content_after: Option<String>,
}

/// The backup document. `configs` defaults to empty so backups written
/// before config capture existed still import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    pub version: u32,
    pub timestamp: i64,
    pub commands: Vec<CommandItem>,
    pub servers: Vec<ServerItem>,
    pub threads: Vec<ServerThread>,
    pub logs: Vec<ServerCommandLog>,
    #[serde(default)]
    pub configs: Vec<ServerConfig>,
}

pub const BACKUP_VERSION: u32 = 1;
