//! JSON-file-backed vault store.
//!
//! The whole vault is one document loaded on open and written back on
//! `save`; append operations assign durable uuid ids and per-scope order
//! sequence numbers.

mod backup;
mod export;

pub use backup::{export_backup, parse_backup, process_import, ImportSummary};
pub use export::{thread_to_csv, thread_to_markdown};

use opsvault_common::model::{
    new_id, now_millis, CommandDraft, CommandItem, LogDraft, ServerCommandLog, ServerConfig,
    ServerDraft, ServerItem, ServerThread,
};
use opsvault_common::parsed::{ParsedConfigEntry, ParsedLogEntry};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read store file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode store file: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Unknown server: {0}")]
    UnknownServer(String),
    #[error("Unknown thread: {0}")]
    UnknownThread(String),
    #[error("Unknown log entry: {0}")]
    UnknownLog(String),
    #[error("Unknown config entry: {0}")]
    UnknownConfig(String),
    #[error("Unsupported backup version: {0}")]
    UnsupportedBackup(u32),
}

/// The five record collections, as serialized to disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Vault {
    pub commands: Vec<CommandItem>,
    pub servers: Vec<ServerItem>,
    pub threads: Vec<ServerThread>,
    pub logs: Vec<ServerCommandLog>,
    pub configs: Vec<ServerConfig>,
}

pub struct VaultStore {
    path: PathBuf,
    vault: Vault,
}

impl VaultStore {
    /// Open the vault at `path`. A missing file is an empty vault, not an
    /// error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let vault = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No store file at {}, starting empty", path.display());
                Vault::default()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, vault })
    }

    pub fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string_pretty(&self.vault)?;
        std::fs::write(&self.path, raw)?;
        debug!("Saved vault to {}", self.path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn vault(&self) -> &Vault {
        &self.vault
    }

    // -- command library ---------------------------------------------------

    pub fn add_command(&mut self, draft: CommandDraft) -> &CommandItem {
        let now = now_millis();
        self.vault.commands.push(CommandItem {
            id: new_id(),
            command: draft.command,
            description: draft.description,
            output: draft.output,
            category: draft.category,
            tags: draft.tags,
            created_at: now,
            updated_at: now,
        });
        self.vault.commands.last().unwrap()
    }

    // -- servers and threads -----------------------------------------------

    pub fn add_server(&mut self, draft: ServerDraft) -> &ServerItem {
        self.vault.servers.push(ServerItem {
            id: new_id(),
            project: draft.project,
            name: draft.name,
            host: draft.host,
            username: draft.username,
            port: draft.port,
            auth_type: draft.auth_type,
            auth_value: draft.auth_value,
            description: draft.description,
            tags: draft.tags,
            updated_at: now_millis(),
        });
        self.vault.servers.last().unwrap()
    }

    pub fn server(&self, id: &str) -> Option<&ServerItem> {
        self.vault.servers.iter().find(|s| s.id == id)
    }

    pub fn add_thread(&mut self, server_id: &str, title: &str) -> Result<&ServerThread, StoreError> {
        if self.server(server_id).is_none() {
            return Err(StoreError::UnknownServer(server_id.to_string()));
        }
        let order = self
            .vault
            .threads
            .iter()
            .filter(|t| t.server_id == server_id)
            .filter_map(|t| t.order)
            .max()
            .map_or(0, |m| m + 1);
        let now = now_millis();
        self.vault.threads.push(ServerThread {
            id: new_id(),
            server_id: server_id.to_string(),
            title: title.to_string(),
            order: Some(order),
            created_at: now,
            updated_at: now,
        });
        Ok(self.vault.threads.last().unwrap())
    }

    pub fn thread(&self, id: &str) -> Option<&ServerThread> {
        self.vault.threads.iter().find(|t| t.id == id)
    }

    pub fn threads_for(&self, server_id: &str) -> Vec<&ServerThread> {
        let mut threads: Vec<&ServerThread> = self
            .vault
            .threads
            .iter()
            .filter(|t| t.server_id == server_id)
            .collect();
        threads.sort_by_key(|t| t.order.unwrap_or(0));
        threads
    }

    // -- command logs ------------------------------------------------------

    pub fn add_log(&mut self, thread_id: &str, draft: LogDraft) -> Result<&ServerCommandLog, StoreError> {
        if self.thread(thread_id).is_none() {
            return Err(StoreError::UnknownThread(thread_id.to_string()));
        }
        let order = self.next_log_order(thread_id);
        self.vault.logs.push(ServerCommandLog {
            id: new_id(),
            thread_id: thread_id.to_string(),
            command: draft.command,
            output: draft.output,
            note: draft.note,
            user: draft.user,
            directory: draft.directory,
            file_content_before: draft.file_content_before,
            file_content_after: draft.file_content_after,
            order,
            created_at: now_millis(),
        });
        Ok(self.vault.logs.last().unwrap())
    }

    /// Append a reviewed parse batch to a thread, assigning fresh ids and
    /// consecutive order numbers. Returns the assigned ids, in order.
    pub fn append_logs(
        &mut self,
        thread_id: &str,
        entries: &[ParsedLogEntry],
    ) -> Result<Vec<String>, StoreError> {
        if self.thread(thread_id).is_none() {
            return Err(StoreError::UnknownThread(thread_id.to_string()));
        }
        let mut order = self.next_log_order(thread_id);
        let now = now_millis();
        let mut ids = Vec::with_capacity(entries.len());

        for entry in entries {
            let id = new_id();
            self.vault.logs.push(ServerCommandLog {
                id: id.clone(),
                thread_id: thread_id.to_string(),
                command: entry.command.clone(),
                output: if entry.output.is_empty() {
                    None
                } else {
                    Some(entry.output.clone())
                },
                note: None,
                user: entry.user.clone(),
                directory: entry.directory.clone(),
                file_content_before: None,
                file_content_after: None,
                order,
                created_at: now,
            });
            order += 1;
            ids.push(id);
        }

        info!("Appended {} log entries to thread {}", ids.len(), thread_id);
        Ok(ids)
    }

    pub fn log(&self, id: &str) -> Option<&ServerCommandLog> {
        self.vault.logs.iter().find(|l| l.id == id)
    }

    pub fn logs_for(&self, thread_id: &str) -> Vec<&ServerCommandLog> {
        let mut logs: Vec<&ServerCommandLog> = self
            .vault
            .logs
            .iter()
            .filter(|l| l.thread_id == thread_id)
            .collect();
        logs.sort_by_key(|l| l.order);
        logs
    }

    pub fn update_log_note(&mut self, log_id: &str, note: Option<String>) -> Result<(), StoreError> {
        let log = self
            .vault
            .logs
            .iter_mut()
            .find(|l| l.id == log_id)
            .ok_or_else(|| StoreError::UnknownLog(log_id.to_string()))?;
        log.note = note;
        Ok(())
    }

    fn next_log_order(&self, thread_id: &str) -> u32 {
        self.vault
            .logs
            .iter()
            .filter(|l| l.thread_id == thread_id)
            .map(|l| l.order)
            .max()
            .map_or(0, |m| m + 1)
    }

    // -- config captures ---------------------------------------------------

    /// Append a reviewed config batch to a server. Returns the assigned ids.
    pub fn append_configs(
        &mut self,
        server_id: &str,
        entries: &[ParsedConfigEntry],
    ) -> Result<Vec<String>, StoreError> {
        if self.server(server_id).is_none() {
            return Err(StoreError::UnknownServer(server_id.to_string()));
        }
        let now = now_millis();
        let mut ids = Vec::with_capacity(entries.len());

        for entry in entries {
            let id = new_id();
            self.vault.configs.push(ServerConfig {
                id: id.clone(),
                server_id: server_id.to_string(),
                path: entry.path.clone(),
                content: entry.content.clone(),
                file_type: entry.file_type.clone(),
                updated_at: now,
            });
            ids.push(id);
        }

        info!("Appended {} configs to server {}", ids.len(), server_id);
        Ok(ids)
    }

    pub fn configs_for(&self, server_id: &str) -> Vec<&ServerConfig> {
        self.vault
            .configs
            .iter()
            .filter(|c| c.server_id == server_id)
            .collect()
    }

    /// Edit a saved config record. The stored `type` is deliberately left
    /// alone on path edits; only the pre-commit review list retags.
    pub fn update_config(
        &mut self,
        config_id: &str,
        path: Option<String>,
        content: Option<String>,
    ) -> Result<(), StoreError> {
        let config = self
            .vault
            .configs
            .iter_mut()
            .find(|c| c.id == config_id)
            .ok_or_else(|| StoreError::UnknownConfig(config_id.to_string()))?;
        if let Some(path) = path {
            config.path = path;
        }
        if let Some(content) = content {
            config.content = content;
        }
        config.updated_at = now_millis();
        Ok(())
    }

    // -- removal -----------------------------------------------------------

    /// Remove a server and everything hanging off it.
    pub fn remove_server(&mut self, server_id: &str) -> Result<(), StoreError> {
        if self.server(server_id).is_none() {
            return Err(StoreError::UnknownServer(server_id.to_string()));
        }
        let dead_threads: Vec<String> = self
            .vault
            .threads
            .iter()
            .filter(|t| t.server_id == server_id)
            .map(|t| t.id.clone())
            .collect();
        self.vault
            .logs
            .retain(|l| !dead_threads.contains(&l.thread_id));
        self.vault.threads.retain(|t| t.server_id != server_id);
        self.vault.configs.retain(|c| c.server_id != server_id);
        self.vault.servers.retain(|s| s.id != server_id);
        Ok(())
    }

    pub fn remove_thread(&mut self, thread_id: &str) -> Result<(), StoreError> {
        if self.thread(thread_id).is_none() {
            return Err(StoreError::UnknownThread(thread_id.to_string()));
        }
        self.vault.logs.retain(|l| l.thread_id != thread_id);
        self.vault.threads.retain(|t| t.id != thread_id);
        Ok(())
    }

    pub fn remove_log(&mut self, log_id: &str) -> Result<(), StoreError> {
        if self.log(log_id).is_none() {
            return Err(StoreError::UnknownLog(log_id.to_string()));
        }
        self.vault.logs.retain(|l| l.id != log_id);
        Ok(())
    }

    /// Merge imported (already id-remapped) records into the vault.
    pub fn merge(&mut self, imported: Vault) {
        self.vault.commands.extend(imported.commands);
        self.vault.servers.extend(imported.servers);
        self.vault.threads.extend(imported.threads);
        self.vault.logs.extend(imported.logs);
        self.vault.configs.extend(imported.configs);
    }
}
