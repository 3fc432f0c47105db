//! Review-phase wrappers for parsed transcript batches.
//!
//! A parse produces an editable in-memory list; nothing reaches the store
//! until `commit`, and dropping the value is the cancel path.

use crate::store::{StoreError, VaultStore};
use opsvault_common::parsed::{ParseMode, ParsedConfigEntry, ParsedLogEntry};
use opsvault_parser::{detect_type, parse_command_log, parse_config_transcript};

/// A parsed command-log batch awaiting review and commit.
#[derive(Debug)]
pub struct LogImport {
    entries: Vec<ParsedLogEntry>,
}

impl LogImport {
    pub fn parse(raw: &str, mode: ParseMode) -> Self {
        Self {
            entries: parse_command_log(raw, mode),
        }
    }

    pub fn entries(&self) -> &[ParsedLogEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn update_command(&mut self, id: &str, value: &str) -> bool {
        self.update(id, |e| e.command = value.to_string())
    }

    pub fn update_output(&mut self, id: &str, value: &str) -> bool {
        self.update(id, |e| e.output = value.to_string())
    }

    pub fn update_user(&mut self, id: &str, value: Option<&str>) -> bool {
        self.update(id, |e| e.user = value.map(str::to_string))
    }

    pub fn update_directory(&mut self, id: &str, value: Option<&str>) -> bool {
        self.update(id, |e| e.directory = value.map(str::to_string))
    }

    /// Append the reviewed entries to a thread. Consumes the batch; the
    /// caller still decides when to `save` the store.
    pub fn commit(self, store: &mut VaultStore, thread_id: &str) -> Result<Vec<String>, StoreError> {
        store.append_logs(thread_id, &self.entries)
    }

    fn update(&mut self, id: &str, apply: impl FnOnce(&mut ParsedLogEntry)) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                apply(entry);
                true
            }
            None => false,
        }
    }
}

/// A parsed config batch awaiting review and commit.
#[derive(Debug)]
pub struct ConfigImport {
    entries: Vec<ParsedConfigEntry>,
}

impl ConfigImport {
    pub fn parse(raw: &str) -> Self {
        Self {
            entries: parse_config_transcript(raw),
        }
    }

    pub fn entries(&self) -> &[ParsedConfigEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Edit a path before commit. Entries here are new by definition, so the
    /// type is re-inferred from the edited path; saved records never retag.
    pub fn update_path(&mut self, id: &str, value: &str) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.path = value.to_string();
                entry.file_type = detect_type(value).to_string();
                true
            }
            None => false,
        }
    }

    pub fn update_content(&mut self, id: &str, value: &str) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.content = value.to_string();
                true
            }
            None => false,
        }
    }

    pub fn commit(self, store: &mut VaultStore, server_id: &str) -> Result<Vec<String>, StoreError> {
        store.append_configs(server_id, &self.entries)
    }
}
