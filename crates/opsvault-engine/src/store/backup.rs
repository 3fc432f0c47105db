//! Backup document handling: export, validation, and conflict-free import.

use super::{StoreError, Vault};
use opsvault_common::model::{new_id, now_millis, Backup, BACKUP_VERSION};
use std::collections::HashMap;
use tracing::info;

/// Snapshot the vault into a versioned backup document.
pub fn export_backup(vault: &Vault) -> Backup {
    Backup {
        version: BACKUP_VERSION,
        timestamp: now_millis(),
        commands: vault.commands.clone(),
        servers: vault.servers.clone(),
        threads: vault.threads.clone(),
        logs: vault.logs.clone(),
        configs: vault.configs.clone(),
    }
}

/// Decode and validate a backup document. Shape validation is the decode
/// itself; only the version number needs an explicit check.
pub fn parse_backup(raw: &str) -> Result<Backup, StoreError> {
    let backup: Backup = serde_json::from_str(raw)?;
    if backup.version > BACKUP_VERSION {
        return Err(StoreError::UnsupportedBackup(backup.version));
    }
    Ok(backup)
}

/// What an import kept and what it dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub commands: usize,
    pub servers: usize,
    pub threads: usize,
    pub logs: usize,
    pub configs: usize,
    pub dropped_orphans: usize,
}

/// Re-key every imported record with a fresh id so an import can never
/// collide with existing records, fixing up cross-references as it goes.
/// Threads, logs, and configs whose parent is missing from the backup are
/// dropped.
pub fn process_import(backup: Backup) -> (Vault, ImportSummary) {
    let mut server_ids: HashMap<String, String> = HashMap::new();
    let mut thread_ids: HashMap<String, String> = HashMap::new();
    let mut dropped = 0usize;

    let commands = backup
        .commands
        .into_iter()
        .map(|mut cmd| {
            cmd.id = new_id();
            cmd
        })
        .collect::<Vec<_>>();

    let servers = backup
        .servers
        .into_iter()
        .map(|mut srv| {
            let fresh = new_id();
            server_ids.insert(std::mem::replace(&mut srv.id, fresh.clone()), fresh);
            srv
        })
        .collect::<Vec<_>>();

    let threads = backup
        .threads
        .into_iter()
        .filter_map(|mut thread| match server_ids.get(&thread.server_id) {
            Some(server_id) => {
                let fresh = new_id();
                thread_ids.insert(std::mem::replace(&mut thread.id, fresh.clone()), fresh);
                thread.server_id = server_id.clone();
                Some(thread)
            }
            None => {
                dropped += 1;
                None
            }
        })
        .collect::<Vec<_>>();

    let logs = backup
        .logs
        .into_iter()
        .filter_map(|mut log| match thread_ids.get(&log.thread_id) {
            Some(thread_id) => {
                log.id = new_id();
                log.thread_id = thread_id.clone();
                Some(log)
            }
            None => {
                dropped += 1;
                None
            }
        })
        .collect::<Vec<_>>();

    let configs = backup
        .configs
        .into_iter()
        .filter_map(|mut config| match server_ids.get(&config.server_id) {
            Some(server_id) => {
                config.id = new_id();
                config.server_id = server_id.clone();
                Some(config)
            }
            None => {
                dropped += 1;
                None
            }
        })
        .collect::<Vec<_>>();

    let summary = ImportSummary {
        commands: commands.len(),
        servers: servers.len(),
        threads: threads.len(),
        logs: logs.len(),
        configs: configs.len(),
        dropped_orphans: dropped,
    };
    info!(
        "Prepared import: {} servers, {} threads, {} logs, {} configs ({} orphans dropped)",
        summary.servers, summary.threads, summary.logs, summary.configs, summary.dropped_orphans
    );

    (
        Vault {
            commands,
            servers,
            threads,
            logs,
            configs,
        },
        summary,
    )
}
