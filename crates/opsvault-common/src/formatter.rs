use crate::model::{ServerItem, ServerThread};
use crate::parsed::{ParsedConfigEntry, ParsedLogEntry};

/// Replacement shown instead of passwords and key material.
const MASK: &str = "••••••••";

pub fn mask_secret(_value: &str) -> String {
    MASK.to_string()
}

/// Render a parsed command-log batch for terminal preview.
pub fn format_log_entries(entries: &[ParsedLogEntry]) -> String {
    let mut out = String::new();

    for (index, entry) in entries.iter().enumerate() {
        // e.g. #1 [bob @ /var/www]
        let context = match (&entry.user, &entry.directory) {
            (Some(user), Some(dir)) => format!(" [{} @ {}]", user, dir),
            (Some(user), None) => format!(" [{}]", user),
            (None, Some(dir)) => format!(" [{}]", dir),
            (None, None) => String::new(),
        };
        out.push_str(&format!("#{}{}\n", index + 1, context));
        out.push_str(&format!("  $ {}\n", entry.command));

        if !entry.output.is_empty() {
            for line in entry.output.lines() {
                out.push_str(&format!("  {}\n", line));
            }
        }
    }

    out
}

/// Render a parsed config batch for terminal preview. Bodies are elided past
/// a few lines; the full content is available through `--json`.
pub fn format_config_entries(entries: &[ParsedConfigEntry]) -> String {
    const PREVIEW_LINES: usize = 5;
    let mut out = String::new();

    for (index, entry) in entries.iter().enumerate() {
        out.push_str(&format!(
            "#{} {} ({})\n",
            index + 1,
            entry.path,
            entry.file_type
        ));

        let total = entry.content.lines().count();
        for line in entry.content.lines().take(PREVIEW_LINES) {
            out.push_str(&format!("  | {}\n", line));
        }
        if total > PREVIEW_LINES {
            out.push_str(&format!("  | ... ({} more lines)\n", total - PREVIEW_LINES));
        }
    }

    out
}

/// One-line server listing with the auth value masked.
pub fn format_server(server: &ServerItem) -> String {
    format!(
        "{}  {} ({})  {}@{}:{}  auth={}:{}",
        server.id,
        server.name,
        server.project,
        server.username,
        server.host,
        server.port,
        match server.auth_type {
            crate::model::AuthMethod::Password => "password",
            crate::model::AuthMethod::Key => "key",
        },
        mask_secret(&server.auth_value)
    )
}

pub fn format_thread(thread: &ServerThread) -> String {
    format!("{}  {}", thread.id, thread.title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AuthMethod, ServerItem};

    #[test]
    fn server_listing_masks_auth_value() {
        let server = ServerItem {
            id: "s1".into(),
            project: "demo".into(),
            name: "web01".into(),
            host: "10.0.0.5".into(),
            username: "deploy".into(),
            port: 22,
            auth_type: AuthMethod::Password,
            auth_value: "hunter2".into(),
            description: String::new(),
            tags: vec![],
            updated_at: 0,
        };

        let line = format_server(&server);
        assert!(!line.contains("hunter2"));
        assert!(line.contains("••••••••"));
    }

    #[test]
    fn log_preview_indents_output() {
        let entries = vec![ParsedLogEntry {
            id: "e1".into(),
            command: "ls -la".into(),
            output: "total 0".into(),
            user: Some("bob".into()),
            directory: Some("/var/www".into()),
        }];

        let out = format_log_entries(&entries);
        assert!(out.contains("#1 [bob @ /var/www]"));
        assert!(out.contains("  $ ls -la"));
        assert!(out.contains("  total 0"));
    }
}
