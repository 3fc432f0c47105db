//! Render a thread's log history as Markdown or CSV.

use chrono::{DateTime, Utc};
use opsvault_common::model::{ServerCommandLog, ServerItem, ServerThread};

fn timestamp(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

fn sorted<'a>(logs: &'a [&'a ServerCommandLog]) -> Vec<&'a ServerCommandLog> {
    let mut sorted: Vec<&ServerCommandLog> = logs.to_vec();
    sorted.sort_by_key(|l| l.order);
    sorted
}

pub fn thread_to_markdown(
    server: &ServerItem,
    thread: &ServerThread,
    logs: &[&ServerCommandLog],
) -> String {
    let mut md = format!("# {}\n", thread.title);
    md.push_str(&format!("**Server:** {} ({})\n", server.name, server.host));
    md.push_str(&format!(
        "**Date:** {}\n",
        timestamp(thread.created_at).format("%Y-%m-%d")
    ));
    md.push_str(&format!(
        "**Exported:** {}\n\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S")
    ));
    md.push_str("---\n\n");

    for log in sorted(logs) {
        md.push_str(&format!("### {}\n\n", timestamp(log.created_at).format("%H:%M:%S")));

        if let Some(note) = &log.note {
            md.push_str(&format!("> **Note:** {}\n\n", note));
        }

        if log.user.is_some() || log.directory.is_some() {
            md.push_str(&format!(
                "`[{}@{}]`\n",
                log.user.as_deref().unwrap_or("user"),
                log.directory.as_deref().unwrap_or("~")
            ));
        }

        md.push_str("```bash\n");
        md.push_str(&log.command);
        md.push_str("\n```\n\n");

        if log.file_content_before.is_some() || log.file_content_after.is_some() {
            md.push_str("**File Change (Diff):**\n");
            md.push_str("<details><summary>Before</summary>\n\n");
            md.push_str(&format!(
                "```\n{}\n```\n",
                log.file_content_before.as_deref().unwrap_or("")
            ));
            md.push_str("</details>\n");
            md.push_str("<details><summary>After</summary>\n\n");
            md.push_str(&format!(
                "```\n{}\n```\n",
                log.file_content_after.as_deref().unwrap_or("")
            ));
            md.push_str("</details>\n\n");
        } else if let Some(output) = &log.output {
            md.push_str("**Output:**\n");
            md.push_str(&format!("```\n{}\n```\n\n", output));
        }

        md.push('\n');
    }

    md
}

pub fn thread_to_csv(
    _server: &ServerItem,
    _thread: &ServerThread,
    logs: &[&ServerCommandLog],
) -> String {
    let header = [
        "Timestamp",
        "User",
        "Directory",
        "Command",
        "Output",
        "Note",
        "FileContentBefore",
        "FileContentAfter",
    ];

    let mut rows = vec![header.join(",")];
    for log in sorted(logs) {
        let row = [
            escape_csv(Some(&timestamp(log.created_at).to_rfc3339())),
            escape_csv(log.user.as_deref()),
            escape_csv(log.directory.as_deref()),
            escape_csv(Some(&log.command)),
            escape_csv(log.output.as_deref()),
            escape_csv(log.note.as_deref()),
            escape_csv(log.file_content_before.as_deref()),
            escape_csv(log.file_content_after.as_deref()),
        ];
        rows.push(row.join(","));
    }

    rows.join("\n")
}

/// Quote a CSV field, doubling embedded quotes.
fn escape_csv(field: Option<&str>) -> String {
    match field {
        None => "\"\"".to_string(),
        Some(value) => format!("\"{}\"", value.replace('"', "\"\"")),
    }
}
