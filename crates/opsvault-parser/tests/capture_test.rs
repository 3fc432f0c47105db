use opsvault_parser::{parse_config_transcript, parse_command_log};
use opsvault_common::parsed::ParseMode;

#[test]
fn pwd_then_relative_cat_resolves_against_it() {
    let raw = "$ pwd\n/etc/nginx\n$ cat nginx.conf\nuser nginx;\nworker_processes 1;";
    let entries = parse_config_transcript(raw);

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, "/etc/nginx/nginx.conf");
    assert_eq!(entries[0].content, "user nginx;\nworker_processes 1;");
    assert_eq!(entries[0].file_type, "nginx");
}

#[test]
fn absolute_cat_target_ignores_directory_context() {
    let raw = "[root@web /srv]$ cat /etc/hosts\n127.0.0.1 localhost\n::1 localhost";
    let entries = parse_config_transcript(raw);

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, "/etc/hosts");
    assert_eq!(entries[0].file_type, "other");
}

#[test]
fn relative_cat_without_context_keeps_bare_name() {
    let raw = "cat app.env\nDB_HOST=localhost\nDB_PORT=5432";
    let entries = parse_config_transcript(raw);

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, "app.env");
    assert_eq!(entries[0].file_type, "env");
}

#[test]
fn prompt_directory_feeds_relative_resolution() {
    let raw = "[deploy@app01 /srv/app]$ cat docker-compose.yml\nservices:\n  web:\n    image: nginx";
    let entries = parse_config_transcript(raw);

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, "/srv/app/docker-compose.yml");
    assert_eq!(entries[0].file_type, "docker");
}

#[test]
fn another_command_ends_the_capture() {
    let raw = "cat crontab\n0 3 * * * /srv/backup.sh\nsystemctl restart cron\nrestarted";
    let entries = parse_config_transcript(raw);

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, "crontab");
    assert_eq!(entries[0].file_type, "cron");
    assert_eq!(entries[0].content, "0 3 * * * /srv/backup.sh");
}

#[test]
fn multiple_captures_keep_document_order() {
    let raw = concat!(
        "$ pwd\n",
        "/etc/nginx\n",
        "$ cat nginx.conf\n",
        "user nginx;\n",
        "$ pwd\n",
        "/srv/app\n",
        "$ cat start.sh\n",
        "#!/bin/sh\n",
        "exec ./app\n",
    );
    let entries = parse_config_transcript(raw);

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].path, "/etc/nginx/nginx.conf");
    assert_eq!(entries[1].path, "/srv/app/start.sh");
    assert_eq!(entries[1].content, "#!/bin/sh\nexec ./app");
    assert_eq!(entries[1].file_type, "shell");
}

#[test]
fn cat_without_path_emits_nothing() {
    let raw = "[a@h /etc]$ cat\nstray output";
    let entries = parse_config_transcript(raw);
    assert!(entries.is_empty());
}

#[test]
fn capture_without_content_emits_nothing() {
    let raw = "$ cat empty.conf\n$ cat other.conf\nkey = value";
    let entries = parse_config_transcript(raw);

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, "other.conf");
}

#[test]
fn full_prompt_flushes_an_open_capture() {
    let raw = "$ cat motd\nWelcome to web01\n[root@web01 /etc]$ uptime\n12:00 up 1 day";
    let entries = parse_config_transcript(raw);

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, "motd");
    assert_eq!(entries[0].content, "Welcome to web01");
}

#[test]
fn context_line_flushes_an_open_capture() {
    let raw = "$ cat motd\nWelcome\n[root@web01 /etc][main]\nmore text";
    let entries = parse_config_transcript(raw);

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].content, "Welcome");
}

#[test]
fn reparsing_is_stable_modulo_ids() {
    let raw = "$ pwd\n/opt\n$ cat settings.json\n{ \"debug\": false }";
    let first = parse_config_transcript(raw);
    let second = parse_config_transcript(raw);

    let shape = |es: &[opsvault_common::parsed::ParsedConfigEntry]| -> Vec<(String, String, String)> {
        es.iter()
            .map(|e| (e.path.clone(), e.content.clone(), e.file_type.clone()))
            .collect()
    };
    assert_eq!(shape(&first), shape(&second));
}

#[test]
fn arbitrary_input_never_panics() {
    for raw in ["", "\n", "\u{0}\u{1}cat\u{2}", "cat", "pwd", "[[[", "$ $ $"] {
        let entries = parse_config_transcript(raw);
        assert!(entries.iter().all(|e| !e.path.is_empty()));
    }
}

#[test]
fn log_and_config_parsers_share_prompt_recognition() {
    // The same transcript read by both parsers: the segmenter sees commands
    // and output, the extractor sees only the file body.
    let raw = "[root@web01 /etc/nginx]$ cat nginx.conf\nuser nginx;\n[root@web01 /etc/nginx]$ nginx -s reload";
    let logs = parse_command_log(raw, ParseMode::Auto);
    let configs = parse_config_transcript(raw);

    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].command, "cat nginx.conf");
    assert_eq!(logs[0].output, "user nginx;");
    assert_eq!(configs.len(), 1);
    assert_eq!(configs[0].path, "/etc/nginx/nginx.conf");
}
