use opsvault_common::model::{AuthMethod, ServerDraft};
use opsvault_common::parsed::ParseMode;
use opsvault_engine::importer::{ConfigImport, LogImport};
use opsvault_engine::store::VaultStore;
use tempfile::tempdir;

fn store_with_thread() -> (VaultStore, String, String) {
    let dir = tempdir().unwrap();
    let mut store = VaultStore::open(dir.path().join("vault.json")).unwrap();
    let server_id = store
        .add_server(ServerDraft {
            project: "demo".into(),
            name: "web01".into(),
            host: "10.0.0.5".into(),
            username: "deploy".into(),
            port: 22,
            auth_type: AuthMethod::Password,
            auth_value: "secret".into(),
            description: String::new(),
            tags: vec![],
        })
        .id
        .clone();
    let thread_id = store.add_thread(&server_id, "session").unwrap().id.clone();
    // The tempdir handle may drop; the store only touches disk on save.
    (store, server_id, thread_id)
}

#[test]
fn review_edits_then_commit() {
    let (mut store, _, thread_id) = store_with_thread();

    let mut import = LogImport::parse(
        "[deploy@web01 /srv]$ ls\napp\n[deploy@web01 /srv]$ rm -rf tmp",
        ParseMode::Auto,
    );
    assert_eq!(import.entries().len(), 2);

    let risky = import.entries()[1].id.clone();
    assert!(import.remove(&risky));

    let kept = import.entries()[0].id.clone();
    assert!(import.update_output(&kept, "app\nreleases"));
    assert!(import.update_user(&kept, Some("root")));
    assert!(!import.update_command("no-such-id", "x"));

    let ids = import.commit(&mut store, &thread_id).unwrap();
    assert_eq!(ids.len(), 1);

    let logs = store.logs_for(&thread_id);
    assert_eq!(logs[0].command, "ls");
    assert_eq!(logs[0].output.as_deref(), Some("app\nreleases"));
    assert_eq!(logs[0].user.as_deref(), Some("root"));
}

#[test]
fn empty_parse_surfaces_as_empty_batch() {
    let import = LogImport::parse("no prompts anywhere in this text", ParseMode::Auto);
    assert!(import.is_empty());
}

#[test]
fn path_edit_retags_new_entries() {
    let mut import = ConfigImport::parse("$ cat settings.json\n{ \"debug\": true }");
    assert_eq!(import.entries().len(), 1);
    assert_eq!(import.entries()[0].file_type, "json");

    let id = import.entries()[0].id.clone();
    assert!(import.update_path(&id, "/etc/nginx/conf.d/app.conf"));
    assert_eq!(import.entries()[0].file_type, "nginx");

    assert!(import.update_content(&id, "server {}"));
    assert_eq!(import.entries()[0].content, "server {}");
}

#[test]
fn config_commit_appends_to_server() {
    let (mut store, server_id, _) = store_with_thread();

    let import = ConfigImport::parse("$ pwd\n/etc/nginx\n$ cat nginx.conf\nuser nginx;");
    let ids = import.commit(&mut store, &server_id).unwrap();
    assert_eq!(ids.len(), 1);

    let configs = store.configs_for(&server_id);
    assert_eq!(configs[0].path, "/etc/nginx/nginx.conf");
    assert_eq!(configs[0].file_type, "nginx");
}
