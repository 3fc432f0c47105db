use crate::{
    Args, AuthArg, BackupAction, Command, ExportTarget, FormatArg, ImportTarget, LogAction,
    ModeArg, ParseTarget, ServerAction, ThreadAction,
};
use anyhow::{bail, Context};
use opsvault_common::formatter;
use opsvault_common::model::{AuthMethod, CommandDraft, LogDraft, ServerDraft};
use opsvault_common::parsed::ParseMode;
use opsvault_engine::assist::{Assistant, GeminiAssistant};
use opsvault_engine::config::OpsvaultConfig;
use opsvault_engine::importer::{ConfigImport, LogImport};
use opsvault_engine::store::{export_backup, parse_backup, process_import, thread_to_csv, thread_to_markdown, VaultStore};
use opsvault_parser::editor_invocation;
use std::path::Path;
use tokio::io::AsyncReadExt;

const NO_LOG_RESULTS: &str = "No commands recognized. Check that the transcript contains prompt \
lines like `[user@host dir]$ cmd`, or lines starting with common commands.";
const NO_CONFIG_RESULTS: &str =
    "No files recognized. Check that the transcript contains `pwd` and `cat <file>` commands.";

pub async fn run(args: Args, config: OpsvaultConfig) -> anyhow::Result<()> {
    let store_path = args.store.unwrap_or_else(|| config.store_path());

    match args.command {
        Command::Parse { target } => parse(target, &config).await,
        Command::Import { target } => import(target, &config, &store_path).await,
        Command::Server { action } => server(action, &store_path),
        Command::Thread { action } => thread(action, &store_path),
        Command::Log { action } => log(action, &config, &store_path).await,
        Command::Export { target } => export(target, &store_path),
        Command::Backup { action } => backup(action, &store_path).await,
        Command::Suggest { query, save } => suggest(&query, save, &config, &store_path).await,
    }
}

async fn parse(target: ParseTarget, config: &OpsvaultConfig) -> anyhow::Result<()> {
    match target {
        ParseTarget::Log { mode, file, json } => {
            let raw = read_input(file.as_deref()).await?;
            let entries =
                opsvault_parser::parse_command_log(&raw, resolve_mode(mode, config));
            if entries.is_empty() {
                println!("{}", NO_LOG_RESULTS);
            } else if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                print!("{}", formatter::format_log_entries(&entries));
                println!("{} entries recognized.", entries.len());
            }
        }
        ParseTarget::Config { file, json } => {
            let raw = read_input(file.as_deref()).await?;
            let entries = opsvault_parser::parse_config_transcript(&raw);
            if entries.is_empty() {
                println!("{}", NO_CONFIG_RESULTS);
            } else if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                print!("{}", formatter::format_config_entries(&entries));
                println!("{} files recognized.", entries.len());
            }
        }
    }
    Ok(())
}

async fn import(
    target: ImportTarget,
    config: &OpsvaultConfig,
    store_path: &Path,
) -> anyhow::Result<()> {
    match target {
        ImportTarget::Log { thread, mode, file } => {
            let raw = read_input(file.as_deref()).await?;
            let batch = LogImport::parse(&raw, resolve_mode(mode, config));
            if batch.is_empty() {
                println!("{}", NO_LOG_RESULTS);
                return Ok(());
            }
            print!("{}", formatter::format_log_entries(batch.entries()));

            let mut store = VaultStore::open(store_path)?;
            let ids = batch.commit(&mut store, &thread)?;
            store.save()?;
            println!("Imported {} entries into thread {}.", ids.len(), thread);
        }
        ImportTarget::Config { server, file } => {
            let raw = read_input(file.as_deref()).await?;
            let batch = ConfigImport::parse(&raw);
            if batch.is_empty() {
                println!("{}", NO_CONFIG_RESULTS);
                return Ok(());
            }
            print!("{}", formatter::format_config_entries(batch.entries()));

            let mut store = VaultStore::open(store_path)?;
            let ids = batch.commit(&mut store, &server)?;
            store.save()?;
            println!("Imported {} files for server {}.", ids.len(), server);
        }
    }
    Ok(())
}

fn server(action: ServerAction, store_path: &Path) -> anyhow::Result<()> {
    let mut store = VaultStore::open(store_path)?;
    match action {
        ServerAction::Add {
            project,
            name,
            host,
            username,
            port,
            auth_type,
            auth_value,
            description,
            tags,
        } => {
            let server = store.add_server(ServerDraft {
                project,
                name,
                host,
                username,
                port,
                auth_type: match auth_type {
                    AuthArg::Password => AuthMethod::Password,
                    AuthArg::Key => AuthMethod::Key,
                },
                auth_value,
                description,
                tags,
            });
            println!("Added server {}.", server.id);
            store.save()?;
        }
        ServerAction::List => {
            let servers = &store.vault().servers;
            if servers.is_empty() {
                println!("No servers yet.");
            }
            for server in servers {
                println!("{}", formatter::format_server(server));
            }
        }
    }
    Ok(())
}

fn thread(action: ThreadAction, store_path: &Path) -> anyhow::Result<()> {
    let mut store = VaultStore::open(store_path)?;
    match action {
        ThreadAction::Add { server, title } => {
            let thread = store.add_thread(&server, &title)?;
            println!("Added thread {}.", thread.id);
            store.save()?;
        }
        ThreadAction::List { server } => {
            let threads = store.threads_for(&server);
            if threads.is_empty() {
                println!("No threads for server {}.", server);
            }
            for thread in threads {
                println!("{}", formatter::format_thread(thread));
            }
        }
    }
    Ok(())
}

async fn log(action: LogAction, config: &OpsvaultConfig, store_path: &Path) -> anyhow::Result<()> {
    let mut store = VaultStore::open(store_path)?;
    match action {
        LogAction::Add {
            thread,
            command,
            output,
            note,
            user,
            directory,
            before_file,
            after_file,
        } => {
            // Editor commands are worth recording as a file diff rather
            // than plain output.
            if let Some(invocation) = editor_invocation(&command) {
                if before_file.is_none() && after_file.is_none() {
                    match invocation.target {
                        Some(target) => eprintln!(
                            "Editor command detected (target: {}). Consider --before-file/--after-file to record the change.",
                            target
                        ),
                        None => eprintln!(
                            "Editor command detected. Consider --before-file/--after-file to record the change."
                        ),
                    }
                }
            }

            let file_content_before = read_optional(before_file.as_deref()).await?;
            let file_content_after = read_optional(after_file.as_deref()).await?;
            let log = store.add_log(
                &thread,
                LogDraft {
                    command,
                    output,
                    note,
                    user,
                    directory,
                    file_content_before,
                    file_content_after,
                },
            )?;
            println!("Logged {}.", log.id);
            store.save()?;
        }
        LogAction::Note { id, text, ai } => {
            let note = if ai {
                let entry = store
                    .log(&id)
                    .with_context(|| format!("no log entry {}", id))?;
                let assistant = GeminiAssistant::from_config(&config.assist)?;
                assistant
                    .summarize_log(&entry.command, entry.output.as_deref().unwrap_or(""))
                    .await?
            } else {
                match text {
                    Some(text) => text,
                    None => bail!("pass the note text, or --ai to generate one"),
                }
            };
            store.update_log_note(&id, Some(note.clone()))?;
            store.save()?;
            println!("{}", note);
        }
    }
    Ok(())
}

fn export(target: ExportTarget, store_path: &Path) -> anyhow::Result<()> {
    let ExportTarget::Thread { id, format } = target;
    let store = VaultStore::open(store_path)?;

    let thread = store
        .thread(&id)
        .with_context(|| format!("no thread {}", id))?;
    let server = store
        .server(&thread.server_id)
        .with_context(|| format!("no server {}", thread.server_id))?;
    let logs = store.logs_for(&id);

    match format {
        FormatArg::Markdown => print!("{}", thread_to_markdown(server, thread, &logs)),
        FormatArg::Csv => println!("{}", thread_to_csv(server, thread, &logs)),
    }
    Ok(())
}

async fn backup(action: BackupAction, store_path: &Path) -> anyhow::Result<()> {
    match action {
        BackupAction::Export { output } => {
            let store = VaultStore::open(store_path)?;
            let document = serde_json::to_string_pretty(&export_backup(store.vault()))?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, document).await?;
                    println!("Backup written to {}.", path.display());
                }
                None => println!("{}", document),
            }
        }
        BackupAction::Import { file } => {
            let raw = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let (imported, summary) = process_import(parse_backup(&raw)?);

            let mut store = VaultStore::open(store_path)?;
            store.merge(imported);
            store.save()?;
            println!(
                "Imported {} commands, {} servers, {} threads, {} logs, {} configs ({} orphans dropped).",
                summary.commands,
                summary.servers,
                summary.threads,
                summary.logs,
                summary.configs,
                summary.dropped_orphans
            );
        }
    }
    Ok(())
}

async fn suggest(
    query: &str,
    save: bool,
    config: &OpsvaultConfig,
    store_path: &Path,
) -> anyhow::Result<()> {
    let assistant = GeminiAssistant::from_config(&config.assist)?;
    let suggestion = assistant.suggest_command(query).await?;

    println!("$ {}", suggestion.command);
    println!("{} [{}]", suggestion.description, suggestion.category);

    if save {
        let mut store = VaultStore::open(store_path)?;
        let item = store.add_command(CommandDraft {
            command: suggestion.command,
            description: suggestion.description,
            output: None,
            category: suggestion.category,
            tags: vec![],
        });
        println!("Saved to the command library as {}.", item.id);
        store.save()?;
    }
    Ok(())
}

fn resolve_mode(mode: Option<ModeArg>, config: &OpsvaultConfig) -> ParseMode {
    match mode {
        Some(ModeArg::Auto) => ParseMode::Auto,
        Some(ModeArg::Lines) => ParseMode::Lines,
        None => config.parse.default_mode,
    }
}

/// Read the transcript from a file, or from stdin until EOF.
async fn read_input(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display())),
        None => {
            eprintln!("Paste the transcript, then end input with Ctrl-D:");
            let mut raw = String::new();
            tokio::io::stdin().read_to_string(&mut raw).await?;
            Ok(raw)
        }
    }
}

async fn read_optional(path: Option<&Path>) -> anyhow::Result<Option<String>> {
    match path {
        Some(path) => Ok(Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading {}", path.display()))?,
        )),
        None => Ok(None),
    }
}
