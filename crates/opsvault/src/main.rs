use clap::{Parser, Subcommand, ValueEnum};
use opsvault_engine::config::ConfigLoader;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(
    name = "opsvault",
    version,
    about = "Personal knowledge base for shell commands, servers, and session logs"
)]
pub struct Args {
    /// Vault file location (overrides the configured path)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse a pasted transcript and preview the entries without saving
    Parse {
        #[command(subcommand)]
        target: ParseTarget,
    },
    /// Parse a transcript and append the entries to the vault
    Import {
        #[command(subcommand)]
        target: ImportTarget,
    },
    /// Manage servers
    Server {
        #[command(subcommand)]
        action: ServerAction,
    },
    /// Manage session threads
    Thread {
        #[command(subcommand)]
        action: ThreadAction,
    },
    /// Record or annotate individual command logs
    Log {
        #[command(subcommand)]
        action: LogAction,
    },
    /// Export a thread's history
    Export {
        #[command(subcommand)]
        target: ExportTarget,
    },
    /// Back up or restore the whole vault
    Backup {
        #[command(subcommand)]
        action: BackupAction,
    },
    /// Ask the assistant to turn a request into a shell command
    Suggest {
        query: String,
        /// Save the suggestion into the command library
        #[arg(long)]
        save: bool,
    },
}

#[derive(Subcommand)]
pub enum ParseTarget {
    /// Segment a transcript into command/output entries
    Log {
        /// Heuristic mode; defaults to the configured one
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
        /// Read the transcript from a file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Extract pwd/cat configuration captures
    Config {
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ImportTarget {
    Log {
        /// Destination thread id
        #[arg(long)]
        thread: String,
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
        #[arg(long)]
        file: Option<PathBuf>,
    },
    Config {
        /// Destination server id
        #[arg(long)]
        server: String,
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ServerAction {
    Add {
        #[arg(long)]
        project: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        host: String,
        #[arg(long)]
        username: String,
        #[arg(long, default_value_t = 22)]
        port: u16,
        #[arg(long, value_enum, default_value = "password")]
        auth_type: AuthArg,
        #[arg(long)]
        auth_value: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
    },
    List,
}

#[derive(Subcommand)]
pub enum ThreadAction {
    Add {
        #[arg(long)]
        server: String,
        title: String,
    },
    List {
        #[arg(long)]
        server: String,
    },
}

#[derive(Subcommand)]
pub enum LogAction {
    /// Record a single command by hand
    Add {
        #[arg(long)]
        thread: String,
        #[arg(long)]
        command: String,
        #[arg(long)]
        output: Option<String>,
        #[arg(long)]
        note: Option<String>,
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        directory: Option<String>,
        /// For editor commands: file body before the edit, read from a file
        #[arg(long)]
        before_file: Option<PathBuf>,
        /// For editor commands: file body after the edit, read from a file
        #[arg(long)]
        after_file: Option<PathBuf>,
    },
    /// Set or generate the note on a logged command
    Note {
        id: String,
        text: Option<String>,
        /// Draft the note with the assistant instead of passing text
        #[arg(long)]
        ai: bool,
    },
}

#[derive(Subcommand)]
pub enum ExportTarget {
    Thread {
        id: String,
        #[arg(long, value_enum, default_value = "markdown")]
        format: FormatArg,
    },
}

#[derive(Subcommand)]
pub enum BackupAction {
    Export {
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    Import {
        file: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Auto,
    Lines,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum AuthArg {
    Password,
    Key,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Markdown,
    Csv,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Log to stderr so stdout stays clean for previews and exports.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = ConfigLoader::load_default().await?;
    cli::run(args, config).await
}
