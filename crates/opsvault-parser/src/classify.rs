use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    // [user@host dir]$ cmd | user@host:dir# cmd -- brackets optional,
    // separator $ or #. Captures user, directory, command.
    static ref STANDARD_PROMPT: Regex =
        Regex::new(r"^\[?([A-Za-z0-9_\-]+)@[A-Za-z0-9_.\-]+(?:\s+|:)([^\]$#]+)\]?[$#]\s+(.*)$")
            .unwrap();
    // [user@host dir][branch] -- context-only line, command follows later.
    static ref CONTEXT_PROMPT: Regex =
        Regex::new(r"^\[([A-Za-z0-9_\-]+)@[A-Za-z0-9_.\-]+\s+([^\]]+)\](?:\[.*\])?$").unwrap();
    // > cmd -- shell secondary prompt.
    static ref CONTINUATION_PROMPT: Regex = Regex::new(r"^>\s+(.*)$").unwrap();
    // vi/vim/nano/... [file], optionally under sudo. The word boundary
    // stops `vi` from matching inside `vim` and eating its file argument.
    static ref EDITOR_COMMAND: Regex =
        Regex::new(r"^(?:sudo\s+)?(?:vi|vim|nano|emacs|gedit)\b(?:\s+(\S+))?").unwrap();
    static ref COMMAND_VERBS: HashSet<&'static str> = COMMON_COMMANDS.iter().copied().collect();
}

/// Command verbs recognized in heuristic mode. Plain data: extending the
/// list never touches classifier control flow.
pub const COMMON_COMMANDS: &[&str] = &[
    "sudo",
    "cd",
    "ls",
    "pwd",
    "cp",
    "mv",
    "rm",
    "mkdir",
    "rmdir",
    "touch",
    "cat",
    "less",
    "more",
    "head",
    "tail",
    "grep",
    "find",
    "chmod",
    "chown",
    "tar",
    "gzip",
    "gunzip",
    "zip",
    "unzip",
    "curl",
    "wget",
    "ssh",
    "scp",
    "rsync",
    "ping",
    "systemctl",
    "service",
    "journalctl",
    "docker",
    "docker-compose",
    "kubectl",
    "git",
    "npm",
    "yarn",
    "pnpm",
    "node",
    "python",
    "python3",
    "pip",
    "pip3",
    "make",
    "cargo",
    "vi",
    "vim",
    "nano",
    "crontab",
    "ps",
    "top",
    "htop",
    "kill",
    "killall",
    "df",
    "du",
    "free",
    "uname",
    "whoami",
    "id",
    "export",
    "echo",
    "source",
    "apt",
    "apt-get",
    "yum",
    "dnf",
    "brew",
    "mysql",
    "psql",
    "redis-cli",
];

/// Classification of one transcript line, in recognition priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass<'a> {
    /// Full prompt carrying context and the command text.
    Prompt {
        user: &'a str,
        directory: &'a str,
        command: &'a str,
    },
    /// Prompt carrying context only; the command is on a following line.
    Context { user: &'a str, directory: &'a str },
    /// Secondary-prompt line (`> cmd`).
    Continuation { command: &'a str },
    /// Bare line matched against the common-command allow-list. Produced
    /// only when heuristics are enabled.
    Heuristic { command: &'a str },
    /// Anything else: output while a command is pending, noise otherwise.
    Output(&'a str),
}

pub fn classify(line: &str, heuristics: bool) -> LineClass<'_> {
    if let Some(caps) = STANDARD_PROMPT.captures(line) {
        return LineClass::Prompt {
            user: caps.get(1).map_or("", |m| m.as_str()),
            directory: caps.get(2).map_or("", |m| m.as_str()),
            command: caps.get(3).map_or("", |m| m.as_str()),
        };
    }

    if let Some(caps) = CONTEXT_PROMPT.captures(line) {
        return LineClass::Context {
            user: caps.get(1).map_or("", |m| m.as_str()),
            directory: caps.get(2).map_or("", |m| m.as_str()),
        };
    }

    if let Some(caps) = CONTINUATION_PROMPT.captures(line) {
        return LineClass::Continuation {
            command: caps.get(1).map_or("", |m| m.as_str()),
        };
    }

    if heuristics {
        let trimmed = line.trim();
        if is_common_command(trimmed) {
            return LineClass::Heuristic { command: trimmed };
        }
    }

    LineClass::Output(line)
}

/// True when the trimmed line starts with `verb + space` or equals a verb
/// from the allow-list.
fn is_common_command(trimmed: &str) -> bool {
    match trimmed.split_once(' ') {
        Some((verb, _)) => COMMAND_VERBS.contains(verb),
        None => COMMAND_VERBS.contains(trimmed),
    }
}

/// Strip an anonymous prompt sigil (`$ ` or `# `) from a trimmed line. The
/// config extractor uses this so `$ pwd` / `$ cat file` transcripts without
/// a user@host segment still read as commands; it is not applied to general
/// line classification, where `# ` would swallow comment lines inside
/// captured file bodies.
pub(crate) fn strip_prompt_sigil(trimmed: &str) -> &str {
    trimmed
        .strip_prefix("$ ")
        .or_else(|| trimmed.strip_prefix("# "))
        .map(str::trim_start)
        .unwrap_or(trimmed)
}

/// Directory captures are used only when they carry real information; the
/// `~` placeholder is left unresolved on purpose.
pub(crate) fn usable_directory(directory: &str) -> Option<&str> {
    let directory = directory.trim();
    if directory.is_empty() || directory == "~" {
        None
    } else {
        Some(directory)
    }
}

/// An editor command recognized in a typed/pasted command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorInvocation<'a> {
    /// File argument, when one was given.
    pub target: Option<&'a str>,
}

/// Detect editor commands (vi, vim, nano, ...) so input surfaces can switch
/// to file-edit capture with the target filename pre-filled.
pub fn editor_invocation(command: &str) -> Option<EditorInvocation<'_>> {
    let trimmed = command.trim();
    EDITOR_COMMAND.captures(trimmed).map(|caps| EditorInvocation {
        target: caps.get(1).map(|m| m.as_str()),
    })
}
