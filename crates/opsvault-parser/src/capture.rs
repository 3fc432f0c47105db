use crate::classify::{classify, strip_prompt_sigil, usable_directory, LineClass};
use crate::filetype::detect_type;
use opsvault_common::model::new_id;
use opsvault_common::parsed::ParsedConfigEntry;

/// Extract `pwd` / `cat <path>` request-response pairs from a transcript,
/// one entry per captured file body.
///
/// Total function, like the command-log segmenter: unrecognized input means
/// an empty list, never an error.
pub fn parse_config_transcript(raw: &str) -> Vec<ParsedConfigEntry> {
    let mut state = CaptureState::default();
    for line in raw.lines() {
        state.step(line);
    }
    state.flush();
    state.entries
}

#[derive(Debug, Default)]
struct CaptureState {
    directory: Option<String>,
    file: Option<String>,
    content: Vec<String>,
    expecting_pwd_output: bool,
    entries: Vec<ParsedConfigEntry>,
}

impl CaptureState {
    fn step(&mut self, line: &str) {
        let trimmed = line.trim();

        let command = match classify(line, false) {
            LineClass::Prompt {
                directory, command, ..
            } => {
                // Any full prompt ends the file body, command or not.
                self.flush();
                self.set_directory(directory);
                Some(command.trim().to_string())
            }
            LineClass::Context { directory, .. } => {
                self.flush();
                self.set_directory(directory);
                return;
            }
            LineClass::Continuation { command } => {
                self.flush();
                Some(command.trim().to_string())
            }
            LineClass::Heuristic { .. } | LineClass::Output(_) => {
                // Bare `pwd` / `cat` lines, with or without an anonymous
                // `$ `/`# ` prompt sigil.
                let candidate = strip_prompt_sigil(trimmed);
                if candidate == "pwd" || candidate.starts_with("cat ") {
                    self.flush();
                    Some(candidate.to_string())
                } else {
                    None
                }
            }
        };

        match command {
            Some(cmd) if !cmd.is_empty() => self.run_command(&cmd),
            _ => self.consume_line(line, trimmed),
        }
    }

    /// React to a recognized command line.
    fn run_command(&mut self, command: &str) {
        if command == "pwd" {
            self.expecting_pwd_output = true;
        } else if let Some(rest) = command.strip_prefix("cat ") {
            self.expecting_pwd_output = false;
            // First whitespace-delimited token; `cat` with no argument
            // starts no capture at all.
            if let Some(target) = rest.split_whitespace().next() {
                self.file = Some(target.to_string());
            }
        } else {
            // Some other command: whatever file body was open has ended.
            self.expecting_pwd_output = false;
            self.flush();
        }
    }

    /// React to a non-command line: either the one-shot `pwd` answer or file
    /// content.
    fn consume_line(&mut self, line: &str, trimmed: &str) {
        if self.expecting_pwd_output {
            if trimmed.starts_with('/') {
                self.directory = Some(trimmed.to_string());
            }
            self.expecting_pwd_output = false;
        } else if self.file.is_some() {
            self.content.push(line.to_string());
        }
    }

    fn set_directory(&mut self, directory: &str) {
        if let Some(dir) = usable_directory(directory) {
            self.directory = Some(dir.to_string());
        }
    }

    /// Close the in-progress capture into an entry. Captures that collected
    /// no content lines produce nothing.
    fn flush(&mut self) {
        if let Some(file) = self.file.take() {
            if !self.content.is_empty() {
                let path = resolve_path(&file, self.directory.as_deref());
                let file_type = detect_type(&path).to_string();
                self.entries.push(ParsedConfigEntry {
                    id: new_id(),
                    path,
                    content: self.content.join("\n").trim().to_string(),
                    file_type,
                });
            }
        }
        self.content.clear();
    }
}

/// Join a relative `cat` target to the known working directory. Resolution
/// is best-effort: with no directory context the bare name is kept.
fn resolve_path(file: &str, directory: Option<&str>) -> String {
    if file.starts_with('/') {
        return file.to_string();
    }
    match directory {
        Some(dir) => format!("{}/{}", dir.trim_end_matches('/'), file),
        None => file.to_string(),
    }
}
