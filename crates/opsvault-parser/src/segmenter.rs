use crate::classify::{classify, usable_directory, LineClass};
use opsvault_common::model::new_id;
use opsvault_common::parsed::{ParseMode, ParsedLogEntry};

/// Segment a pasted terminal transcript into command/output entries.
///
/// Total function: any input, including empty or binary-looking text,
/// produces a (possibly empty) list.
pub fn parse_command_log(raw: &str, mode: ParseMode) -> Vec<ParsedLogEntry> {
    let mut state = SegmentState::default();
    for line in raw.lines() {
        match mode {
            ParseMode::Auto => state.step_auto(line),
            ParseMode::Lines => state.step_lines(line),
        }
    }
    state.flush();
    state.entries
}

/// Running state for one segmentation pass: the pending command, its output
/// buffer, and the sticky prompt context.
#[derive(Debug, Default)]
struct SegmentState {
    command: Option<String>,
    output: Vec<String>,
    user: Option<String>,
    directory: Option<String>,
    entries: Vec<ParsedLogEntry>,
}

impl SegmentState {
    /// Transition for `auto` mode (allow-list heuristics on).
    fn step_auto(&mut self, line: &str) {
        // A pending backslash-terminated command absorbs the next bare line,
        // whether or not it looks like a command itself.
        if self.join_continuation(line) {
            return;
        }

        match classify(line, true) {
            LineClass::Prompt {
                user,
                directory,
                command,
            } => {
                self.flush();
                self.set_context(user, directory);
                self.start(command);
            }
            LineClass::Context { user, directory } => self.set_context(user, directory),
            LineClass::Continuation { command } | LineClass::Heuristic { command } => {
                self.flush();
                self.start(command);
            }
            LineClass::Output(text) => {
                if self.command.is_some() {
                    self.output.push(text.to_string());
                }
            }
        }
    }

    /// Transition for `lines` mode: every non-prompt, non-empty line is its
    /// own command and nothing is treated as output.
    fn step_lines(&mut self, line: &str) {
        match classify(line, false) {
            LineClass::Prompt {
                user,
                directory,
                command,
            } => {
                self.set_context(user, directory);
                self.emit(command);
            }
            LineClass::Context { user, directory } => self.set_context(user, directory),
            LineClass::Continuation { command } => self.emit(command),
            LineClass::Heuristic { command } => self.emit(command),
            LineClass::Output(text) => self.emit(text),
        }
    }

    /// Fold a line into a pending backslash-terminated command. Returns true
    /// when the line was consumed.
    fn join_continuation(&mut self, line: &str) -> bool {
        let pending = match &self.command {
            Some(cmd) if cmd.ends_with('\\') => cmd,
            _ => return false,
        };
        if line.trim().is_empty() {
            return false;
        }
        // Explicit prompt syntax always delimits a new command.
        if !matches!(
            classify(line, true),
            LineClass::Output(_) | LineClass::Heuristic { .. }
        ) {
            return false;
        }

        let mut joined = pending[..pending.len() - 1].trim_end().to_string();
        joined.push(' ');
        joined.push_str(line.trim());
        self.command = Some(joined);
        true
    }

    fn set_context(&mut self, user: &str, directory: &str) {
        if !user.is_empty() {
            self.user = Some(user.to_string());
        }
        if let Some(dir) = usable_directory(directory) {
            self.directory = Some(dir.to_string());
        }
    }

    /// Begin a new pending command. An empty capture (prompt with no command
    /// text) leaves no command pending.
    fn start(&mut self, command: &str) {
        let trimmed = command.trim();
        self.command = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }

    /// Emit a command immediately with no output (`lines` mode).
    fn emit(&mut self, command: &str) {
        let command = strip_interrupt(command.trim());
        if command.is_empty() {
            return;
        }
        self.entries.push(ParsedLogEntry {
            id: new_id(),
            command,
            output: String::new(),
            user: self.user.clone(),
            directory: self.directory.clone(),
        });
    }

    /// Close the pending command, if any, into an entry. Output trimming and
    /// `^C` stripping happen here so every exit path agrees.
    fn flush(&mut self) {
        if let Some(pending) = self.command.take() {
            let command = strip_interrupt(&pending);
            if !command.is_empty() {
                self.entries.push(ParsedLogEntry {
                    id: new_id(),
                    command,
                    output: self.output.join("\n").trim().to_string(),
                    user: self.user.clone(),
                    directory: self.directory.clone(),
                });
            }
        }
        self.output.clear();
    }
}

/// Drop a trailing `^C` interrupt marker from a captured command.
fn strip_interrupt(command: &str) -> String {
    match command.strip_suffix("^C") {
        Some(rest) => rest.trim_end().to_string(),
        None => command.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_starts_and_flush_closes() {
        let mut state = SegmentState::default();
        state.step_auto("[bob@host /var/www]$ ls -la");
        assert_eq!(state.command.as_deref(), Some("ls -la"));
        assert!(state.entries.is_empty());

        state.step_auto("total 0");
        state.flush();
        assert_eq!(state.entries.len(), 1);
        assert_eq!(state.entries[0].output, "total 0");
    }

    #[test]
    fn context_line_updates_without_flushing() {
        let mut state = SegmentState::default();
        state.step_auto("[bob@host /var/www]$ sleep 100");
        state.step_auto("[bob@host /tmp][feature]");
        // Still pending: a context line never closes the running command.
        assert_eq!(state.command.as_deref(), Some("sleep 100"));
        assert_eq!(state.directory.as_deref(), Some("/tmp"));
    }

    #[test]
    fn interrupt_marker_is_stripped() {
        assert_eq!(strip_interrupt("tail -f app.log ^C"), "tail -f app.log");
        assert_eq!(strip_interrupt("tail -f app.log"), "tail -f app.log");
    }

    #[test]
    fn backslash_joins_even_non_verbs() {
        let mut state = SegmentState::default();
        state.step_auto("sudo apt install \\");
        state.step_auto("--no-install-recommends nginx");
        assert_eq!(
            state.command.as_deref(),
            Some("sudo apt install --no-install-recommends nginx")
        );
    }

    #[test]
    fn prompt_breaks_a_dangling_continuation() {
        let mut state = SegmentState::default();
        state.step_auto("sudo apt install \\");
        state.step_auto("[bob@host /]$ pwd");
        assert_eq!(state.command.as_deref(), Some("pwd"));
        // The half-finished command still became an entry.
        assert_eq!(state.entries.len(), 1);
    }
}
