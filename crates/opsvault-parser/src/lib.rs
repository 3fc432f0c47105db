pub mod capture;
pub mod classify;
pub mod filetype;
pub mod segmenter;

pub use capture::parse_config_transcript;
pub use classify::{classify, editor_invocation, EditorInvocation, LineClass, COMMON_COMMANDS};
pub use filetype::detect_type;
pub use segmenter::parse_command_log;
