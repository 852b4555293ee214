pub mod environment;
pub mod paths;
pub mod terminal;

pub use environment::default_sessions_dir;
pub use paths::{SESSION_FILE_SUFFIX, expand_home, format_path_with_tilde, split_session_path};
pub use terminal::sanitize_for_terminal;
