use std::path::PathBuf;

use serde::Serialize;

use super::session::SessionMeta;

/// CSS-style display class attached to each rendered entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RoleClass {
    #[serde(rename = "role-user")]
    User,
    #[serde(rename = "role-assistant")]
    Assistant,
    #[serde(rename = "role-system")]
    System,
    #[serde(rename = "role-tool")]
    Tool,
    #[serde(rename = "role-error")]
    Error,
    #[serde(rename = "role-unknown")]
    Unknown,
}

impl RoleClass {
    pub fn for_role(role: &str) -> Self {
        match role.to_ascii_lowercase().as_str() {
            "user" => Self::User,
            "assistant" => Self::Assistant,
            "system" => Self::System,
            "tool" => Self::Tool,
            "error" => Self::Error,
            _ => Self::Unknown,
        }
    }
}

/// One display-ready item of a session timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationEntry {
    /// 1-based line number in the source file
    pub line: usize,
    pub timestamp: String,
    /// Envelope type, e.g. `response_item`
    pub entry_type: String,
    /// Payload type, e.g. `message` or `reasoning`
    pub subtype: String,
    pub role: String,
    pub title: String,
    pub content: String,
    pub raw: String,
    pub class: RoleClass,
}

impl ConversationEntry {
    pub fn is_user_message(&self) -> bool {
        self.subtype == "message" && self.role == "user"
    }

    /// Entries with the same (type, subtype, role) are merged when adjacent
    pub fn same_group(&self, other: &ConversationEntry) -> bool {
        self.entry_type == other.entry_type
            && self.subtype == other.subtype
            && self.role == other.role
    }
}

/// A fully parsed session file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    pub path: PathBuf,
    pub meta: Option<SessionMeta>,
    pub entries: Vec<ConversationEntry>,
}
