use serde::{Deserialize, Serialize};

/// Who authored a message in the conversation. The system preamble is not a
/// conversation message; providers take it as a separate argument and prepend
/// it during wire conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Tool,
}
