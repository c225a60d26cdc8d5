use serde::{Deserialize, Serialize};

/// The `error` object Yahoo embeds next to `result` in every envelope.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ApiErrorBody {
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
}
