//! Chat endpoint types

use serde::{Deserialize, Serialize};

/// Body of `POST /chat`.
///
/// A missing `query` deserializes to an empty string so that it is
/// rejected with the same message as a blank one.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}
