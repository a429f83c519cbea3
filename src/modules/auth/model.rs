use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Success envelope that carries only a message.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "success")]
    pub status: String,
    #[schema(example = "Logged out successfully")]
    pub message: String,
}
