//! JSON response envelope shared by the server and the session client.
//!
//! Success bodies look like `{"status": "success", "message"?: .., "data"?: ..}`
//! and error bodies like `{"status": "error", "message": .., "code"?: ..,
//! "errors"?: ..}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ErrorCode;

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_ERROR: &str = "error";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            message: None,
            data: Some(data),
        }
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            message: Some(message.into()),
            data: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub status: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "token_expired")]
    pub code: Option<ErrorCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub errors: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>, code: Option<ErrorCode>) -> Self {
        Self {
            status: STATUS_ERROR.to_string(),
            message: message.into(),
            code,
            errors: None,
        }
    }
}

/// `200 OK` with `data` set.
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}

/// A success envelope that carries only a message.
pub fn message_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ApiResponse::message(message))).into_response()
}
