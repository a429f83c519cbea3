//! Decoding of the API's JSON envelope.
//!
//! Error bodies are `{status: "error", message, code?}`. The `code` is what
//! distinguishes an expired token from an invalid one, so it takes
//! precedence over the HTTP status.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use starlink_core::{ApiResponse, ErrorBody, ErrorCode};

use crate::error::SessionError;

/// Reads a response, returning the envelope's `data` (if any) on 2xx and a
/// classified error otherwise.
pub(crate) async fn read_envelope<T: DeserializeOwned>(
    response: Response,
) -> Result<Option<T>, SessionError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if status.is_success() {
        if bytes.is_empty() {
            return Ok(None);
        }
        let envelope: ApiResponse<T> = serde_json::from_slice(&bytes)
            .map_err(|e| SessionError::Decode(e.to_string()))?;
        return Ok(envelope.into_data());
    }

    Err(classify_error(status, &bytes))
}

/// Like [`read_envelope`] but `data` must be present.
pub(crate) async fn read_data<T: DeserializeOwned>(response: Response) -> Result<T, SessionError> {
    read_envelope(response)
        .await?
        .ok_or_else(|| SessionError::Decode("response has no data".to_string()))
}

/// Maps a non-2xx response to a [`SessionError`].
pub fn classify_error(status: StatusCode, body: &[u8]) -> SessionError {
    let parsed = serde_json::from_slice::<ErrorBody>(body).ok();
    let message = parsed
        .as_ref()
        .map(|b| b.message.clone())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });

    match parsed.and_then(|b| b.code) {
        Some(ErrorCode::TokenExpired) => SessionError::TokenExpired,
        Some(ErrorCode::TokenInvalid) => SessionError::TokenInvalid,
        Some(ErrorCode::TokenMissing) => SessionError::TokenMissing,
        Some(ErrorCode::InvalidCredentials) => SessionError::InvalidCredentials(message),
        _ => SessionError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expired_code_classified() {
        let body = br#"{"status":"error","message":"Token has expired","code":"token_expired"}"#;
        assert_eq!(
            classify_error(StatusCode::UNAUTHORIZED, body),
            SessionError::TokenExpired
        );
    }

    #[test]
    fn test_invalid_and_missing_codes_classified() {
        let invalid = br#"{"status":"error","message":"Invalid token","code":"token_invalid"}"#;
        let missing = br#"{"status":"error","message":"missing","code":"token_missing"}"#;
        assert_eq!(
            classify_error(StatusCode::UNAUTHORIZED, invalid),
            SessionError::TokenInvalid
        );
        assert_eq!(
            classify_error(StatusCode::UNAUTHORIZED, missing),
            SessionError::TokenMissing
        );
    }

    #[test]
    fn test_invalid_credentials_keep_message() {
        let body = br#"{"status":"error","message":"Invalid email or password","code":"invalid_credentials"}"#;
        assert_eq!(
            classify_error(StatusCode::UNAUTHORIZED, body),
            SessionError::InvalidCredentials("Invalid email or password".to_string())
        );
    }

    #[test]
    fn test_401_without_code_is_not_expired() {
        let body = br#"{"status":"error","message":"Unauthorized"}"#;
        assert!(matches!(
            classify_error(StatusCode::UNAUTHORIZED, body),
            SessionError::Api { status: 401, .. }
        ));
    }

    #[test]
    fn test_non_json_body_uses_reason_phrase() {
        assert_eq!(
            classify_error(StatusCode::BAD_GATEWAY, b"<html>"),
            SessionError::Api {
                status: 502,
                message: "Bad Gateway".to_string()
            }
        );
    }
}
