// SPDX-FileCopyrightText: 2026 Trundle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response decoding and error mapping shared by every service call.
//!
//! Maps the three wire-level failure classes onto [`TrundleError`]:
//! no response at all is `Transport`, an error status is `Rejected` with
//! the service's own message preserved verbatim, and an unparsable success
//! body is `Malformed`.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use trundle_core::TrundleError;

/// Error body shape used by the delivery services. Either field may carry
/// the human-readable message depending on the service.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Maps a reqwest send failure (no response) to a transport error.
pub fn map_send_error(e: reqwest::Error) -> TrundleError {
    TrundleError::Transport {
        message: format!("HTTP request failed: {e}"),
        source: Some(Box::new(e)),
    }
}

/// Consumes an error response and builds the `Rejected` variant.
///
/// The service message is extracted from the JSON body when present;
/// otherwise the raw body text is carried through.
pub async fn rejection(response: reqwest::Response) -> TrundleError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .ok()
        .and_then(|b| b.message.or(b.error))
        .unwrap_or(body);
    TrundleError::Rejected { status, message }
}

/// Parses a success body, mapping serde failures to `Malformed`.
pub fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, TrundleError> {
    serde_json::from_str(body).map_err(|e| TrundleError::Malformed {
        message: format!("failed to parse response body: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_json_maps_to_malformed() {
        let result: Result<Vec<String>, _> = parse_json("not json at all");
        match result {
            Err(TrundleError::Malformed { .. }) => {}
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn error_body_prefers_message_field() {
        let body: ApiErrorBody =
            serde_json::from_str(r#"{"message":"Invalid credentials","error":"ignored"}"#)
                .unwrap();
        assert_eq!(body.message.or(body.error).as_deref(), Some("Invalid credentials"));
    }

    #[test]
    fn error_body_falls_back_to_error_field() {
        let body: ApiErrorBody = serde_json::from_str(r#"{"error":"Order not found"}"#).unwrap();
        assert_eq!(body.message.or(body.error).as_deref(), Some("Order not found"));
    }
}
