//! Remote administrative API access
//!
//! This module owns everything between a resource adapter and the wire:
//! the [`HttpTransport`] seam, the status-to-error mapping and typed body
//! decoding.
//!
//! # Status mapping
//!
//! | Status            | Result                                  |
//! |-------------------|-----------------------------------------|
//! | 200               | body decoded, `MalformedResponse` if it doesn't fit |
//! | 400               | `BadRequest` with the body's `message`  |
//! | 403               | `PermissionDenied`                      |
//! | 500               | `ServerError`                           |
//! | anything else     | `UnrecognizedStatus`                    |

pub mod error;
pub mod transport;

pub use error::{ApiError, ErrorKind};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, ReqwestTransport};

use serde::de::DeserializeOwned;

const MAX_ERROR_BODY_CHARS: usize = 200;

/// Map a raw response onto the error taxonomy and decode the body
///
/// # Errors
///
/// Returns the `ApiError` variant matching the status, or
/// `MalformedResponse` when a 200 body does not deserialize into `T`.
pub fn decode_response<T: DeserializeOwned>(response: ApiResponse) -> Result<T, ApiError> {
    match response.status {
        200 => serde_json::from_str(&response.body).map_err(ApiError::malformed),
        400 => Err(ApiError::BadRequest(bad_request_message(&response.body))),
        403 => Err(ApiError::PermissionDenied),
        500 => Err(ApiError::ServerError),
        code => Err(ApiError::UnrecognizedStatus {
            code,
            reason: response.reason,
        }),
    }
}

fn bad_request_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            json.get("message")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| truncate_for_error(body))
}

fn truncate_for_error(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_ERROR_BODY_CHARS {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
    out.push('…');
    out
}

/// Join an endpoint path onto a source base URL
///
/// Absolute endpoint URLs are returned unchanged. The result always ends
/// with a slash so detail paths can be appended directly.
#[must_use]
pub fn endpoint_url(base_url: &str, endpoint: &str) -> String {
    let joined = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    };

    if joined.ends_with('/') {
        joined
    } else {
        format!("{joined}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Meta {
        total_count: u64,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Listing {
        meta: Meta,
    }

    #[test]
    fn test_decode_success() {
        let listing: Listing =
            decode_response(ApiResponse::ok(r#"{"meta": {"total_count": 3}}"#)).unwrap();
        assert_eq!(listing.meta.total_count, 3);
    }

    #[test]
    fn test_other_success_status_is_unrecognized() {
        let response = ApiResponse::with_status(203, "Non-Authoritative Information", r#"{"meta": {"total_count": 0}}"#);
        assert_eq!(
            decode_response::<Listing>(response).unwrap_err(),
            ApiError::UnrecognizedStatus {
                code: 203,
                reason: "Non-Authoritative Information".to_string()
            }
        );
    }

    #[test]
    fn test_decode_missing_field_is_malformed() {
        let result = decode_response::<Listing>(ApiResponse::ok(r#"{"items": []}"#));
        assert!(matches!(result, Err(ApiError::MalformedResponse { .. })));
    }

    #[test]
    fn test_decode_invalid_json_is_malformed() {
        let result = decode_response::<Listing>(ApiResponse::ok("<html>login</html>"));
        assert!(matches!(result, Err(ApiError::MalformedResponse { .. })));
    }

    #[test]
    fn test_bad_request_uses_message_field() {
        let response = ApiResponse::with_status(
            400,
            "Bad Request",
            r#"{"message": "limit cannot be higher than 20"}"#,
        );
        let result = decode_response::<Listing>(response);
        assert_eq!(
            result.unwrap_err(),
            ApiError::BadRequest("limit cannot be higher than 20".to_string())
        );
    }

    #[test]
    fn test_bad_request_without_json_uses_body() {
        let response = ApiResponse::with_status(400, "Bad Request", "nope");
        let result = decode_response::<Listing>(response);
        assert_eq!(result.unwrap_err(), ApiError::BadRequest("nope".to_string()));
    }

    #[test]
    fn test_fixed_statuses() {
        let forbidden = ApiResponse::with_status(403, "Forbidden", "");
        assert_eq!(
            decode_response::<Listing>(forbidden).unwrap_err(),
            ApiError::PermissionDenied
        );

        let server = ApiResponse::with_status(500, "Internal Server Error", "");
        assert_eq!(
            decode_response::<Listing>(server).unwrap_err(),
            ApiError::ServerError
        );
    }

    #[test]
    fn test_other_status_is_unrecognized() {
        let response = ApiResponse::with_status(404, "Not Found", "");
        assert_eq!(
            decode_response::<Listing>(response).unwrap_err(),
            ApiError::UnrecognizedStatus {
                code: 404,
                reason: "Not Found".to_string()
            }
        );
    }

    #[test]
    fn test_truncate_long_body() {
        let body = "x".repeat(500);
        let truncated = truncate_for_error(&body);
        assert_eq!(truncated.chars().count(), MAX_ERROR_BODY_CHARS + 1);
        assert!(truncated.ends_with('…'));
    }

    #[test]
    fn test_endpoint_url_joins_relative_path() {
        assert_eq!(
            endpoint_url("https://source.example.com/wagtail-transfer/", "api/chooser/pages/"),
            "https://source.example.com/wagtail-transfer/api/chooser/pages/"
        );
        assert_eq!(
            endpoint_url("https://source.example.com", "/api/chooser/models"),
            "https://source.example.com/api/chooser/models/"
        );
    }

    #[test]
    fn test_endpoint_url_keeps_absolute_endpoint() {
        assert_eq!(
            endpoint_url("https://ignored.example.com/", "https://proxy.example.com/pages/"),
            "https://proxy.example.com/pages/"
        );
    }
}
