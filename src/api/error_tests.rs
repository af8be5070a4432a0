//! Unit tests for API error types

#[cfg(test)]
mod tests {
    use crate::api::error::{ApiError, ErrorKind};

    #[test]
    fn test_bad_request_message() {
        let error = ApiError::BadRequest("offset must be a positive integer".to_string());
        assert_eq!(
            error.user_message(),
            "API Error: offset must be a positive integer"
        );
    }

    #[test]
    fn test_permission_denied_message() {
        assert_eq!(
            ApiError::PermissionDenied.to_string(),
            "You haven't got permission to view this. Please log in again."
        );
    }

    #[test]
    fn test_server_error_message() {
        assert_eq!(ApiError::ServerError.to_string(), "Internal server error");
    }

    #[test]
    fn test_unrecognized_status_message() {
        let error = ApiError::UnrecognizedStatus {
            code: 404,
            reason: "Not Found".to_string(),
        };
        assert_eq!(error.to_string(), "Unrecognised status code: Not Found (404)");
    }

    #[test]
    fn test_malformed_response_hides_detail() {
        let error = ApiError::malformed("missing field `items`");
        assert_eq!(error.user_message(), "Unexpected response from the server");

        match error {
            ApiError::MalformedResponse { detail } => {
                assert_eq!(detail, "missing field `items`");
            }
            _ => panic!("Expected MalformedResponse variant"),
        }
    }

    #[test]
    fn test_transport_message_is_passed_through() {
        let error = ApiError::Transport("connection refused".to_string());
        assert_eq!(error.user_message(), "connection refused");
    }

    #[test]
    fn test_kind_matches_variant() {
        let cases = vec![
            (ApiError::BadRequest(String::new()), ErrorKind::BadRequest),
            (ApiError::PermissionDenied, ErrorKind::PermissionDenied),
            (ApiError::ServerError, ErrorKind::ServerError),
            (
                ApiError::UnrecognizedStatus {
                    code: 502,
                    reason: "Bad Gateway".into(),
                },
                ErrorKind::UnrecognizedStatus,
            ),
            (ApiError::malformed("x"), ErrorKind::MalformedResponse),
            (ApiError::Transport("x".into()), ErrorKind::Transport),
            (ApiError::Unsupported("x".into()), ErrorKind::Unsupported),
        ];

        for (error, kind) in cases {
            assert_eq!(error.kind(), kind);
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ApiError>();
    }
}
