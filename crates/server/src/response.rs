//! The JSON response envelope shared by every endpoint.
//!
//! Every response body is an object with a boolean `success` field. Success
//! responses carry `data` (and `currentPage`/`lastPage` on paginated lists);
//! failures carry a `message` string. A few informational successes, such as
//! sign-up, carry both.

use axum::Json;
use axum::http::StatusCode;
use serde::Serialize;

/// The envelope every endpoint answers with.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_page: Option<u64>,
}

/// 200 with `data`.
pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<Envelope<T>>) {
    with_data(StatusCode::OK, data)
}

/// 201 with `data`.
pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<Envelope<T>>) {
    with_data(StatusCode::CREATED, data)
}

/// Success with no payload, used by delete endpoints.
pub fn ok_empty() -> (StatusCode, Json<Envelope<()>>) {
    (
        StatusCode::OK,
        Json(Envelope {
            success: true,
            data: None,
            message: None,
            current_page: None,
            last_page: None,
        }),
    )
}

/// Success with both an informational `message` and `data` (sign-up).
pub fn with_message<T: Serialize>(
    status: StatusCode,
    message: &str,
    data: T,
) -> (StatusCode, Json<Envelope<T>>) {
    (
        status,
        Json(Envelope {
            success: true,
            data: Some(data),
            message: Some(message.to_owned()),
            current_page: None,
            last_page: None,
        }),
    )
}

/// 200 with `data` plus pagination cursors.
pub fn page<T: Serialize>(
    data: T,
    current_page: u64,
    last_page: u64,
) -> (StatusCode, Json<Envelope<T>>) {
    (
        StatusCode::OK,
        Json(Envelope {
            success: true,
            data: Some(data),
            message: None,
            current_page: Some(current_page),
            last_page: Some(last_page),
        }),
    )
}

/// Failure with a `message`. Every error answer goes through here.
pub fn fail(status: StatusCode, message: &str) -> (StatusCode, Json<Envelope<()>>) {
    (
        status,
        Json(Envelope {
            success: false,
            data: None,
            message: Some(message.to_owned()),
            current_page: None,
            last_page: None,
        }),
    )
}

fn with_data<T: Serialize>(status: StatusCode, data: T) -> (StatusCode, Json<Envelope<T>>) {
    (
        status,
        Json(Envelope {
            success: true,
            data: Some(data),
            message: None,
            current_page: None,
            last_page: None,
        }),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_omits_failure_fields() {
        let (status, Json(body)) = ok(vec![1, 2, 3]);
        assert_eq!(status, StatusCode::OK);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
        assert!(json.get("message").is_none());
        assert!(json.get("currentPage").is_none());
    }

    #[test]
    fn test_page_envelope_uses_camel_case_cursors() {
        let (_, Json(body)) = page(Vec::<u8>::new(), 2, 5);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["currentPage"], 2);
        assert_eq!(json["lastPage"], 5);
    }

    #[test]
    fn test_fail_envelope() {
        let (status, Json(body)) = fail(StatusCode::FORBIDDEN, "Forbidden");
        assert_eq!(status, StatusCode::FORBIDDEN);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Forbidden");
        assert!(json.get("data").is_none());
    }
}
