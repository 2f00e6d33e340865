//! Uniform JSON response envelope.
//!
//! Every business response carries an explicit `success` flag plus either a
//! `data` payload or a human-readable `error` string. Clients never have to
//! inspect the HTTP status to distinguish business outcomes; 4xx/5xx are
//! reserved for malformed requests, unknown routes and server faults.

use axum::Json;
use serde::Serialize;

use crate::models::Pagination;

/// The standard response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Payload for successful responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable error for failed responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Optional human-readable status message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful response with a payload.
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        })
    }

    /// Successful response with a payload and a status message.
    pub fn ok_with_message(data: T, message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
            message: Some(message.into()),
        })
    }
}

impl ApiResponse<()> {
    /// Successful response carrying only a status message.
    pub fn message(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            data: None,
            error: None,
            message: Some(message.into()),
        })
    }

    /// Failed response with a human-readable error.
    pub fn failure(error: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: None,
        })
    }
}

/// Envelope for paginated catalog listings.
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T: Serialize> ListResponse<T> {
    /// Successful paginated response.
    pub fn ok(data: Vec<T>, pagination: Pagination) -> Json<Self> {
        Json(Self {
            success: true,
            data,
            pagination,
        })
    }
}

/// Envelope for recommendation lists, tagged with the heuristic that
/// produced them.
#[derive(Debug, Serialize)]
pub struct RecommendationResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl<T: Serialize> RecommendationResponse<T> {
    /// Successful recommendation response.
    pub fn ok(data: Vec<T>, kind: &'static str) -> Json<Self> {
        Json(Self {
            success: true,
            data,
            kind,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_envelope_shape() {
        let Json(body) = ApiResponse::ok(vec![1, 2, 3]);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_failure_envelope_shape() {
        let Json(body) = ApiResponse::failure("Product not found");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Product not found");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_recommendation_envelope_kind() {
        let Json(body) = RecommendationResponse::ok(vec![1], "trending");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["type"], "trending");
    }
}
