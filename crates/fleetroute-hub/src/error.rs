//! Error types for the HTTP API.
//!
//! [`ApiError`] converts into an Axum response with a JSON body
//! `{"error": <message>, "status": <code>}`.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fleetroute_core::CoreError;

/// Errors returned by the REST handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested map or order does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request could not be served as given.
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MapNotLoaded(_) | CoreError::OrderNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            CoreError::Graph(_) | CoreError::MapFile { .. } | CoreError::MapParse { .. } => {
                Self::BadRequest(err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use fleetroute_graph::GraphError;
    use fleetroute_types::{MapId, NodeId, OrderId};

    use super::*;

    #[test]
    fn core_errors_map_to_status() {
        let cases = [
            (CoreError::MapNotLoaded(MapId::from("m")), StatusCode::NOT_FOUND),
            (CoreError::OrderNotFound(OrderId::from("O1")), StatusCode::NOT_FOUND),
            (
                CoreError::Graph(GraphError::UnknownNode(NodeId::from("Q"))),
                StatusCode::BAD_REQUEST,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }
}
