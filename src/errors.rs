use axum::{http::StatusCode, response::IntoResponse, Json};
use tracing::error;

use crate::JsonResponse;

#[derive(Debug)]
pub enum RequestError {
    NotFound(&'static str),
    NotAuthorized(&'static str),
    Forbidden,
    BadRequest(&'static str),
    RunTimeError(&'static str),
    Upstream(StatusCode),
    ServerError,
    DatabaseError(sqlx::Error),
}

#[derive(serde::Serialize, serde::Deserialize)]
pub struct RequestErrorJson {
    pub error: String,
}

impl RequestErrorJson {
    pub fn new(error: &str) -> RequestErrorJson {
        RequestErrorJson {
            error: error.to_string(),
        }
    }
}

impl From<sqlx::Error> for RequestError {
    fn from(value: sqlx::Error) -> Self {
        Self::DatabaseError(value)
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> axum::response::Response {
        self.to_json_response().into_response()
    }
}

impl RequestError {
    pub fn to_json_response(&self) -> JsonResponse<RequestErrorJson> {
        let (status_code, json) = match self {
            RequestError::NotFound(message) => {
                (StatusCode::NOT_FOUND, RequestErrorJson::new(message))
            }
            RequestError::NotAuthorized(message) => {
                (StatusCode::UNAUTHORIZED, RequestErrorJson::new(message))
            }
            RequestError::Forbidden => (StatusCode::FORBIDDEN, RequestErrorJson::new("Forbidden")),
            RequestError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, RequestErrorJson::new(message))
            }
            RequestError::RunTimeError(message) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                RequestErrorJson::new(message),
            ),
            RequestError::Upstream(status) => {
                (*status, RequestErrorJson::new("Assistant request failed"))
            }
            RequestError::ServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                RequestErrorJson::new("Internal Server Error"),
            ),
            RequestError::DatabaseError(e) => {
                error!("database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    RequestErrorJson::new("Internal Server Error"),
                )
            }
        };
        (status_code, Json(json))
    }
}
