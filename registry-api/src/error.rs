use common_utils::Logged;
use poem::{error::ResponseError, http::StatusCode, web::Json, IntoResponse, Response};
use registry_provider::RegistryError;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiError {
    #[error("{0}")]
    NotFoundError(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    InternalError(String),
}

impl ResponseError for ApiError {
    fn status(&self) -> poem::http::StatusCode {
        match &self {
            ApiError::NotFoundError(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /**
     * The message goes out as a JSON string, e.g. `"customer not found"`
     */
    fn as_response(&self) -> Response
    where
        Self: std::error::Error + Send + Sync + 'static,
    {
        let mut resp = Json(self.to_string()).into_response();
        resp.set_status(self.status());
        resp
    }
}

impl From<RegistryError> for ApiError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::InvalidId(_) => ApiError::BadRequest("invalid id".to_string()),
            RegistryError::InvalidContactNo(_) => {
                ApiError::BadRequest("invalid contact number".to_string())
            }
            RegistryError::CustomerExists(_) => ApiError::Conflict("customer exists".to_string()),
            RegistryError::CustomerNotFound(_) => {
                ApiError::NotFoundError("customer not found".to_string())
            }
            RegistryError::DeliveryFailed(_, _) => ApiError::InternalError(format!("{:?}", e)),
            RegistryError::ExternalStorageError(_) => {
                ApiError::InternalError("internal server error".to_string())
            }
        }
    }
}

pub trait IntoApiResult<T> {
    fn map_api_error(self) -> Result<T, ApiError>;
}

impl<T> IntoApiResult<T> for Result<T, RegistryError> {
    fn map_api_error(self) -> Result<T, ApiError> {
        self.log().map_err(|e| e.into())
    }
}

#[cfg(test)]
mod tests {
    use poem::{error::ResponseError, http::StatusCode, web::Json, IntoResponse, Response};
    use registry_provider::RegistryError;

    use super::{ApiError, IntoApiResult};

    #[test]
    fn test_status() {
        let cases = [
            (RegistryError::InvalidId("hsv".to_string()), StatusCode::BAD_REQUEST),
            (RegistryError::InvalidContactNo(999), StatusCode::BAD_REQUEST),
            (RegistryError::CustomerExists("hs".to_string()), StatusCode::CONFLICT),
            (RegistryError::CustomerNotFound("zz".to_string()), StatusCode::NOT_FOUND),
            (
                RegistryError::ExternalStorageError("gone".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (e, status) in cases {
            assert_eq!(ApiError::from(e).status(), status);
        }
    }

    #[tokio::test]
    async fn test_json_body() {
        let resp = ApiError::NotFoundError("customer not found".to_string()).as_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(resp
            .content_type()
            .unwrap_or_default()
            .starts_with("application/json"));
        assert_eq!(
            resp.into_body().into_string().await.unwrap(),
            r#""customer not found""#
        );
    }

    #[test]
    fn test_storage_details_are_hidden() {
        let r: Result<(), RegistryError> =
            Err(RegistryError::ExternalStorageError("password=secret".to_string()));
        assert_eq!(
            r.map_api_error(),
            Err(ApiError::InternalError("internal server error".to_string()))
        );
    }
}
