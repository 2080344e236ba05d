use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;
use uptime::{InvalidRecord, ParseRegionError, StoreError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    InvalidRecord(#[from] InvalidRecord),

    #[error(transparent)]
    InvalidRegion(#[from] ParseRegionError),

    #[error("malformed request body: {0}")]
    BadPayload(String),

    #[error("{0}")]
    StoreUnavailable(StoreError),
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::InvalidRecord(invalid) => ApiError::InvalidRecord(invalid),
            other => ApiError::StoreUnavailable(other),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRecord(_) | ApiError::InvalidRegion(_) | ApiError::BadPayload(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::StoreUnavailable(error) = self {
            tracing::error!("Request failed, probe store unavailable: {}", error);
        }
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let invalid: ApiError = StoreError::InvalidRecord(InvalidRecord::new("nope")).into();
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);

        let down: ApiError = StoreError::unavailable(anyhow::anyhow!("gone")).into();
        assert_eq!(down.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let region: ApiError = "mars".parse::<uptime::Region>().unwrap_err().into();
        assert_eq!(region.status_code(), StatusCode::BAD_REQUEST);
    }
}
