use axum::http::StatusCode;
use logbridge_core::error_builder::ErrorBuilder;
use logbridge_core::problemdetails::Problem;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Request body is not a valid log batch: {0}")]
    MalformedBatch(String),

    #[error("Ingestion error: {0}")]
    Internal(String),
}

impl From<IngestError> for Problem {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::MalformedBatch(detail) => ErrorBuilder::new(StatusCode::BAD_REQUEST)
                .title("Invalid log batch")
                .detail(detail)
                .build(),
            IngestError::Internal(detail) => ErrorBuilder::new(StatusCode::INTERNAL_SERVER_ERROR)
                .title("Ingestion failed")
                .detail(detail)
                .build(),
        }
    }
}
