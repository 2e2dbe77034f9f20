use axum::{body::to_bytes, http::StatusCode, response::Response};
use brightbook_api::middleware::error_handling::{map_error, AppError};
use brightbook_core::errors::BookingError;
use pretty_assertions::assert_eq;
use serde_json::Value;

async fn body_of(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_error_handling_not_found() {
    // Create a not found error
    let error = BookingError::NotFound("Customer with ID 7 not found".to_string());

    // Map the error to a response
    let response = map_error(error);

    // Assert the status code and the JSON body
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_of(response).await["error"],
        "Resource not found: Customer with ID 7 not found"
    );
}

#[tokio::test]
async fn test_error_handling_validation() {
    let response = map_error(BookingError::Validation("select a start date".to_string()));

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_of(response).await["error"], "Validation error: select a start date");
}

#[tokio::test]
async fn test_error_handling_conflict() {
    let response = map_error(BookingError::Conflict("slot already taken".to_string()));

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_error_handling_expired_hold() {
    // A lapsed hold is gone for good, not merely in conflict
    let response = map_error(BookingError::Expired("hold ran out".to_string()));

    assert_eq!(response.status(), StatusCode::GONE);
}

#[tokio::test]
async fn test_error_handling_backend() {
    let response = map_error(BookingError::Backend(eyre::eyre!("connection refused")));

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_of(response).await["error"], "Backend error: connection refused");
}

#[tokio::test]
async fn test_error_handling_internal() {
    let error = BookingError::Internal(Box::new(std::io::Error::new(
        std::io::ErrorKind::Other,
        "Internal error",
    )));

    let response = map_error(error);

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_eyre_reports_become_backend_errors() {
    let error: AppError = eyre::eyre!("pool timed out").into();

    assert!(matches!(error.0, BookingError::Backend(_)));
    assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
