use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::pincode::{PinDirectory, PinLookupError};
use super::service::{RegistrationService, SubmitError};
use super::store::RegistrationStore;
use super::validation::{Step1Payload, Step2Payload};

/// Router builder exposing the wizard's HTTP endpoints.
pub fn registration_router<S, P>(service: Arc<RegistrationService<S, P>>) -> Router
where
    S: RegistrationStore + 'static,
    P: PinDirectory + 'static,
{
    Router::new()
        .route("/health", get(health_handler))
        .route("/schema", get(schema_handler::<S, P>))
        .route("/pin/:pin_code", get(pin_handler::<S, P>))
        .route("/otp/send", post(otp_send_handler::<S, P>))
        .route("/validate/step1", post(validate_step1_handler::<S, P>))
        .route("/validate/step2", post(validate_step2_handler::<S, P>))
        .route("/submit", post(submit_handler::<S, P>))
        .with_state(service)
}

pub(crate) async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn schema_handler<S, P>(
    State(service): State<Arc<RegistrationService<S, P>>>,
) -> Response
where
    S: RegistrationStore + 'static,
    P: PinDirectory + 'static,
{
    Json(service.schema()).into_response()
}

pub(crate) async fn pin_handler<S, P>(
    State(service): State<Arc<RegistrationService<S, P>>>,
    Path(pin_code): Path<String>,
) -> Response
where
    S: RegistrationStore + 'static,
    P: PinDirectory + 'static,
{
    match service.resolve_pin(&pin_code).await {
        Ok(locality) => (StatusCode::OK, Json(locality)).into_response(),
        Err(PinLookupError::NotFound) => {
            let payload = json!({ "error": "PIN not found" });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(PinLookupError::Upstream(_)) => {
            let payload = json!({ "error": "PIN lookup failed" });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OtpSendRequest {
    #[serde(default)]
    pub(crate) mobile_number: String,
}

pub(crate) async fn otp_send_handler<S, P>(
    State(service): State<Arc<RegistrationService<S, P>>>,
    Json(request): Json<OtpSendRequest>,
) -> Response
where
    S: RegistrationStore + 'static,
    P: PinDirectory + 'static,
{
    match service.send_otp(&request.mobile_number) {
        Ok(delivery) => (StatusCode::OK, Json(delivery)).into_response(),
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn validate_step1_handler<S, P>(
    State(service): State<Arc<RegistrationService<S, P>>>,
    Json(payload): Json<Step1Payload>,
) -> Response
where
    S: RegistrationStore + 'static,
    P: PinDirectory + 'static,
{
    match service.validate_step1(payload) {
        Ok(_) => (StatusCode::OK, Json(json!({ "ok": true }))).into_response(),
        Err(errors) => {
            let payload = json!({ "errors": errors });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn validate_step2_handler<S, P>(
    State(service): State<Arc<RegistrationService<S, P>>>,
    Json(payload): Json<Step2Payload>,
) -> Response
where
    S: RegistrationStore + 'static,
    P: PinDirectory + 'static,
{
    match service.validate_step2(payload) {
        Ok(_) => (StatusCode::OK, Json(json!({ "ok": true }))).into_response(),
        Err(errors) => {
            let payload = json!({ "errors": errors });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SubmitRequest {
    #[serde(default)]
    pub(crate) step1: Step1Payload,
    #[serde(default)]
    pub(crate) step2: Step2Payload,
}

pub(crate) async fn submit_handler<S, P>(
    State(service): State<Arc<RegistrationService<S, P>>>,
    Json(request): Json<SubmitRequest>,
) -> Response
where
    S: RegistrationStore + 'static,
    P: PinDirectory + 'static,
{
    match service.submit(request.step1, request.step2) {
        Ok(record) => {
            let payload = json!({ "id": record.id });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Err(SubmitError::Rejected(rejection)) => {
            let payload = json!({
                "step1": rejection.step1,
                "step2": rejection.step2,
            });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        Err(SubmitError::Store(err)) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
