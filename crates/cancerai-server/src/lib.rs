//! HTTP surface for the prediction services.
//!
//! Transport only: every route either returns static data or hands the
//! request body to [`PredictionContext`] on the blocking pool.

use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use cancerai_ai::{
    ClassifierError, DrugResponseReport, ErrorKind, PredictionContext, PredictionError,
    SurvivalReport,
};
use cancerai_core::reference::{CANCER_TYPES, STAGES, TREATMENTS};
use cancerai_core::{DRUG_RESPONSE_MODEL, Field, PatientRecord, SURVIVAL_MODEL};
use serde::Serialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

/// Version of the HTTP API contract, independent of the crate version.
pub const API_VERSION: &str = "1.0.0";
pub const API_AUTHOR: &str = "Sibel Senturk";

/// Build the application router over a shared prediction context.
pub fn router(ctx: PredictionContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/predict/survival", post(predict_survival))
        .route("/predict/drug-response", post(predict_drug_response))
        .route("/cancer-types", get(cancer_types))
        .route("/stages", get(stages))
        .route("/treatments", get(treatments))
        .layer(cors)
        .with_state(ctx)
}

/// Serve until the listener fails.
pub async fn serve(listener: TcpListener, ctx: PredictionContext) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "cancerai listening");
    }
    axum::serve(listener, router(ctx)).await
}

async fn home() -> Json<Value> {
    Json(json!({
        "name": "CancerAI API",
        "version": API_VERSION,
        "author": API_AUTHOR,
        "description": "AI-powered cancer survival prediction API",
        "endpoints": {
            "/": "API information",
            "/health": "Health check",
            "/predict/survival": "Predict 5-year survival",
            "/predict/drug-response": "Predict drug response",
            "/cancer-types": "Supported cancer types",
            "/stages": "Cancer stages",
            "/treatments": "Treatment options"
        }
    }))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "models_loaded": true,
        "survival_model": SURVIVAL_MODEL.summary,
        "drug_model": DRUG_RESPONSE_MODEL.summary,
    }))
}

async fn cancer_types() -> Json<Value> {
    Json(json!({ "cancer_types": CANCER_TYPES }))
}

async fn stages() -> Json<Value> {
    Json(json!({ "stages": STAGES }))
}

async fn treatments() -> Json<Value> {
    Json(json!({ "treatments": TREATMENTS }))
}

async fn predict_survival(
    State(ctx): State<PredictionContext>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SurvivalReport>, ApiError> {
    let Json(body) = body?;
    let record = PatientRecord::from_value(body);
    let report = run_blocking(move || ctx.predict_survival(&record)).await?;
    Ok(Json(report))
}

async fn predict_drug_response(
    State(ctx): State<PredictionContext>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<DrugResponseReport>, ApiError> {
    let Json(body) = body?;
    let record = PatientRecord::from_value(body);
    let report = run_blocking(move || ctx.predict_drug_response(&record)).await?;
    Ok(Json(report))
}

/// Run an inference off the async workers. A panicked task is reported as an
/// inference failure.
async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, PredictionError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result.map_err(ApiError::Prediction),
        Err(e) => Err(ApiError::Prediction(PredictionError::Inference(
            ClassifierError::Runtime(format!("inference task failed: {e}")),
        ))),
    }
}

/// A request failure rendered as an HTTP response.
#[derive(Debug)]
pub enum ApiError {
    /// The body could not be read as a JSON document.
    Body(JsonRejection),
    Prediction(PredictionError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection)
    }
}

impl From<PredictionError> for ApiError {
    fn from(err: PredictionError) -> Self {
        Self::Prediction(err)
    }
}

#[derive(Serialize)]
struct ValidationBody<'a> {
    error: &'static str,
    missing: &'a [Field],
}

#[derive(Serialize)]
struct FailureBody {
    error: &'static str,
    message: String,
    kind: &'static str,
}

fn failure(kind: &'static str, message: String) -> Response {
    let body = FailureBody {
        error: "Prediction failed",
        message,
        kind,
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = match self {
            Self::Body(rejection) => {
                error!(error = %rejection, "unreadable request body");
                return failure("request", rejection.body_text());
            }
            Self::Prediction(err) => err,
        };
        match err.kind() {
            ErrorKind::Validation => {
                warn!(missing = ?err.missing_fields(), "rejected incomplete record");
                let body = ValidationBody {
                    error: "Missing required fields",
                    missing: err.missing_fields(),
                };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            kind => {
                error!(kind = kind.as_str(), error = %err, "prediction failed");
                failure(kind.as_str(), err.to_string())
            }
        }
    }
}
