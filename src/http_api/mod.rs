use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    CatalogError, ClassCatalog, Frequency, Occurrence, OccurrenceError, RuleInput, RuleSummary,
    ScheduleRule, ScheduledClass, Timetable, ValidationErrors, summarize, transition,
    validate_rule,
};

#[derive(Clone)]
pub struct AppState {
    catalog: Arc<RwLock<ClassCatalog>>,
}

impl AppState {
    pub fn new(catalog: ClassCatalog) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(catalog)),
        }
    }

    pub fn with_shared(catalog: Arc<RwLock<ClassCatalog>>) -> Self {
        Self { catalog }
    }

    fn catalog(&self) -> Arc<RwLock<ClassCatalog>> {
        self.catalog.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<ValidationErrors>,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Conflict(String),
    Invalid(String),
    InvalidRule(ValidationErrors),
    Internal(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl From<CatalogError> for ApiError {
    fn from(value: CatalogError) -> Self {
        match value {
            CatalogError::NotFound(_) => ApiError::NotFound(value.to_string()),
            CatalogError::DuplicateId(_) => ApiError::Conflict(value.to_string()),
            other => ApiError::Invalid(other.to_string()),
        }
    }
}

impl From<OccurrenceError> for ApiError {
    fn from(value: OccurrenceError) -> Self {
        ApiError::Invalid(value.to_string())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(value: ValidationErrors) -> Self {
        ApiError::InvalidRule(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message, errors) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message, None),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, "conflict", message, None),
            ApiError::Invalid(message) => {
                (StatusCode::BAD_REQUEST, "invalid_request", message, None)
            }
            ApiError::InvalidRule(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "invalid_rule",
                "schedule rule is invalid".to_string(),
                Some(errors),
            ),
            ApiError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                message,
                None,
            ),
        };
        let body = Json(ErrorBody {
            error,
            message,
            errors,
        });
        (status, body).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/rules/validate", post(validate))
        .route("/rules/transition", post(change_frequency))
        .route("/rules/summary", post(summary))
        .route("/rules/occurrences", post(rule_occurrences))
        .route("/classes", get(list_classes).post(create_class))
        .route(
            "/classes/:id",
            get(get_class).put(update_class).delete(delete_class),
        )
        .route("/timetable", get(timetable))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, catalog: ClassCatalog) -> std::io::Result<()> {
    let state = AppState::new(catalog);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "http api listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ValidationOutcome {
    Valid { valid: bool, rule: ScheduleRule },
    Invalid { valid: bool, errors: ValidationErrors },
}

async fn validate(Json(input): Json<RuleInput>) -> (StatusCode, Json<ValidationOutcome>) {
    match validate_rule(&input) {
        Ok(rule) => (
            StatusCode::OK,
            Json(ValidationOutcome::Valid { valid: true, rule }),
        ),
        Err(errors) => {
            tracing::debug!(%errors, "rule rejected");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ValidationOutcome::Invalid {
                    valid: false,
                    errors,
                }),
            )
        }
    }
}

#[derive(Debug, Deserialize)]
struct TransitionPayload {
    rule: RuleInput,
    frequency: String,
}

async fn change_frequency(
    Json(payload): Json<TransitionPayload>,
) -> Result<Json<RuleInput>, ApiError> {
    let frequency = payload
        .frequency
        .parse::<Frequency>()
        .map_err(|err| ApiError::invalid(err.to_string()))?;
    Ok(Json(transition(&payload.rule, frequency)))
}

async fn summary(Json(input): Json<RuleInput>) -> Json<RuleSummary> {
    Json(summarize(&input))
}

#[derive(Debug, Deserialize)]
struct OccurrencesPayload {
    rule: RuleInput,
    from: NaiveDate,
    to: NaiveDate,
}

async fn rule_occurrences(
    Json(payload): Json<OccurrencesPayload>,
) -> Result<Json<Vec<Occurrence>>, ApiError> {
    let rule = validate_rule(&payload.rule)?;
    Ok(Json(rule.occurrences(payload.from, payload.to)?))
}

async fn list_classes(State(state): State<AppState>) -> Json<Vec<ScheduledClass>> {
    let catalog = state.catalog();
    let classes = {
        let guard = catalog.read();
        guard.classes().to_vec()
    };
    Json(classes)
}

async fn get_class(
    State(state): State<AppState>,
    Path(class_id): Path<u32>,
) -> Result<Json<ScheduledClass>, ApiError> {
    let catalog = state.catalog();
    let found = {
        let guard = catalog.read();
        guard.get(class_id).cloned()
    };
    found
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("class {class_id} not found")))
}

async fn create_class(
    State(state): State<AppState>,
    Json(class): Json<ScheduledClass>,
) -> Result<(StatusCode, Json<ScheduledClass>), ApiError> {
    let catalog = state.catalog();
    {
        let mut guard = catalog.write();
        guard.insert(class.clone())?;
    }
    Ok((StatusCode::CREATED, Json(class)))
}

async fn update_class(
    State(state): State<AppState>,
    Path(class_id): Path<u32>,
    Json(class): Json<ScheduledClass>,
) -> Result<Json<ScheduledClass>, ApiError> {
    if class.id != class_id {
        return Err(ApiError::invalid(
            "class id in payload does not match path parameter",
        ));
    }
    let catalog = state.catalog();
    {
        let mut guard = catalog.write();
        if !guard.contains(class_id) {
            return Err(ApiError::not_found(format!("class {class_id} not found")));
        }
        guard.upsert(class.clone())?;
    }
    Ok(Json(class))
}

async fn delete_class(
    State(state): State<AppState>,
    Path(class_id): Path<u32>,
) -> Result<StatusCode, ApiError> {
    let catalog = state.catalog();
    {
        let mut guard = catalog.write();
        guard.remove(class_id)?;
    }
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
struct TimetableQuery {
    from: NaiveDate,
    to: NaiveDate,
}

async fn timetable(
    State(state): State<AppState>,
    Query(query): Query<TimetableQuery>,
) -> Result<Json<Timetable>, ApiError> {
    let snapshot = state.catalog().read().clone();
    let timetable = tokio::task::spawn_blocking(move || {
        Timetable::build(&snapshot, query.from, query.to)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "timetable expansion failed");
        ApiError::Internal("timetable expansion failed".to_string())
    })??;
    Ok(Json(timetable))
}
