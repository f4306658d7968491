//! REST API Server for the financial literacy assistant
//!
//! POST /ask    - answer one question
//! GET  /health - liveness plus model and strategy info

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, error, info};

use crate::assistant::{FinanceAssistant, PROMPT_REQUIRED};
use crate::error::AssistantError;
use crate::models::{Answer, AnswerKind, Language};

/// =============================
/// Request / Response Models
/// =============================

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub prompt: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub response: String,
    pub kind: AnswerKind,
    pub language: Language,
}

impl From<Answer> for AskResponse {
    fn from(answer: Answer) -> Self {
        Self {
            response: answer.response,
            kind: answer.kind,
            language: answer.language,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// =============================
/// Errors
/// =============================

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl From<AssistantError> for ApiError {
    fn from(e: AssistantError) -> Self {
        match e {
            AssistantError::Validation(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => {
                error!("Request failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub assistant: Arc<FinanceAssistant>,
}

/// =============================
/// Health Endpoint
/// =============================

async fn health(State(state): State<ApiState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "model": state.assistant.model_name(),
        "api_key_configured": state.assistant.credentials_configured(),
        "relevance_strategy": state.assistant.strategy_name(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Ask Endpoint
/// =============================

async fn ask(
    State(state): State<ApiState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, ApiError> {
    // An unreadable body is the same as a missing prompt
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            debug!("Rejected /ask body: {}", rejection.body_text());
            return Err(ApiError::BadRequest(PROMPT_REQUIRED.to_string()));
        }
    };

    let answer = state.assistant.answer(&req.prompt).await?;
    Ok(Json(answer.into()))
}

/// =============================
/// Router
/// =============================

pub fn create_router(assistant: Arc<FinanceAssistant>) -> Router {
    let state = ApiState { assistant };

    Router::new()
        .route("/health", get(health))
        .route("/ask", post(ask))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    assistant: Arc<FinanceAssistant>,
    addr: &str,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(assistant);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("API Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::APOLOGY_MESSAGE;
    use crate::classifier::{KeywordStrategy, DECLINE_MESSAGE};
    use crate::gateway::{MockGateway, MockReply, MOCK_ANSWER};
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app(replies: Vec<MockReply>) -> (Router, Arc<MockGateway>) {
        let gateway = Arc::new(MockGateway::with_replies(replies));
        let assistant = FinanceAssistant::new(Arc::new(KeywordStrategy::new()), gateway.clone());
        (create_router(Arc::new(assistant)), gateway)
    }

    async fn post_ask(router: Router, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/ask")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_missing_prompt_is_400() {
        for body in [r#"{"prompt": ""}"#, r#"{"prompt": "   "}"#, r#"{}"#, "not json", r#"{"prompt": 42}"#] {
            let (router, gateway) = app(vec![]);
            let (status, json) = post_ask(router, body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
            assert_eq!(json["error"], PROMPT_REQUIRED);
            assert_eq!(gateway.call_count(), 0);
        }
    }

    #[tokio::test]
    async fn test_greeting_is_answered() {
        let (router, gateway) = app(vec![]);
        let (status, json) = post_ask(router, r#"{"prompt": "hello"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["response"], MOCK_ANSWER);
        assert_eq!(json["kind"], "greeting");
        assert_eq!(json["language"], "english");
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test]
    async fn test_off_topic_declined_without_model_call() {
        let (router, gateway) = app(vec![]);
        let (status, json) = post_ask(router, r#"{"prompt": "tell me a joke"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["response"], DECLINE_MESSAGE);
        assert_eq!(json["kind"], "off_topic");
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_timeout_returns_apology() {
        let (router, _) = app(vec![MockReply::Timeout]);
        let (status, json) = post_ask(router, r#"{"prompt": "best way to invst my salry"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["response"], APOLOGY_MESSAGE);
        assert_eq!(json["kind"], "fallback");
    }

    #[tokio::test]
    async fn test_health() {
        let (router, _) = app(vec![]);
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["model"], "mock");
        assert_eq!(json["api_key_configured"], true);
        assert_eq!(json["relevance_strategy"], "local");
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_internal_error_maps_to_500() {
        let response = ApiError::from(AssistantError::EmptyResponse).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = ApiError::from(AssistantError::Validation("bad".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
