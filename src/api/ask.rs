use super::AppState;
use crate::core::error::{AppError, Result};
use axum::{extract::State, Json};
use log::info;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    pub answer: String,
}

/// 转发问题到补全服务，与数据表无关
pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<QuestionRequest>,
) -> Result<Json<QuestionResponse>> {
    let client = state.completion.as_ref().ok_or_else(|| {
        AppError::ProxyDisabled("Completion proxy is not configured".to_string())
    })?;

    info!("🤖 转发问题到 {}: {} 字符", client.name(), request.question.len());
    let answer = client.complete(&request.question).await?;

    Ok(Json(QuestionResponse { answer }))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::{create_router, AppState};
    use crate::core::completion::CompletionClient;
    use crate::core::error::{AppError, Result};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::StatusCode;
    use std::sync::Arc;

    struct EchoClient;

    #[async_trait]
    impl CompletionClient for EchoClient {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(&self, prompt: &str) -> Result<String> {
            Ok(format!("echo: {}", prompt))
        }
    }

    struct FailingClient;

    #[async_trait]
    impl CompletionClient for FailingClient {
        fn name(&self) -> &str {
            "failing"
        }

        async fn complete(&self, _prompt: &str) -> Result<String> {
            Err(AppError::Completion {
                status: 529,
                message: "overloaded".to_string(),
            })
        }
    }

    fn app_with(client: Option<Arc<dyn CompletionClient>>) -> axum::Router {
        let dir = std::env::temp_dir();
        let mut state = AppState::new(store_with(&dir, false, false), dir);
        if let Some(client) = client {
            state = state.with_completion(client);
        }
        create_router(state)
    }

    async fn post_question(app: axum::Router) -> (StatusCode, serde_json::Value) {
        let (status, bytes) = send(
            app,
            "POST",
            "/ask",
            Body::from(r#"{"question":"¿Qué es un forward?"}"#),
        )
        .await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn returns_answer_text() {
        let (status, body) = post_question(app_with(Some(Arc::new(EchoClient)))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["answer"], "echo: ¿Qué es un forward?");
    }

    #[tokio::test]
    async fn upstream_failure_is_500() {
        let (status, body) = post_question(app_with(Some(Arc::new(FailingClient)))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"]
            .as_str()
            .unwrap()
            .starts_with("Error communicating with completion service"));
    }

    #[tokio::test]
    async fn unconfigured_proxy_is_503() {
        let (status, body) = post_question(app_with(None)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["detail"], "Completion proxy is not configured");
    }
}
