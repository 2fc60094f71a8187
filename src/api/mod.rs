//! HTTP接口（Axum）

use crate::core::completion::CompletionClient;
use crate::core::error::{AppError, ErrorSeverity};
use crate::data::DataStore;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::{error, info, warn};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

pub mod ask;
pub mod documents;
pub mod handlers;

/// 所有请求共享的状态
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DataStore>,
    pub documents_dir: PathBuf,
    pub completion: Option<Arc<dyn CompletionClient>>,
}

impl AppState {
    pub fn new(store: Arc<DataStore>, documents_dir: PathBuf) -> Self {
        Self {
            store,
            documents_dir,
            completion: None,
        }
    }

    pub fn with_completion(mut self, client: Arc<dyn CompletionClient>) -> Self {
        self.completion = Some(client);
        self
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self.severity() {
            ErrorSeverity::Info => info!("{}", self),
            ErrorSeverity::Warning => warn!("⚠️ {}", self),
            _ => error!("❌ {}", self),
        }

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(json!({ "detail": self.detail() }))).into_response()
    }
}

/// 允许任意来源的跨域请求
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// 创建路由；状态与授信接口仅在对应数据表启用时挂载
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/trades/:client_id", get(handlers::get_trades))
        .route("/stats", get(handlers::get_stats))
        .route("/reload", get(handlers::reload).post(handlers::reload))
        .route("/document/:trade_number", get(documents::get_document))
        .route("/ask", post(ask::ask));

    if state.store.status_enabled() {
        router = router.route("/status/:client_id", get(handlers::get_status));
    }
    if state.store.credit_enabled() {
        router = router.route("/credit/:client_id", get(handlers::get_credit));
    }

    router.layer(cors_layer()).with_state(state)
}

/// 绑定地址并运行直到收到 Ctrl-C
pub async fn serve(addr: &str, state: AppState) -> anyhow::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("绑定 {} 失败: {}", addr, e))?;

    info!("🚀 HTTP服务已启动: http://{}", addr);
    info!("   - Health: http://{}/health", addr);
    info!("   - Stats: http://{}/stats", addr);
    info!("   - Example trades: http://{}/trades/93.685.712-6", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("监听停止信号失败: {}", e);
        return;
    }
    info!("收到停止信号，正在关闭服务...");
}
