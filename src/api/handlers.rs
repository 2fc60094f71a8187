use super::AppState;
use crate::core::error::{AppError, Result};
use crate::core::types::{ClientStatusView, CreditLineView, StatsSnapshot, TradeRecord};
use crate::data::ReloadReport;
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Local;
use log::info;
use serde_json::{json, Value};

pub async fn index(State(state): State<AppState>) -> Json<Value> {
    let sizes = state.store.table_sizes();
    Json(json!({
        "message": "Trades, Status & Credit API",
        "endpoints": {
            "/trades/{client_id}": "Get last 5 trades for client",
            "/status/{client_id}": "Get client status with traffic lights",
            "/credit/{client_id}": "Get client credit line utilization",
            "/document/{trade_number}": "Download trade document",
            "/health": "Health check",
            "/stats": "API statistics",
            "/reload": "Reload data from CSV files",
            "/ask": "Forward a question to the completion service"
        },
        "data_loaded": {
            "total_trades": sizes.trades,
            "total_statuses": sizes.statuses,
            "total_credit_lines": sizes.credit_lines
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let sizes = state.store.table_sizes();
    Json(json!({
        "status": "healthy",
        "total_trades": sizes.trades,
        "total_client_statuses": sizes.statuses,
        "total_credit_lines": sizes.credit_lines,
        "timestamp": Local::now().to_rfc3339(),
        "tables": state.store.tables_info(),
    }))
}

pub async fn get_trades(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> Result<Json<Vec<TradeRecord>>> {
    info!("📋 查询交易: client_id={}", client_id);
    let trades = state.store.query_trades(&client_id)?;
    info!("✅ 返回 {} 笔交易: client_id={}", trades.len(), client_id);
    Ok(Json(trades))
}

pub async fn get_status(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> Json<ClientStatusView> {
    info!("🚦 查询客户状态: client_id={}", client_id);
    let view = state.store.query_status(&client_id);
    info!("✅ 客户 {} 状态: {}", client_id, view.status_line);
    Json(view)
}

pub async fn get_credit(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> Json<CreditLineView> {
    info!("💳 查询授信额度: client_id={}", client_id);
    let view = state.store.query_credit(&client_id);
    info!("✅ 客户 {} 授信: {}", client_id, view.credit_line);
    Json(view)
}

pub async fn get_stats(State(state): State<AppState>) -> Json<StatsSnapshot> {
    Json(state.store.query_stats())
}

/// 在阻塞线程池中重新加载，进行中的查询继续读取旧快照
pub async fn reload(State(state): State<AppState>) -> Result<Json<ReloadReport>> {
    info!("🔄 收到重载请求");
    let store = state.store.clone();
    let report = tokio::task::spawn_blocking(move || store.reload_all())
        .await
        .map_err(|e| AppError::Other(format!("重载任务异常退出: {}", e)))?;
    Ok(Json(report))
}
