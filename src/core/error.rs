use std::path::PathBuf;
use thiserror::Error;

/// 整表加载失败（只影响当前表）
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("数据文件不存在: {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("数据文件读取失败: {} - {reason}", .path.display())]
    SourceUnreadable { path: PathBuf, reason: String },
}

/// 单行被丢弃的原因
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkipReason {
    #[error("缺少关键字段 {0}")]
    MissingKey(&'static str),

    #[error("行格式错误: {0}")]
    Malformed(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("未找到交易单据: {0}")]
    DocumentNotFound(String),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("网络请求错误: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON序列化错误: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("完成服务返回错误: {status} - {message}")]
    Completion { status: u16, message: String },

    #[error("AI代理未配置: {0}")]
    ProxyDisabled(String),

    #[error("其他错误: {0}")]
    Other(String),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl AppError {
    /// 对应的HTTP状态码
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::NotFound(_) | AppError::DocumentNotFound(_) => 404,
            AppError::ProxyDisabled(_) => 503,
            _ => 500,
        }
    }

    /// 获取错误的严重程度
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::NotFound(_) | AppError::DocumentNotFound(_) => ErrorSeverity::Info,
            AppError::ProxyDisabled(_) => ErrorSeverity::Warning,
            AppError::Network(_) | AppError::Completion { .. } => ErrorSeverity::Error,
            AppError::Config(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }

    /// 返回给调用方的错误描述
    pub fn detail(&self) -> String {
        match self {
            AppError::Network(_) | AppError::Completion { .. } | AppError::Serde(_) => {
                format!("Error communicating with completion service: {}", self)
            }
            AppError::NotFound(msg) | AppError::ProxyDisabled(msg) => msg.clone(),
            AppError::DocumentNotFound(msg) => msg.clone(),
            _ => self.to_string(),
        }
    }
}

/// 错误严重程度
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorSeverity {
    Info,     // 正常的查询未命中
    Warning,  // 功能降级
    Error,    // 请求失败
    Critical, // 无法启动
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let err = AppError::NotFound("No trades found for client X".to_string());
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.severity(), ErrorSeverity::Info);
        assert_eq!(err.detail(), "No trades found for client X");
    }

    #[test]
    fn upstream_failures_are_server_errors() {
        let err = AppError::Completion {
            status: 401,
            message: "invalid x-api-key".to_string(),
        };
        assert_eq!(err.status_code(), 500);
        assert!(err
            .detail()
            .starts_with("Error communicating with completion service"));

        let disabled = AppError::ProxyDisabled("missing key".to_string());
        assert_eq!(disabled.status_code(), 503);
    }
}
