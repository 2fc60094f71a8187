use crate::core::error::AppError;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 环境变量前缀，例如 TRADEDESK__SERVER__PORT=9000
pub const ENV_PREFIX: &str = "TRADEDESK";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub features: FeatureConfig,
    pub completion: CompletionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8001,
        }
    }
}

/// 数据文件位置，文件名相对于 `dir`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub dir: PathBuf,
    pub trades_file: String,
    pub status_file: String,
    pub credit_file: String,
    pub documents_dir: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            trades_file: "trades.csv".to_string(),
            status_file: "client_status.csv".to_string(),
            credit_file: "credit_lines.csv".to_string(),
            documents_dir: "trade_documents".to_string(),
        }
    }
}

impl DataConfig {
    pub fn trades_path(&self) -> PathBuf {
        self.dir.join(&self.trades_file)
    }

    pub fn status_path(&self) -> PathBuf {
        self.dir.join(&self.status_file)
    }

    pub fn credit_path(&self) -> PathBuf {
        self.dir.join(&self.credit_file)
    }

    pub fn documents_path(&self) -> PathBuf {
        self.dir.join(&self.documents_dir)
    }
}

/// 可选数据表：仅交易 / +状态 / +状态+授信
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub status: bool,
    pub credit: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            status: true,
            credit: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    pub enabled: bool,
    /// 保存API密钥的环境变量名
    pub api_key_env: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            model: "claude-3-5-sonnet-20241022".to_string(),
            max_tokens: 1000,
            timeout_secs: 60,
        }
    }
}

impl CompletionConfig {
    /// 从环境变量读取API密钥，空值视为未配置
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "[{timestamp}] [{level}] [{module}] {message}".to_string(),
        }
    }
}

impl AppConfig {
    /// 按 默认值 -> YAML文件 -> 环境变量 的顺序合并配置
    ///
    /// 未指定路径时尝试 `config/app.yaml`，文件不存在不算错误；
    /// 显式指定的文件必须存在。
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let mut builder = Config::builder();

        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(AppError::Config(format!(
                        "配置文件不存在: {}",
                        p.display()
                    )));
                }
                builder = builder.add_source(File::from(p).required(true));
            }
            None => {
                builder = builder.add_source(File::with_name("config/app").required(false));
            }
        }

        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 导出为YAML，可作为 `config/app.yaml` 的模板
    pub fn to_yaml(&self) -> Result<String, AppError> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(format!("配置序列化失败: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_service_layout() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.bind_addr(), "127.0.0.1:8001");
        assert_eq!(cfg.data.trades_path(), PathBuf::from("./trades.csv"));
        assert_eq!(cfg.data.status_path(), PathBuf::from("./client_status.csv"));
        assert_eq!(cfg.data.credit_path(), PathBuf::from("./credit_lines.csv"));
        assert!(cfg.features.status && cfg.features.credit);
        assert_eq!(cfg.completion.max_tokens, 1000);
    }

    #[test]
    fn yaml_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "server:\n  port: 9100\ndata:\n  dir: /srv/data\nfeatures:\n  credit: false"
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.data.dir, PathBuf::from("/srv/data"));
        assert!(cfg.features.status);
        assert!(!cfg.features.credit);
    }

    #[test]
    fn exported_yaml_lists_every_section() {
        let yaml = AppConfig::default().to_yaml().unwrap();
        for section in ["server:", "data:", "features:", "completion:", "logging:"] {
            assert!(yaml.contains(section), "缺少 {}", section);
        }
        assert!(yaml.contains("port: 8001"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let result = AppConfig::load(Some(Path::new("/definitely/not/here.yaml")));
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
