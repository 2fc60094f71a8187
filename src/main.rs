use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;
use std::sync::Arc;
use tradedesk::{
    api::{self, AppState},
    clients::AnthropicClient,
    core::{config::AppConfig, error::AppError},
    data::{DataSources, DataStore},
    utils::init_logger,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载环境变量
    dotenv::dotenv().ok();

    // 解析命令行参数
    let matches = Command::new("tradedesk")
        .version(env!("CARGO_PKG_VERSION"))
        .about("客户交易、状态与授信额度查询服务")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("配置文件路径，默认 config/app.yaml"),
        )
        .arg(
            Arg::new("host")
                .long("host")
                .value_name("HOST")
                .help("监听地址"),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .value_parser(clap::value_parser!(u16))
                .help("监听端口"),
        )
        .arg(
            Arg::new("data-dir")
                .short('d')
                .long("data-dir")
                .value_name("DIR")
                .help("CSV数据目录"),
        )
        .arg(
            Arg::new("print-config")
                .long("print-config")
                .action(ArgAction::SetTrue)
                .help("打印合并后的配置(YAML)并退出"),
        )
        .get_matches();

    let config_path = matches.get_one::<String>("config").map(PathBuf::from);
    let mut config = AppConfig::load(config_path.as_deref())?;

    if let Some(host) = matches.get_one::<String>("host") {
        config.server.host = host.clone();
    }
    if let Some(port) = matches.get_one::<u16>("port") {
        config.server.port = *port;
    }
    if let Some(dir) = matches.get_one::<String>("data-dir") {
        config.data.dir = PathBuf::from(dir);
    }

    if matches.get_flag("print-config") {
        print!("{}", config.to_yaml()?);
        return Ok(());
    }

    init_logger(&config.logging)?;

    log::info!("🚀 启动 tradedesk 服务, 数据目录: {}", config.data.dir.display());

    // 启动时加载各数据表
    log::info!("📊 加载数据文件...");
    let store = Arc::new(DataStore::new(DataSources::from_config(
        &config.data,
        &config.features,
    )));
    let startup_store = store.clone();
    tokio::task::spawn_blocking(move || startup_store.reload_all()).await?;

    let mut state = AppState::new(store, config.data.documents_path());

    if config.completion.enabled {
        match AnthropicClient::from_config(&config.completion) {
            Ok(client) => {
                log::info!("✅ AI代理已启用, 模型: {}", config.completion.model);
                state = state.with_completion(Arc::new(client));
            }
            Err(AppError::ProxyDisabled(reason)) => {
                log::warn!("⚠️ AI代理未启用: {}", reason);
            }
            Err(e) => return Err(e.into()),
        }
    }

    api::serve(&config.bind_addr(), state).await
}
