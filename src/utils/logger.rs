//! 日志初始化
//! 基于 env_logger，`RUST_LOG` 优先于配置文件中的级别

use crate::core::config::LoggingConfig;
use chrono::Local;
use log::LevelFilter;
use std::io::Write;

/// 按模板格式化一行日志，支持 {timestamp} {level} {module} {message}
pub fn render_line(format: &str, level: &str, module: &str, message: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string();
    format
        .replace("{timestamp}", &timestamp)
        .replace("{level}", level)
        .replace("{module}", module)
        .replace("{message}", message)
}

pub fn level_filter(level: &str) -> LevelFilter {
    match level.to_uppercase().as_str() {
        "TRACE" => LevelFilter::Trace,
        "DEBUG" => LevelFilter::Debug,
        "INFO" => LevelFilter::Info,
        "WARN" | "WARNING" => LevelFilter::Warn,
        "ERROR" => LevelFilter::Error,
        "OFF" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

/// 初始化全局日志器；重复初始化返回错误而不是panic
pub fn init_logger(config: &LoggingConfig) -> Result<(), log::SetLoggerError> {
    let default_level = level_filter(&config.level).to_string().to_lowercase();
    let env = env_logger::Env::default().filter_or("RUST_LOG", default_level);
    let format = config.format.clone();

    env_logger::Builder::from_env(env)
        .format(move |buf, record| {
            let line = render_line(
                &format,
                &record.level().to_string(),
                record.target(),
                &record.args().to_string(),
            );
            writeln!(buf, "{}", line)
        })
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_template() {
        let line = render_line("[{level}] [{module}] {message}", "INFO", "tradedesk::api", "ok");
        assert_eq!(line, "[INFO] [tradedesk::api] ok");
    }

    #[test]
    fn unknown_levels_fall_back_to_info() {
        assert_eq!(level_filter("debug"), LevelFilter::Debug);
        assert_eq!(level_filter("Warning"), LevelFilter::Warn);
        assert_eq!(level_filter("verbose"), LevelFilter::Info);
    }
}
