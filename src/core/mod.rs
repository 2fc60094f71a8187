// 核心模块 - 配置、错误与数据类型
pub mod completion;
pub mod config;
pub mod error;
pub mod types;

pub use self::completion::CompletionClient;
pub use self::config::*;
pub use self::error::*;
pub use self::types::*;
