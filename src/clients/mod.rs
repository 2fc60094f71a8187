// 外部服务客户端
pub mod anthropic;

pub use anthropic::AnthropicClient;
