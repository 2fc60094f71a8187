use crate::core::error::Result;
use async_trait::async_trait;

/// 文本补全服务通用接口
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// 服务名称
    fn name(&self) -> &str;

    /// 发送一个问题，返回纯文本回答
    async fn complete(&self, prompt: &str) -> Result<String>;
}
