/// 题库下载客户端
///
/// 封装题库文本的网络获取逻辑：一次 GET，不重试
use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};
use std::time::Duration;
use tracing::debug;

/// 题库下载客户端
pub struct QuestionBankClient {
    http: reqwest::Client,
    source_url: String,
}

impl QuestionBankClient {
    /// 创建新的题库客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        Self::with_url(
            config.question_source_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// 使用自定义地址创建客户端
    pub fn with_url(source_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::Api(ApiError::ClientBuildFailed {
                    source: Box::new(e),
                })
            })?;

        Ok(Self {
            http,
            source_url: source_url.into(),
        })
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// 下载题库原始文本
    ///
    /// # 返回
    /// 成功时返回响应正文；网络错误或非 2xx 状态码都视为本次开始失败
    pub async fn fetch_raw_text(&self) -> AppResult<String> {
        debug!("正在下载题库: {}", self.source_url);

        let response = self
            .http
            .get(&self.source_url)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(&self.source_url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::BadResponse {
                endpoint: self.source_url.clone(),
                status: status.as_u16(),
            }
            .into());
        }

        let text = response
            .text()
            .await
            .map_err(|e| AppError::api_request_failed(&self.source_url, e))?;

        debug!("题库下载完成，长度: {} 字节", text.len());

        Ok(text)
    }
}
