//! 题库加载服务 - 业务能力层
//!
//! 只负责"拿到可用的题目列表"，不关心答题流程

use crate::clients::QuestionBankClient;
use crate::config::Config;
use crate::error::{AppResult, BusinessError};
use crate::models::loaders::{load_question_bank_file, parse_questions};
use crate::models::question::QuestionRecord;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// 题库来源
pub enum QuestionSource {
    /// 网络地址
    Remote(QuestionBankClient),
    /// 本地文件
    File(PathBuf),
}

impl QuestionSource {
    /// 根据配置选择来源：配置了本地文件则优先使用本地文件
    pub fn from_config(config: &Config) -> AppResult<Self> {
        match &config.question_bank_file {
            Some(path) => Ok(QuestionSource::File(PathBuf::from(path))),
            None => Ok(QuestionSource::Remote(QuestionBankClient::new(config)?)),
        }
    }

    fn describe(&self) -> String {
        match self {
            QuestionSource::Remote(client) => client.source_url().to_string(),
            QuestionSource::File(path) => path.display().to_string(),
        }
    }
}

/// 题库加载服务
pub struct QuestionBank {
    source: QuestionSource,
}

impl QuestionBank {
    pub fn new(source: QuestionSource) -> Self {
        Self { source }
    }

    /// 加载并解析题库
    ///
    /// # 返回
    /// 至少包含一道题的列表；解析结果为空时返回 `EmptyQuestionBank`，
    /// 与网络失败一样视为本次无法开始
    pub async fn load(&self) -> AppResult<Vec<QuestionRecord>> {
        info!("📥 正在加载题库: {}", self.source.describe());

        let questions = match &self.source {
            QuestionSource::Remote(client) => parse_questions(&client.fetch_raw_text().await?),
            QuestionSource::File(path) => load_question_bank_file(path).await?,
        };

        if questions.is_empty() {
            warn!("⚠️ 题库中没有解析出任何题目");
            return Err(BusinessError::EmptyQuestionBank.into());
        }
        if let Some(first) = questions.first() {
            debug!("第一道题: {}", first);
        }

        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    async fn write_temp(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{}_{}.txt", name, std::process::id()));
        tokio::fs::write(&path, content).await.unwrap();
        path
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let path = write_temp("bank_ok", "#####Q1\n?????A\n?????B\n#####Q2\n?????C\n").await;

        let bank = QuestionBank::new(QuestionSource::File(path.clone()));
        let questions = bank.load().await.unwrap();
        assert_eq!(questions.len(), 2);

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_malformed_bank_is_empty_error() {
        let path = write_temp("bank_bad", "nothing useful here\n#####\n").await;

        let err = QuestionBank::new(QuestionSource::File(path.clone()))
            .load()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Business(BusinessError::EmptyQuestionBank)
        ));
        assert!(err.is_load_failure());

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[test]
    fn test_source_prefers_local_file() {
        let config = Config {
            question_bank_file: Some("local.txt".to_string()),
            ..Config::default()
        };
        match QuestionSource::from_config(&config).unwrap() {
            QuestionSource::File(path) => assert_eq!(path, PathBuf::from("local.txt")),
            QuestionSource::Remote(_) => panic!("expected file source"),
        }
    }
}
