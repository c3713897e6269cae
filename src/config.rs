use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{AppError, AppResult, ConfigError};
use crate::services::shuffle::ShuffleMode;
use crate::services::session_builder::QuestionSelection;

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 题库文本地址
    pub question_source_url: String,
    /// 本地题库文件（设置后优先于网络地址）
    pub question_bank_file: Option<String>,
    /// 每次答题的题目数量
    pub question_count: usize,
    /// 是否使用全部题目（为 true 时忽略 question_count）
    pub use_all_available: bool,
    /// 每题分值
    pub points_per_question: f64,
    /// 洗牌随机数模式
    pub shuffle_mode: ShuffleMode,
    /// 下载题库超时（秒）
    pub request_timeout_secs: u64,
    /// 揭晓答案后停留时间（毫秒）
    pub reveal_delay_ms: u64,
    /// 切换到下一题前的停顿（毫秒）
    pub advance_delay_ms: u64,
    /// 计时器刷新间隔（毫秒）
    pub timer_tick_ms: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            question_source_url: "https://gist.githubusercontent.com/Insolent9752/8d719a720339785bcc2c5456e9e69953/raw/88564b1e04db4eb70d5ee0fd735b4809b4bf3069/kh_quiz.txt".to_string(),
            question_bank_file: None,
            question_count: 45,
            use_all_available: false,
            points_per_question: 2.5,
            shuffle_mode: ShuffleMode::Averaged,
            request_timeout_secs: 30,
            reveal_delay_ms: 1500,
            advance_delay_ms: 500,
            timer_tick_ms: 1000,
            verbose_logging: false,
            output_log_file: "quiz_results.txt".to_string(),
        }
    }
}

impl Config {
    /// 从环境变量加载配置，未设置的项使用默认值
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件加载配置，文件中缺省的项使用默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            AppError::File(crate::error::FileError::TomlParseFailed {
                path: path.display().to_string(),
                source: Box::new(e),
            })
        })?;
        config.validate()?;
        Ok(config)
    }

    /// 加载配置：先读 TOML 文件（如果提供），再用环境变量覆盖；
    /// 没有文件时等同于 `from_env`
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let config = match path {
            Some(p) => Self::from_toml_file(p)?.with_env_overrides(),
            None => Self::from_env(),
        };
        config.validate()?;
        Ok(config)
    }

    /// 本次答题的选题方式
    pub fn selection(&self) -> QuestionSelection {
        if self.use_all_available {
            QuestionSelection::All
        } else {
            QuestionSelection::Count(self.question_count)
        }
    }

    fn with_env_overrides(self) -> Self {
        Self {
            question_source_url: std::env::var("QUIZ_SOURCE_URL").unwrap_or(self.question_source_url),
            question_bank_file: std::env::var("QUIZ_BANK_FILE").ok().or(self.question_bank_file),
            question_count: env_parse("QUESTION_COUNT").unwrap_or(self.question_count),
            use_all_available: env_parse("USE_ALL_QUESTIONS").unwrap_or(self.use_all_available),
            points_per_question: env_parse("POINTS_PER_QUESTION").unwrap_or(self.points_per_question),
            shuffle_mode: env_parse("SHUFFLE_MODE").unwrap_or(self.shuffle_mode),
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS").unwrap_or(self.request_timeout_secs),
            reveal_delay_ms: env_parse("REVEAL_DELAY_MS").unwrap_or(self.reveal_delay_ms),
            advance_delay_ms: env_parse("ADVANCE_DELAY_MS").unwrap_or(self.advance_delay_ms),
            timer_tick_ms: env_parse("TIMER_TICK_MS").unwrap_or(self.timer_tick_ms),
            verbose_logging: env_parse("VERBOSE_LOGGING").unwrap_or(self.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(self.output_log_file),
        }
    }

    fn validate(&self) -> AppResult<()> {
        if !self.use_all_available && self.question_count == 0 {
            return Err(ConfigError::InvalidValue {
                field: "question_count".to_string(),
                reason: "题目数量不能为 0".to_string(),
            }
            .into());
        }
        if !(self.points_per_question.is_finite() && self.points_per_question > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "points_per_question".to_string(),
                reason: format!("每题分值必须为正数，当前为 {}", self.points_per_question),
            }
            .into());
        }
        if self.timer_tick_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timer_tick_ms".to_string(),
                reason: "计时器间隔不能为 0".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// 读取并解析环境变量，解析失败时记录警告并忽略
fn env_parse<T: FromStr>(var_name: &str) -> Option<T> {
    let value = std::env::var(var_name).ok()?;
    match value.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            let err = ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: std::any::type_name::<T>().to_string(),
            };
            tracing::warn!("⚠️ {}，使用默认值", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FileError;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// 环境变量是进程级的，读写环境变量的测试串行执行
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn write_toml(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{}_{}.toml", name, std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_reads_file_then_env_overrides() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let path = write_toml(
            "config_layers",
            "question_count = 20\nshuffle_mode = \"uniform\"\nreveal_delay_ms = 10\n",
        );

        std::env::remove_var("QUESTION_COUNT");
        let from_file = Config::load(Some(&path)).unwrap();
        assert_eq!(from_file.question_count, 20);
        assert_eq!(from_file.shuffle_mode, ShuffleMode::Uniform);
        assert_eq!(from_file.reveal_delay_ms, 10);
        assert_eq!(from_file.advance_delay_ms, 500);

        std::env::set_var("QUESTION_COUNT", "30");
        let overridden = Config::load(Some(&path));
        std::env::remove_var("QUESTION_COUNT");

        let overridden = overridden.unwrap();
        assert_eq!(overridden.question_count, 30);
        // 环境变量只覆盖自己对应的字段
        assert_eq!(overridden.shuffle_mode, ShuffleMode::Uniform);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_unparsable_env_value_is_ignored() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let path = write_toml("config_bad_env", "question_count = 20\n");

        std::env::set_var("QUESTION_COUNT", "много");
        let from_env = Config::from_env();
        let loaded = Config::load(Some(&path));
        let without_file = Config::load(None);
        std::env::remove_var("QUESTION_COUNT");

        assert_eq!(from_env.question_count, 45);
        assert_eq!(loaded.unwrap().question_count, 20);
        assert_eq!(without_file.unwrap().question_count, 45);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_rejects_invalid_file_value() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let path = write_toml("config_zero_count", "question_count = 0\n");

        std::env::remove_var("QUESTION_COUNT");
        std::env::remove_var("USE_ALL_QUESTIONS");
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::InvalidValue { ref field, .. }) if field == "question_count"
        ));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_from_toml_file_errors() {
        let missing = std::env::temp_dir().join("config_definitely_missing.toml");
        assert!(matches!(
            Config::from_toml_file(&missing),
            Err(AppError::File(FileError::ReadFailed { .. }))
        ));

        let path = write_toml("config_broken", "question_count = \"сорок\"\n");
        assert!(matches!(
            Config::from_toml_file(&path),
            Err(AppError::File(FileError::TomlParseFailed { .. }))
        ));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_default_matches_quiz_rules() {
        let config = Config::default();
        assert_eq!(config.question_count, 45);
        assert!(!config.use_all_available);
        assert_eq!(config.points_per_question, 2.5);
        assert_eq!(config.shuffle_mode, ShuffleMode::Averaged);
        assert_eq!(config.selection(), QuestionSelection::Count(45));
    }

    #[test]
    fn test_use_all_ignores_count() {
        let config = Config {
            use_all_available: true,
            question_count: 10,
            ..Config::default()
        };
        assert_eq!(config.selection(), QuestionSelection::All);
    }

    #[test]
    fn test_toml_partial_fields() {
        let config: Config = toml::from_str(
            r#"
            question_count = 20
            shuffle_mode = "uniform"
            question_bank_file = "bank.txt"
            "#,
        )
        .unwrap();

        assert_eq!(config.question_count, 20);
        assert_eq!(config.shuffle_mode, ShuffleMode::Uniform);
        assert_eq!(config.question_bank_file.as_deref(), Some("bank.txt"));
        // 未写的字段保持默认
        assert_eq!(config.points_per_question, 2.5);
        assert_eq!(config.reveal_delay_ms, 1500);
    }

    #[test]
    fn test_validate_rejects_zero_count() {
        let config = Config {
            question_count: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let all = Config {
            question_count: 0,
            use_all_available: true,
            ..Config::default()
        };
        assert!(all.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_points() {
        let config = Config {
            points_per_question: -1.0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AppError::Config(ConfigError::InvalidValue { .. }))
        ));
    }
}
