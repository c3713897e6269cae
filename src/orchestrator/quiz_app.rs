//! 答题应用 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责开始界面和多次答题之间的循环。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：初始化成绩日志、记录启动信息、确定题库来源
//! 2. **开始界面**：显示题目数量，可切换"全部题目"模式
//! 3. **加载题库**：每次开始都重新加载，失败时提示刷新重试并回到开始界面
//! 4. **组卷答题**：创建会话并委托 session_runner 驱动
//! 5. **成绩记录**：写入成绩日志并输出统计信息
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单道题的细节
//! - **向下委托**：委托 `ConsoleDriver` 驱动一次答题

use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufRead, BufReader, Stdin};
use tracing::{error, info};

use crate::config::Config;
use crate::error::AppResult;
use crate::orchestrator::session_runner::ConsoleDriver;
use crate::services::question_bank::{QuestionBank, QuestionSource};
use crate::services::scoring::QuizResult;
use crate::utils::logging::{
    append_result_record, init_log_file, log_bank_loaded, log_startup, print_final_stats,
};
use crate::workflow::QuizSession;

/// 开始界面上的操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StartCommand {
    Start,
    ToggleAll,
    Quit,
    Unknown,
}

impl StartCommand {
    fn parse(line: &str) -> Self {
        match line.to_lowercase().as_str() {
            "" | "s" | "start" => StartCommand::Start,
            "a" | "all" => StartCommand::ToggleAll,
            "q" | "quit" | "exit" => StartCommand::Quit,
            _ => StartCommand::Unknown,
        }
    }
}

/// 应用主结构
pub struct App<R, W> {
    config: Config,
    bank: QuestionBank,
    driver: ConsoleDriver<R, W>,
    attempts: usize,
    /// 最近一次加载到的题库大小，开始界面上展示用
    available: Option<usize>,
}

impl App<BufReader<Stdin>, std::io::Stdout> {
    /// 初始化应用（使用标准输入输出）
    pub async fn initialize(config: Config) -> Result<Self> {
        let driver = ConsoleDriver::stdio(&config);
        Self::with_driver(config, driver)
    }
}

impl<R, W> App<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    /// 使用指定的输入输出初始化应用
    pub fn with_io(config: Config, input: R, output: W) -> Result<Self> {
        let driver = ConsoleDriver::new(input, output, &config);
        Self::with_driver(config, driver)
    }

    fn with_driver(config: Config, driver: ConsoleDriver<R, W>) -> Result<Self> {
        // 初始化成绩日志文件
        init_log_file(&config.output_log_file)?;

        log_startup(&config);

        let bank = QuestionBank::new(QuestionSource::from_config(&config)?);

        Ok(Self {
            config,
            bank,
            driver,
            attempts: 0,
            available: None,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn driver(&self) -> &ConsoleDriver<R, W> {
        &self.driver
    }

    /// 运行应用主循环，直到用户退出或输入结束
    ///
    /// # 返回
    /// 所有完成的答题成绩（按完成顺序）
    pub async fn run(&mut self) -> Result<Vec<QuizResult>> {
        let mut results = Vec::new();

        loop {
            self.show_start_screen()?;

            let Some(line) = self.driver.read_command().await? else {
                break;
            };

            match StartCommand::parse(&line) {
                StartCommand::Start => {
                    if let Some(result) = self.run_attempt().await? {
                        results.push(result);
                    }
                }
                StartCommand::ToggleAll => {
                    self.config.use_all_available = !self.config.use_all_available;
                    info!(
                        "🔁 全部题目模式: {}",
                        if self.config.use_all_available { "开" } else { "关" }
                    );
                }
                StartCommand::Quit => break,
                StartCommand::Unknown => self.driver.say("⚠️ 无法识别的指令")?,
            }
        }

        info!("👋 程序结束，共完成 {} 次答题", results.len());
        Ok(results)
    }

    /// 一次答题：加载题库、组卷、驱动答题、记录成绩
    ///
    /// # 返回
    /// - `Some(result)`: 完成答题
    /// - `None`: 题库加载失败或中途放弃
    async fn run_attempt(&mut self) -> AppResult<Option<QuizResult>> {
        let pool = match self.bank.load().await {
            Ok(pool) => pool,
            Err(e) if e.is_load_failure() => {
                error!("❌ 题库加载失败: {}", e);
                self.driver.say("❌ 题库加载失败，请刷新后重试")?;
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        self.available = Some(pool.len());
        log_bank_loaded(pool.len(), self.config.selection().effective_count(pool.len()));

        let mut session = QuizSession::from_config(&pool, &self.config)?;
        self.attempts += 1;

        let Some(result) = self.driver.run_session(&mut session, self.attempts).await? else {
            return Ok(None);
        };

        append_result_record(&self.config.output_log_file, self.attempts, &result)?;
        print_final_stats(&result, &self.config.output_log_file);

        Ok(Some(result))
    }

    fn show_start_screen(&mut self) -> AppResult<()> {
        let count_label = match (self.config.use_all_available, self.available) {
            (true, Some(n)) => format!("全部 ({} 道)", n),
            (true, None) => "全部".to_string(),
            (false, Some(n)) => self.config.question_count.min(n).to_string(),
            (false, None) => self.config.question_count.to_string(),
        };

        self.driver.say(&"═".repeat(60))?;
        self.driver.say("📝 选择题练习")?;
        self.driver.say(&format!(
            "题目数量: {}    及格线: 满分的 50%",
            count_label
        ))?;
        self.driver
            .say("回车开始答题，输入 a 切换全部题目模式，输入 q 退出")
    }
}
