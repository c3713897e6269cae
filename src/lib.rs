//! # Quiz Runner
//!
//! 一个终端选择题练习程序：从题库随机抽题，打乱选项，逐题作答并计分
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有周期任务，只暴露能力
//! - `SessionTimer` - 唯一的计时任务，提供已用时读取
//! - `clients/` - `QuestionBankClient`，下载题库原始文本
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，不关心答题界面
//! - `Shuffler` - 洗牌（默认三次取平均的有偏洗牌）
//! - `PositionBalancer` - 均衡正确答案位置
//! - `SessionBuilder` - 抽题组卷
//! - `ReshuffleStrategy` - 切题时的重新打乱
//! - `ScoringRules` - 计分与及格线
//! - `QuestionBank` - 加载题库
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次答题"的状态与操作
//! - `QuestionCtx` - 上下文封装（第几次答题 + 题号）
//! - `QuizSession` - 作答、切题、结束
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/quiz_app` - 开始界面与多次答题循环
//! - `orchestrator/session_runner` - 驱动一次答题的终端交互
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::QuestionBankClient;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::SessionTimer;
pub use models::{parse_questions, QuestionRecord, QuestionView, SessionQuestion};
pub use orchestrator::{App, ConsoleDriver};
pub use services::{
    PositionBalancer, QuestionBank, QuestionSelection, QuestionSource, QuizResult,
    ReshuffleStrategy, ScoringRules, SessionBuilder, ShuffleMode, Shuffler,
};
pub use workflow::{AdvanceOutcome, AnswerOutcome, QuestionCtx, QuizSession};
