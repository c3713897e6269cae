//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责界面流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `quiz_app` - 应用主循环
//! - 管理应用生命周期（初始化、运行）
//! - 开始界面与"全部题目"开关
//! - 每次开始时加载题库（失败则提示刷新重试）
//! - 写入成绩日志、输出统计信息
//!
//! ### `session_runner` - 单次答题驱动器
//! - 显示题目、读取选择、揭晓答案
//! - 启动并停止计时器
//! - 显示成绩页
//!
//! ## 层次关系
//!
//! ```text
//! quiz_app (开始界面 / 多次答题)
//!     ↓
//! session_runner (驱动一次答题)
//!     ↓
//! workflow::QuizSession (答题状态)
//!     ↓
//! services (能力层：组卷 / 洗牌 / 均衡 / 计分 / 题库)
//!     ↓
//! infrastructure / clients (计时器、HTTP)
//! ```

pub mod quiz_app;
pub mod session_runner;

// 重新导出主要类型
pub use quiz_app::App;
pub use session_runner::ConsoleDriver;
