/// 日志工具模块
///
/// 提供日志初始化、格式化和成绩记录的辅助函数
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::services::scoring::QuizResult;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 日志
///
/// 优先使用 `RUST_LOG`，否则默认 info（详细模式为 debug）。
/// 重复调用不会出错，测试中可以放心使用。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化成绩日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> AppResult<()> {
    let log_header = format!(
        "{}\n答题记录 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)
        .map_err(|e| AppError::file_write_failed(log_file_path, e))?;
    Ok(())
}

/// 成绩日志中的一行
#[derive(Serialize)]
struct ResultRecord<'a> {
    attempt: usize,
    finished_at: String,
    #[serde(flatten)]
    result: &'a QuizResult,
}

/// 把一次答题的成绩以 JSON 行的形式追加到日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
/// - `attempt`: 第几次答题
/// - `result`: 成绩
pub fn append_result_record(log_file_path: &str, attempt: usize, result: &QuizResult) -> AppResult<()> {
    let record = ResultRecord {
        attempt,
        finished_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        result,
    };
    let line = serde_json::to_string(&record)?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .map_err(|e| AppError::file_write_failed(log_file_path, e))?;
    writeln!(file, "{}", line).map_err(|e| AppError::file_write_failed(log_file_path, e))?;

    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 选择题答题模式");
    match &config.question_bank_file {
        Some(path) => info!("📁 题库文件: {}", path),
        None => info!("🌐 题库地址: {}", truncate_text(&config.question_source_url, 60)),
    }
    if config.use_all_available {
        info!("📊 题目数量: 全部");
    } else {
        info!("📊 题目数量: {}", config.question_count);
    }
    info!("🔀 洗牌模式: {:?}", config.shuffle_mode);
    info!("{}", "=".repeat(60));
}

/// 记录题库加载信息
///
/// # 参数
/// - `available`: 题库中可用题目数
/// - `effective`: 本次实际抽取的题目数
pub fn log_bank_loaded(available: usize, effective: usize) {
    info!("✓ 题库中共有 {} 道题", available);
    info!("📋 本次将抽取 {} 道题", effective);
}

/// 打印最终统计信息
///
/// # 参数
/// - `result`: 成绩
/// - `log_file_path`: 日志文件路径
pub fn print_final_stats(result: &QuizResult, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 答题完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!(
        "✅ 答对: {}/{} ({} 分, {}%)",
        result.score, result.total_questions, result.total_points, result.percentage
    );
    info!("⏱️ 用时: {}", result.elapsed_display());
    if result.is_passing {
        info!("🎉 通过 (及格线 {} 分)", result.passing_score);
    } else {
        info!("❌ 未通过 (及格线 {} 分)", result.passing_score);
    }
    info!("{}", "=".repeat(60));
    info!("\n成绩已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::scoring::ScoringRules;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("короткий", 20), "короткий");
        assert_eq!(truncate_text("абвгде", 3), "абв...");
    }

    #[test]
    fn test_result_log_lines() {
        let path = std::env::temp_dir().join(format!("quiz_log_{}.txt", std::process::id()));
        let path = path.to_string_lossy().to_string();

        init_log_file(&path).unwrap();
        let result = ScoringRules::default().evaluate(3, 4, 42);
        append_result_record(&path, 1, &result).unwrap();
        append_result_record(&path, 2, &result).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let json_lines: Vec<serde_json::Value> = content
            .lines()
            .filter(|l| l.starts_with('{'))
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert!(content.starts_with(&"=".repeat(60)));
        assert_eq!(json_lines.len(), 2);
        assert_eq!(json_lines[1]["attempt"], 2);
        assert_eq!(json_lines[0]["score"], 3);
        assert_eq!(json_lines[0]["total_points"], 7.5);
        assert_eq!(json_lines[0]["is_passing"], true);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(false);
        init(true);
    }
}
