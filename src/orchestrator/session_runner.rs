//! 单次答题驱动器 - 编排层
//!
//! ## 职责
//!
//! 把一个 [`QuizSession`] 从第一题驱动到成绩页：
//!
//! 1. **显示题目**：进度、当前得分、已用时间
//! 2. **读取选择**：输入编号选中，回车提交，提交前可以改选
//! 3. **揭晓答案**：标出正确选项和选错的选项，停留一段时间
//! 4. **切换题目**：调用 `advance()`，最后一题之后显示成绩
//!
//! 计时器在这里启动和停止，会话本身不持有任何周期任务。

use std::io::Write;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::SessionTimer;
use crate::models::question::QuestionView;
use crate::services::scoring::{format_elapsed, QuizResult};
use crate::workflow::{AdvanceOutcome, AnswerOutcome, QuestionCtx, QuizSession};

/// 终端答题驱动器
///
/// 输入输出都是泛型，测试中可以用内存缓冲代替终端
pub struct ConsoleDriver<R, W> {
    input: R,
    output: W,
    reveal_delay: Duration,
    advance_delay: Duration,
    timer_tick: Duration,
}

impl ConsoleDriver<BufReader<Stdin>, std::io::Stdout> {
    /// 绑定标准输入输出
    pub fn stdio(config: &Config) -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), std::io::stdout(), config)
    }
}

impl<R, W> ConsoleDriver<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(input: R, output: W, config: &Config) -> Self {
        Self {
            input,
            output,
            reveal_delay: Duration::from_millis(config.reveal_delay_ms),
            advance_delay: Duration::from_millis(config.advance_delay_ms),
            timer_tick: Duration::from_millis(config.timer_tick_ms),
        }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    /// 读取一行输入（去掉首尾空白），输入结束时返回 None
    pub async fn read_command(&mut self) -> AppResult<Option<String>> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .await
            .map_err(|e| AppError::Other(format!("读取输入失败: {}", e)))?;

        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// 输出一行文字
    pub fn say(&mut self, text: &str) -> AppResult<()> {
        writeln!(self.output, "{}", text)
            .and_then(|_| self.output.flush())
            .map_err(|e| AppError::Other(format!("终端输出失败: {}", e)))
    }

    /// 驱动一次完整答题
    ///
    /// # 参数
    /// - `session`: 刚创建好的答题会话
    /// - `attempt`: 第几次答题（用于日志）
    ///
    /// # 返回
    /// - `Some(result)`: 答完全部题目
    /// - `None`: 中途输入结束，本次答题作废
    pub async fn run_session(
        &mut self,
        session: &mut QuizSession,
        attempt: usize,
    ) -> AppResult<Option<QuizResult>> {
        let mut timer = SessionTimer::start(session.started_at(), self.timer_tick);
        let outcome = self.drive(session, attempt, &timer).await;
        timer.stop();
        outcome
    }

    async fn drive(
        &mut self,
        session: &mut QuizSession,
        attempt: usize,
        timer: &SessionTimer,
    ) -> AppResult<Option<QuizResult>> {
        let Some(mut view) = session.current_view() else {
            return Ok(Some(session.result()));
        };

        loop {
            let ctx = QuestionCtx::new(attempt, view.number, view.total);
            self.render_question(&view, session.score(), timer.elapsed_seconds())?;

            let Some(choice) = self.read_choice(session, &view).await? else {
                warn!("{} 输入已结束，放弃本次答题", ctx);
                return Ok(None);
            };

            let answer = session.record_answer(choice)?;
            info!(
                "{} {} 当前答对 {} 题",
                ctx,
                if answer.is_correct { "✓ 答对" } else { "✗ 答错" },
                answer.score
            );
            self.render_reveal(&view, &answer)?;

            tokio::time::sleep(self.reveal_delay).await;
            tokio::time::sleep(self.advance_delay).await;

            match session.advance()? {
                AdvanceOutcome::Next { view: next, .. } => view = next,
                AdvanceOutcome::Finished(result) => {
                    self.render_result(&result)?;
                    return Ok(Some(result));
                }
            }
        }
    }

    /// 读取当前题的选择：输入编号选中，空行提交
    async fn read_choice(
        &mut self,
        session: &mut QuizSession,
        view: &QuestionView,
    ) -> AppResult<Option<usize>> {
        let option_count = view.options.len();

        loop {
            let Some(line) = self.read_command().await? else {
                return Ok(None);
            };

            if line.is_empty() {
                match session.selected_option() {
                    Some(selected) => return Ok(Some(selected)),
                    None => {
                        self.say(&format!("请先输入选项编号 (1-{})", option_count))?;
                        continue;
                    }
                }
            }

            match line.parse::<usize>() {
                Ok(number) if number >= 1 => match session.select_option(number - 1) {
                    Ok(()) => self.say(&format!(
                        "已选择 {}. {}，回车提交，或输入其他编号改选",
                        number,
                        view.options[number - 1]
                    ))?,
                    Err(e) => self.say(&format!("⚠️ {}", e))?,
                },
                _ => self.say(&format!("⚠️ 请输入 1-{} 之间的编号", option_count))?,
            }
        }
    }

    fn render_question(&mut self, view: &QuestionView, score: usize, elapsed: u64) -> AppResult<()> {
        self.say(&"─".repeat(60))?;
        self.say(&format!(
            "题目 {}/{}    得分: {}    用时: {}",
            view.number,
            view.total,
            score,
            format_elapsed(elapsed)
        ))?;
        self.say("")?;
        self.say(&view.question_text)?;
        for (i, option) in view.options.iter().enumerate() {
            self.say(&format!("  {}. {}", i + 1, option))?;
        }
        self.say("")
    }

    fn render_reveal(&mut self, view: &QuestionView, answer: &AnswerOutcome) -> AppResult<()> {
        for (i, option) in view.options.iter().enumerate() {
            let mark = if i == answer.correct_index {
                "✓"
            } else if i == answer.selected_index {
                "✗"
            } else {
                " "
            };
            self.say(&format!("{} {}. {}", mark, i + 1, option))?;
        }

        if answer.is_correct {
            self.say("✅ 回答正确")
        } else {
            self.say(&format!(
                "❌ 回答错误，正确答案: {}. {}",
                answer.correct_index + 1,
                view.options[answer.correct_index]
            ))
        }
    }

    fn render_result(&mut self, result: &QuizResult) -> AppResult<()> {
        self.say(&"═".repeat(60))?;
        self.say("📊 答题完成")?;
        self.say(&format!(
            "答对: {}/{}    正确率: {}%",
            result.score, result.total_questions, result.percentage
        ))?;
        self.say(&format!("得分: {}    及格线: {}", result.total_points, result.passing_score))?;
        self.say(&format!("用时: {}", result.elapsed_display()))?;

        if result.is_passing {
            self.say("🎉 恭喜，考试通过！")?;
        } else {
            self.say(&format!(
                "未通过，至少需要 {} 分，请继续努力",
                result.passing_score
            ))?;
        }
        self.say(&"═".repeat(60))
    }
}
