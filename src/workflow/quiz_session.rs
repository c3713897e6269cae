//! 答题会话 - 流程层
//!
//! 持有一次答题的全部可变状态：题目顺序、当前题号、得分、计时起点。
//! 答题界面只通过这里暴露的几个操作驱动流程。

use chrono::{DateTime, Local};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AppResult, BusinessError};
use crate::models::question::{QuestionRecord, QuestionView, SessionQuestion};
use crate::services::reshuffle::ReshuffleStrategy;
use crate::services::scoring::{QuizResult, ScoringRules};
use crate::services::session_builder::{QuestionSelection, SessionBuilder};
use crate::services::shuffle::Shuffler;

/// 作答结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub selected_index: usize,
    pub correct_index: usize,
    pub is_correct: bool,
    /// 作答后的累计答对数
    pub score: usize,
}

/// 切题结果
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceOutcome {
    /// 进入下一题
    Next {
        view: QuestionView,
        strategy: ReshuffleStrategy,
    },
    /// 全部答完
    Finished(QuizResult),
}

/// 一次答题的会话状态
pub struct QuizSession {
    questions: Vec<SessionQuestion>,
    current_index: usize,
    score: usize,
    selected: Option<usize>,
    answered: bool,
    started_at: DateTime<Local>,
    finished_at: Option<DateTime<Local>>,
    shuffler: Shuffler,
    rules: ScoringRules,
    rng: StdRng,
}

impl QuizSession {
    /// 用已经准备好的题目创建会话
    pub fn new(
        questions: Vec<SessionQuestion>,
        shuffler: Shuffler,
        rules: ScoringRules,
        rng: StdRng,
    ) -> AppResult<Self> {
        if questions.is_empty() {
            return Err(BusinessError::EmptyQuestionBank.into());
        }
        for (index, question) in questions.iter().enumerate() {
            validate_question(index, question)?;
        }

        Ok(Self {
            questions,
            current_index: 0,
            score: 0,
            selected: None,
            answered: false,
            started_at: Local::now(),
            finished_at: None,
            shuffler,
            rules,
            rng,
        })
    }

    /// 从题库组卷并开始答题
    pub fn build(
        pool: &[QuestionRecord],
        selection: QuestionSelection,
        shuffler: Shuffler,
        rules: ScoringRules,
        mut rng: StdRng,
    ) -> AppResult<Self> {
        if pool.is_empty() {
            return Err(BusinessError::EmptyQuestionBank.into());
        }

        let questions = SessionBuilder::new(shuffler).build(pool, selection, &mut rng);
        let session = Self::new(questions, shuffler, rules, rng)?;

        info!(
            "📝 开始答题: {} 道题，及格线 {} 分，洗牌模式 {:?}",
            session.len(),
            session.passing_score(),
            shuffler.mode()
        );

        Ok(session)
    }

    /// 按配置组卷，随机数来自系统熵源
    pub fn from_config(pool: &[QuestionRecord], config: &Config) -> AppResult<Self> {
        Self::build(
            pool,
            config.selection(),
            Shuffler::new(config.shuffle_mode),
            ScoringRules::new(config.points_per_question),
            StdRng::from_os_rng(),
        )
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn questions(&self) -> &[SessionQuestion] {
        &self.questions
    }

    pub fn selected_option(&self) -> Option<usize> {
        self.selected
    }

    pub fn passing_score(&self) -> f64 {
        self.rules.passing_score(self.questions.len())
    }

    /// 当前题目，答题结束后返回 None
    pub fn current_view(&self) -> Option<QuestionView> {
        if self.is_finished() {
            return None;
        }
        self.questions
            .get(self.current_index)
            .map(|q| QuestionView::new(q, self.current_index, self.questions.len()))
    }

    /// 选中某个选项（提交前可以反复更改）
    pub fn select_option(&mut self, index: usize) -> AppResult<()> {
        self.check_answerable(index)?;
        self.selected = Some(index);
        Ok(())
    }

    /// 提交当前题的答案并揭晓正确答案
    pub fn record_answer(&mut self, selected_index: usize) -> AppResult<AnswerOutcome> {
        self.check_answerable(selected_index)?;

        let correct_index = self.questions[self.current_index].correct_index;
        let is_correct = selected_index == correct_index;
        if is_correct {
            self.score += 1;
        }
        self.selected = Some(selected_index);
        self.answered = true;

        debug!(
            "第 {} 题: 选择 {}，正确 {}，{}",
            self.current_index + 1,
            selected_index,
            correct_index,
            if is_correct { "答对" } else { "答错" }
        );

        Ok(AnswerOutcome {
            selected_index,
            correct_index,
            is_correct,
            score: self.score,
        })
    }

    /// 进入下一题
    ///
    /// 下一题在成为当前题时重新打乱一次选项（策略随机二选一）；
    /// 最后一题之后结束答题并返回成绩。
    pub fn advance(&mut self) -> AppResult<AdvanceOutcome> {
        if self.is_finished() {
            return Err(BusinessError::SessionFinished.into());
        }

        self.current_index += 1;
        self.selected = None;
        self.answered = false;

        if self.current_index >= self.questions.len() {
            self.finished_at = Some(Local::now());
            let result = self.result();
            info!(
                "🏁 答题结束: {}/{} ({} 分)",
                result.score, result.total_questions, result.total_points
            );
            return Ok(AdvanceOutcome::Finished(result));
        }

        let total = self.questions.len();
        let strategy = ReshuffleStrategy::pick(&mut self.rng);
        let (presented, upcoming) = self.questions.split_at_mut(self.current_index);
        strategy.apply(&self.shuffler, &mut upcoming[0], presented, &mut self.rng);

        debug!(
            "第 {} 题使用 {:?} 策略，正确答案位置 {}",
            self.current_index + 1,
            strategy,
            upcoming[0].correct_index
        );

        let view = QuestionView::new(&upcoming[0], self.current_index, total);
        Ok(AdvanceOutcome::Next { view, strategy })
    }

    /// 已用时（秒），答题结束后固定不变
    pub fn elapsed_seconds(&self) -> u64 {
        let end = self.finished_at.unwrap_or_else(Local::now);
        (end - self.started_at).num_seconds().max(0) as u64
    }

    /// 当前成绩（答题未结束时按已答情况计算）
    pub fn result(&self) -> QuizResult {
        self.rules
            .evaluate(self.score, self.questions.len(), self.elapsed_seconds())
    }

    fn check_answerable(&self, index: usize) -> AppResult<()> {
        if self.is_finished() {
            return Err(BusinessError::SessionFinished.into());
        }
        if self.answered {
            return Err(BusinessError::AlreadyAnswered {
                question_number: self.current_index + 1,
            }
            .into());
        }
        let option_count = self.questions[self.current_index].options.len();
        if index >= option_count {
            return Err(BusinessError::OptionIndexOutOfRange {
                index,
                max_index: option_count - 1,
            }
            .into());
        }
        Ok(())
    }
}

/// 每道题至少一个选项，且正确答案下标在选项范围内
fn validate_question(index: usize, question: &SessionQuestion) -> AppResult<()> {
    let reason = if question.options.is_empty() {
        "没有任何选项".to_string()
    } else if question.correct_index >= question.options.len() {
        format!(
            "正确答案下标 {} 超出选项数量 {}",
            question.correct_index,
            question.options.len()
        )
    } else {
        return Ok(());
    };

    Err(BusinessError::InvalidQuestion {
        question_number: index + 1,
        reason,
    }
    .into())
}
