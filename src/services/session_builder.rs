//! 组卷服务 - 业务能力层
//!
//! 从题库中抽题、打乱选项、均衡正确答案位置

use crate::models::question::{QuestionRecord, SessionQuestion};
use crate::services::balancer::PositionBalancer;
use crate::services::shuffle::Shuffler;
use rand::Rng;
use tracing::debug;

/// 抽题方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionSelection {
    /// 抽取指定数量（题库不足时取全部）
    Count(usize),
    /// 使用全部题目
    All,
}

impl QuestionSelection {
    /// 在给定题库大小下实际会抽到的题目数
    pub fn effective_count(&self, available: usize) -> usize {
        match self {
            QuestionSelection::Count(n) => (*n).min(available),
            QuestionSelection::All => available,
        }
    }
}

/// 组卷器
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionBuilder {
    shuffler: Shuffler,
}

impl SessionBuilder {
    pub fn new(shuffler: Shuffler) -> Self {
        Self { shuffler }
    }

    /// 生成本次答题的题目顺序
    ///
    /// 1. 打乱整个题库
    /// 2. 取前 N 道（或全部）
    /// 3. 逐题打乱选项并重新定位正确答案
    /// 4. 均衡正确答案位置
    pub fn build<R: Rng + ?Sized>(
        &self,
        pool: &[QuestionRecord],
        selection: QuestionSelection,
        rng: &mut R,
    ) -> Vec<SessionQuestion> {
        let shuffled_pool = self.shuffler.shuffle(pool, rng);
        let count = selection.effective_count(shuffled_pool.len());

        debug!("从 {} 道题中抽取 {} 道", pool.len(), count);

        let prepared: Vec<SessionQuestion> = shuffled_pool
            .iter()
            .take(count)
            .map(|record| self.shuffle_options(record, &mut *rng))
            .collect();

        PositionBalancer::new().balance(prepared)
    }

    /// 打乱一道题的选项，正确答案按原位置追踪
    pub fn shuffle_options<R: Rng + ?Sized>(
        &self,
        record: &QuestionRecord,
        rng: &mut R,
    ) -> SessionQuestion {
        let (options, correct_index) =
            shuffle_tracking_correct(&self.shuffler, &record.options, record.correct_index, rng);
        SessionQuestion {
            text: record.text.clone(),
            options,
            correct_index,
        }
    }
}

/// 打乱选项并返回正确答案的新位置
///
/// 打乱的是（原下标，文本）对，即使存在重复文本也能准确定位。
pub(crate) fn shuffle_tracking_correct<R: Rng + ?Sized>(
    shuffler: &Shuffler,
    options: &[String],
    correct_index: usize,
    rng: &mut R,
) -> (Vec<String>, usize) {
    let indexed: Vec<(usize, &String)> = options.iter().enumerate().collect();
    let shuffled = shuffler.shuffle(&indexed, rng);

    let new_correct = shuffled
        .iter()
        .position(|(original, _)| *original == correct_index)
        .unwrap_or(0);
    let options = shuffled.into_iter().map(|(_, text)| text.clone()).collect();

    (options, new_correct)
}
