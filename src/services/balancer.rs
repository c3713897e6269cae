//! 正确答案位置均衡 - 业务能力层
//!
//! 防止正确答案长期集中在同一个选项位置上

use crate::models::question::SessionQuestion;
use tracing::debug;

/// 前几道题只统计、不调整
pub const WARMUP_QUESTIONS: usize = 6;

/// 正确答案位置均衡器
///
/// 按顺序统计每个选项位置作为正确答案的次数。热身阶段之后，
/// 如果当前题正确答案所在位置的次数比最少使用的位置多出 1 次以上，
/// 就把正确答案换到最少使用的位置。
#[derive(Debug, Default)]
pub struct PositionBalancer {
    slot_counts: Vec<usize>,
}

impl PositionBalancer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 对整组题目做一次均衡
    pub fn balance(mut self, questions: Vec<SessionQuestion>) -> Vec<SessionQuestion> {
        let balanced: Vec<SessionQuestion> = questions
            .into_iter()
            .enumerate()
            .map(|(index, mut question)| {
                if index >= WARMUP_QUESTIONS {
                    self.rebalance(index, &mut question);
                }
                self.record(question.correct_index);
                question
            })
            .collect();

        debug!("正确答案位置分布: {:?}", self.slot_counts);
        balanced
    }

    fn rebalance(&self, index: usize, question: &mut SessionQuestion) {
        let Some(least_used) = self.least_used_slot(question.options.len()) else {
            return;
        };

        let current = self.count(question.correct_index);
        let minimum = self.count(least_used);

        if current > minimum + 1 {
            debug!(
                "第 {} 题正确答案从位置 {} 移到位置 {} ({} > {} + 1)",
                index + 1,
                question.correct_index,
                least_used,
                current,
                minimum
            );
            question.move_correct_to(least_used);
        }
    }

    /// 前 `slot_count` 个位置中次数最少的位置，次数相同取下标最小的
    fn least_used_slot(&self, slot_count: usize) -> Option<usize> {
        (0..slot_count).min_by_key(|&slot| (self.count(slot), slot))
    }

    fn count(&self, slot: usize) -> usize {
        self.slot_counts.get(slot).copied().unwrap_or(0)
    }

    fn record(&mut self, slot: usize) {
        if self.slot_counts.len() <= slot {
            self.slot_counts.resize(slot + 1, 0);
        }
        self.slot_counts[slot] += 1;
    }
}
