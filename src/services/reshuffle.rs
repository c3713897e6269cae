//! 切题时的二次洗牌 - 业务能力层
//!
//! 每道题在成为当前题的那一刻重新打乱一次选项

use crate::models::question::SessionQuestion;
use crate::services::session_builder::shuffle_tracking_correct;
use crate::services::shuffle::Shuffler;
use rand::Rng;
use tracing::debug;

/// 二次洗牌策略，每道题随机选一种（各 50%）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReshuffleStrategy {
    /// 重新洗牌，正确答案落在哪里就是哪里
    Fresh,
    /// 重新洗牌后，把正确答案换到已展示题目中最少作为正确答案的位置
    Balanced,
}

impl ReshuffleStrategy {
    /// 随机选择一种策略
    pub fn pick<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            ReshuffleStrategy::Fresh
        } else {
            ReshuffleStrategy::Balanced
        }
    }

    /// 对即将展示的题目执行二次洗牌
    ///
    /// # 参数
    /// - `question`: 即将成为当前题的题目
    /// - `presented`: 本次答题中已经展示过的题目（按顺序）
    pub fn apply<R: Rng + ?Sized>(
        self,
        shuffler: &Shuffler,
        question: &mut SessionQuestion,
        presented: &[SessionQuestion],
        rng: &mut R,
    ) {
        let (options, correct_index) =
            shuffle_tracking_correct(shuffler, &question.options, question.correct_index, rng);
        question.options = options;
        question.correct_index = correct_index;

        if self == ReshuffleStrategy::Fresh {
            return;
        }

        let frequencies = slot_frequencies(presented, question.options.len());
        if let Some(target) = least_frequent_other_slot(&frequencies, question.correct_index) {
            debug!(
                "均衡策略: 正确答案从位置 {} 换到位置 {} (频次 {:?})",
                question.correct_index, target, frequencies
            );
            question.move_correct_to(target);
        }
    }
}

/// 统计已展示题目中每个位置作为正确答案的次数
///
/// 只统计 `[0, slot_count)` 范围内的位置。
pub fn slot_frequencies(presented: &[SessionQuestion], slot_count: usize) -> Vec<usize> {
    let mut frequencies = vec![0; slot_count];
    for question in presented {
        if let Some(count) = frequencies.get_mut(question.correct_index) {
            *count += 1;
        }
    }
    frequencies
}

/// 除 `current` 以外频次最低的位置，频次相同取下标最小的
fn least_frequent_other_slot(frequencies: &[usize], current: usize) -> Option<usize> {
    (0..frequencies.len())
        .filter(|&slot| slot != current)
        .min_by_key(|&slot| (frequencies[slot], slot))
}
