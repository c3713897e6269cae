//! 答题上下文
//!
//! 封装"第几次答题的第几题"这一信息，主要用于日志前缀

use std::fmt::Display;

/// 答题上下文
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionCtx {
    /// 第几次答题（从1开始，重新开始后递增）
    pub attempt: usize,

    /// 当前题号（从1开始）
    pub question_number: usize,

    /// 本次答题的题目总数
    pub total: usize,
}

impl QuestionCtx {
    pub fn new(attempt: usize, question_number: usize, total: usize) -> Self {
        Self {
            attempt,
            question_number,
            total,
        }
    }
}

impl Display for QuestionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[答题 #{} 题目 {}/{}]",
            self.attempt, self.question_number, self.total
        )
    }
}
