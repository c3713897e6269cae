//! 计分服务 - 业务能力层

use serde::Serialize;

/// 计分规则
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringRules {
    pub points_per_question: f64,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            points_per_question: 2.5,
        }
    }
}

impl ScoringRules {
    pub fn new(points_per_question: f64) -> Self {
        Self {
            points_per_question,
        }
    }

    /// 及格线：满分的 50%，向上取整
    pub fn passing_score(&self, total_questions: usize) -> f64 {
        (total_questions as f64 * self.points_per_question * 0.5).ceil()
    }

    /// 根据答对数量生成成绩
    pub fn evaluate(&self, score: usize, total_questions: usize, elapsed_seconds: u64) -> QuizResult {
        let total_points = score as f64 * self.points_per_question;
        let passing_score = self.passing_score(total_questions);
        let percentage = if total_questions == 0 {
            0
        } else {
            ((score as f64 / total_questions as f64) * 100.0).round() as u32
        };

        QuizResult {
            score,
            total_questions,
            total_points,
            passing_score,
            elapsed_seconds,
            is_passing: total_points >= passing_score,
            percentage,
        }
    }
}

/// 最终成绩
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizResult {
    /// 答对题数
    pub score: usize,
    pub total_questions: usize,
    /// 得分
    pub total_points: f64,
    /// 及格线
    pub passing_score: f64,
    /// 用时（秒）
    pub elapsed_seconds: u64,
    pub is_passing: bool,
    /// 正确率（四舍五入的百分数）
    pub percentage: u32,
}

impl QuizResult {
    /// 用时，格式 MM:SS
    pub fn elapsed_display(&self) -> String {
        format_elapsed(self.elapsed_seconds)
    }
}

/// 把秒数格式化为 MM:SS
pub fn format_elapsed(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
