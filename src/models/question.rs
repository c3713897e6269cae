/// 题库中解析出的一道题（解析后不再修改）
///
/// 题库格式约定第一个选项就是正确答案，所以解析后 `correct_index` 恒为 0。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    pub text: String,
    pub options: Vec<String>,
    pub correct_index: usize,
}

impl QuestionRecord {
    pub fn new(text: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            text: text.into(),
            options,
            correct_index: 0,
        }
    }

    /// 正确答案文本
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }
}

impl std::fmt::Display for QuestionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // 截断题干以便显示（最多80个字符）
        let preview = if self.text.chars().count() > 80 {
            self.text.chars().take(80).collect::<String>() + "..."
        } else {
            self.text.clone()
        };
        write!(f, "{} [{} 个选项]", preview, self.options.len())
    }
}

/// 本次答题中使用的题目副本
///
/// 选项顺序可以被反复打乱，但 `options[correct_index]` 始终是原题的正确答案。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionQuestion {
    pub text: String,
    pub options: Vec<String>,
    pub correct_index: usize,
}

impl SessionQuestion {
    /// 正确答案文本
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }

    /// 把正确答案换到指定位置，原位置放入被换走的选项
    pub fn move_correct_to(&mut self, slot: usize) {
        self.options.swap(self.correct_index, slot);
        self.correct_index = slot;
    }
}

impl From<&QuestionRecord> for SessionQuestion {
    fn from(record: &QuestionRecord) -> Self {
        Self {
            text: record.text.clone(),
            options: record.options.clone(),
            correct_index: record.correct_index,
        }
    }
}

/// 展示给答题界面的当前题目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    /// 题号（从1开始）
    pub number: usize,
    /// 题目总数
    pub total: usize,
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_index: usize,
}

impl QuestionView {
    pub fn new(question: &SessionQuestion, index: usize, total: usize) -> Self {
        Self {
            number: index + 1,
            total,
            question_text: question.text.clone(),
            options: question.options.clone(),
            correct_index: question.correct_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_correct_keeps_texts() {
        let record = QuestionRecord::new(
            "2 + 2 = ?",
            vec!["4".into(), "3".into(), "5".into()],
        );
        let mut question = SessionQuestion::from(&record);

        question.move_correct_to(2);

        assert_eq!(question.correct_index, 2);
        assert_eq!(question.correct_option(), "4");
        assert_eq!(question.options, vec!["5", "3", "4"]);
    }

    #[test]
    fn test_display_truncates_long_text() {
        let record = QuestionRecord::new("я".repeat(100), vec!["a".into()]);
        let shown = record.to_string();
        assert!(shown.starts_with(&"я".repeat(80)));
        assert!(shown.contains("...") && shown.ends_with("[1 个选项]"));
    }
}
