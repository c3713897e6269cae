use crate::error::{AppError, AppResult, FileError};
use crate::models::question::QuestionRecord;
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// 题干行标记
const QUESTION_MARKER: &str = "#####";
/// 选项行标记
const OPTION_MARKER: &str = "?????";

/// 将题库文本解析为题目列表
///
/// 格式：
/// ```text
/// #####题干
/// ?????正确答案（总是第一个）
/// ?????其他选项
/// ```
///
/// 解析是宽松的：无法识别的行直接忽略，没有选项的题目直接丢弃，
/// 空文本得到空列表而不是错误。
pub fn parse_questions(raw: &str) -> Vec<QuestionRecord> {
    let mut parsed = Vec::new();
    let mut current_text: Option<String> = None;
    let mut current_options: Vec<String> = Vec::new();

    for line in raw.lines() {
        let line = line.trim();

        if let Some(rest) = line.strip_prefix(QUESTION_MARKER) {
            // 遇到新题干，先提交上一题
            commit_question(&mut parsed, current_text.take(), &mut current_options);

            let text = rest.trim();
            // 空题干不算一道题，后面的选项会随它一起被丢弃
            current_text = (!text.is_empty()).then(|| text.to_string());
        } else if let Some(rest) = line.strip_prefix(OPTION_MARKER) {
            let option = rest.trim();
            if !option.is_empty() {
                current_options.push(option.to_string());
            }
        }
    }

    commit_question(&mut parsed, current_text.take(), &mut current_options);

    parsed
}

fn commit_question(
    parsed: &mut Vec<QuestionRecord>,
    text: Option<String>,
    options: &mut Vec<String>,
) {
    let options = std::mem::take(options);
    match text {
        Some(text) if !options.is_empty() => parsed.push(QuestionRecord::new(text, options)),
        Some(text) => debug!("丢弃没有选项的题目: {}", text),
        None if !options.is_empty() => debug!("丢弃 {} 个不属于任何题目的选项", options.len()),
        None => {}
    }
}

/// 从本地文件加载题库并解析
pub async fn load_question_bank_file(path: &Path) -> AppResult<Vec<QuestionRecord>> {
    if !path.exists() {
        return Err(FileError::NotFound {
            path: path.display().to_string(),
        }
        .into());
    }

    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

    let questions = parse_questions(&content);
    tracing::info!(
        "成功从 {} 加载 {} 个题目",
        path.file_name().unwrap_or_default().to_string_lossy(),
        questions.len()
    );

    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
#####Столица Франции?
?????Париж
?????Лион
?????Марсель
#####2 + 2 = ?
?????4
?????5
";

    #[test]
    fn test_parse_basic() {
        let questions = parse_questions(SAMPLE);

        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].text, "Столица Франции?");
        assert_eq!(questions[0].options, vec!["Париж", "Лион", "Марсель"]);
        assert_eq!(questions[1].options, vec!["4", "5"]);
        assert!(questions.iter().all(|q| q.correct_index == 0));
    }

    #[test]
    fn test_parse_is_repeatable() {
        assert_eq!(parse_questions(SAMPLE), parse_questions(SAMPLE));
    }

    #[test]
    fn test_consecutive_question_markers_drop_first() {
        let raw = "#####без вариантов\n#####с вариантами\n?????да\n";
        let questions = parse_questions(raw);

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].text, "с вариантами");
    }

    #[test]
    fn test_trims_and_skips_empty_options() {
        let raw = "  #####  Вопрос  \r\n?????   ответ  \r\n?????   \r\nмусор\n?????второй\n";
        let questions = parse_questions(raw);

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].text, "Вопрос");
        assert_eq!(questions[0].options, vec!["ответ", "второй"]);
    }

    #[test]
    fn test_empty_and_malformed_input() {
        assert!(parse_questions("").is_empty());
        assert!(parse_questions("просто текст\nбез маркеров").is_empty());
        // 题干为空的题目被丢弃
        assert!(parse_questions("#####\n?????a\n?????b").is_empty());
        // 第一个题干之前的选项被丢弃
        let questions = parse_questions("?????потерян\n#####Q\n?????A");
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].options, vec!["A"]);
    }

    #[tokio::test]
    async fn test_load_question_bank_file() {
        let path = std::env::temp_dir().join(format!("quiz_bank_{}.txt", std::process::id()));
        tokio::fs::write(&path, SAMPLE).await.unwrap();

        let questions = load_question_bank_file(&path).await.unwrap();
        assert_eq!(questions.len(), 2);

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = load_question_bank_file(Path::new("/definitely/not/here.txt")).await;
        assert!(matches!(
            result,
            Err(AppError::File(FileError::NotFound { .. }))
        ));
    }
}
