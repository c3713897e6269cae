pub mod question_ctx;
pub mod quiz_session;

pub use question_ctx::QuestionCtx;
pub use quiz_session::{AdvanceOutcome, AnswerOutcome, QuizSession};
