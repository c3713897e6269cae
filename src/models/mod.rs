pub mod loaders;
pub mod question;

pub use loaders::{load_question_bank_file, parse_questions};
pub use question::{QuestionRecord, QuestionView, SessionQuestion};
