pub mod text_loader;

pub use text_loader::{load_question_bank_file, parse_questions};
