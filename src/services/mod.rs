pub mod balancer;
pub mod question_bank;
pub mod reshuffle;
pub mod scoring;
pub mod session_builder;
pub mod shuffle;

pub use balancer::PositionBalancer;
pub use question_bank::{QuestionBank, QuestionSource};
pub use reshuffle::ReshuffleStrategy;
pub use scoring::{QuizResult, ScoringRules};
pub use session_builder::{QuestionSelection, SessionBuilder};
pub use shuffle::{ShuffleMode, Shuffler};
