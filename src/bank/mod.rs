pub mod loader;
pub mod model;

pub use loader::{BankError, QuestionBank};
pub use model::{DifficultyTier, Question, QuestionKind, Quiz};
