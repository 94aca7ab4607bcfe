use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyTier {
    Beginner,
    Intermediate,
    Advanced,
}

impl DifficultyTier {
    /// Fixed countdown length for every quiz of this tier.
    pub fn time_limit_secs(self) -> u32 {
        match self {
            DifficultyTier::Beginner => 120,
            DifficultyTier::Intermediate => 300,
            DifficultyTier::Advanced => 600,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DifficultyTier::Beginner => "Beginner",
            DifficultyTier::Intermediate => "Intermediate",
            DifficultyTier::Advanced => "Advanced",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice,
    FillBlank { template: String },
    SyntaxFix { broken_code: String },
}

impl QuestionKind {
    pub fn label(&self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice => "Multiple choice",
            QuestionKind::FillBlank { .. } => "Fill in the blank",
            QuestionKind::SyntaxFix { .. } => "Fix the syntax",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    #[serde(default)]
    pub explanation: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

impl Question {
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_index
    }

    pub fn option_count(&self) -> usize {
        self.options.len()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub tier: DifficultyTier,
    pub category: String,
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn time_limit_secs(&self) -> u32 {
        self.tier.time_limit_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_limits_follow_tier_table() {
        assert_eq!(DifficultyTier::Beginner.time_limit_secs(), 120);
        assert_eq!(DifficultyTier::Intermediate.time_limit_secs(), 300);
        assert_eq!(DifficultyTier::Advanced.time_limit_secs(), 600);
    }

    #[test]
    fn question_kind_is_flattened_into_question() {
        let json = r#"{
            "id": "q1",
            "prompt": "Fix the tag",
            "options": ["<p>", "<p/"],
            "correct_index": 0,
            "kind": "syntax_fix",
            "broken_code": "<p"
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(
            q.kind,
            QuestionKind::SyntaxFix {
                broken_code: "<p".to_string()
            }
        );
        assert!(q.explanation.is_empty());
        assert!(q.is_correct(0));
        assert!(!q.is_correct(1));
    }

    #[test]
    fn tier_serializes_lowercase() {
        let s = serde_json::to_string(&DifficultyTier::Intermediate).unwrap();
        assert_eq!(s, "\"intermediate\"");
    }
}
