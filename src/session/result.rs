use serde::{Deserialize, Serialize};

/// Scoring outcome of one completed session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub score_percent: u8,
    pub correct_count: usize,
    pub total_questions: usize,
    #[serde(default)]
    pub timed_out: bool,
}

impl QuizResult {
    pub fn incorrect_count(&self) -> usize {
        self.total_questions - self.correct_count
    }

    pub fn is_perfect(&self) -> bool {
        self.total_questions > 0 && self.correct_count == self.total_questions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timed_out_defaults_to_false_when_missing() {
        let json = r#"{"score_percent": 80, "correct_count": 4, "total_questions": 5}"#;
        let result: QuizResult = serde_json::from_str(json).unwrap();
        assert!(!result.timed_out);
        assert_eq!(result.incorrect_count(), 1);
        assert!(!result.is_perfect());
    }
}
