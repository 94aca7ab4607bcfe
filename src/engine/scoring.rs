use crate::bank::model::Question;
use crate::session::result::QuizResult;

/// Score a finished attempt. An unset answer never matches.
pub fn compute_result(questions: &[Question], answers: &[Option<usize>], timed_out: bool) -> QuizResult {
    let correct_count = questions
        .iter()
        .enumerate()
        .filter(|(i, q)| answers.get(*i).copied().flatten().is_some_and(|a| q.is_correct(a)))
        .count();
    let total_questions = questions.len();

    QuizResult {
        score_percent: score_percent(correct_count, total_questions),
        correct_count,
        total_questions,
        timed_out,
    }
}

/// `round(100 * correct / total)`, halves rounding up.
pub fn score_percent(correct: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (100.0 * correct as f64 / total as f64).round();
    pct.clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::model::QuestionKind;

    fn questions(correct: &[usize]) -> Vec<Question> {
        correct
            .iter()
            .enumerate()
            .map(|(i, &c)| Question {
                id: format!("q{i}"),
                prompt: String::new(),
                explanation: String::new(),
                options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                correct_index: c,
                kind: QuestionKind::MultipleChoice,
            })
            .collect()
    }

    #[test]
    fn all_correct_is_one_hundred() {
        let qs = questions(&[0, 1, 2, 3, 0]);
        let answers = vec![Some(0), Some(1), Some(2), Some(3), Some(0)];
        let r = compute_result(&qs, &answers, false);
        assert_eq!(r.score_percent, 100);
        assert_eq!(r.correct_count, 5);
        assert_eq!(r.total_questions, 5);
        assert!(!r.timed_out);
    }

    #[test]
    fn unset_answers_count_as_incorrect() {
        let qs = questions(&[0; 10]);
        let mut answers = vec![None; 10];
        answers[0] = Some(0);
        let r = compute_result(&qs, &answers, true);
        assert_eq!(r.correct_count, 1);
        assert_eq!(r.score_percent, 10);
        assert!(r.timed_out);
    }

    #[test]
    fn short_answer_slice_is_treated_as_unset() {
        let qs = questions(&[1, 1]);
        let r = compute_result(&qs, &[Some(1)], false);
        assert_eq!(r.correct_count, 1);
        assert_eq!(r.score_percent, 50);
    }

    #[test]
    fn rounds_half_up() {
        // 1/8 = 12.5, 2/3 = 66.67, 1/3 = 33.33
        assert_eq!(score_percent(1, 8), 13);
        assert_eq!(score_percent(2, 3), 67);
        assert_eq!(score_percent(1, 3), 33);
        assert_eq!(score_percent(0, 7), 0);
    }

    #[test]
    fn deterministic_across_calls() {
        let qs = questions(&[2, 0, 1]);
        let answers = vec![Some(2), Some(1), None];
        let first = compute_result(&qs, &answers, false);
        for _ in 0..5 {
            assert_eq!(compute_result(&qs, &answers, false), first);
        }
    }

    #[test]
    fn zero_questions_scores_zero() {
        assert_eq!(score_percent(0, 0), 0);
    }
}
