use std::collections::HashMap;

use crate::store::schema::ResultRecord;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QuizSummary {
    pub attempts: u32,
    pub best_percent: u8,
    pub last_percent: u8,
    pub timeouts: u32,
}

/// Per-quiz totals, replayed oldest to newest.
pub fn summarize(records: &[ResultRecord]) -> HashMap<String, QuizSummary> {
    let mut out: HashMap<String, QuizSummary> = HashMap::new();
    for record in records {
        let entry = out.entry(record.quiz_id.clone()).or_default();
        entry.attempts += 1;
        entry.best_percent = entry.best_percent.max(record.result.score_percent);
        entry.last_percent = record.result.score_percent;
        if record.result.timed_out {
            entry.timeouts += 1;
        }
    }
    out
}

/// Mean score across all records, or `None` for an empty history.
pub fn average_percent(records: &[ResultRecord]) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    let total: f64 = records.iter().map(|r| r.result.score_percent as f64).sum();
    Some(total / records.len() as f64)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::bank::model::DifficultyTier;
    use crate::session::result::QuizResult;

    fn record(id: &str, pct: u8, timed_out: bool) -> ResultRecord {
        ResultRecord {
            quiz_id: id.to_string(),
            category: "styling".to_string(),
            tier: DifficultyTier::Beginner,
            result: QuizResult {
                score_percent: pct,
                correct_count: 0,
                total_questions: 5,
                timed_out,
            },
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn summary_tracks_best_last_and_timeouts() {
        let records = vec![
            record("css", 40, false),
            record("css", 80, true),
            record("css", 60, false),
            record("html", 100, false),
        ];
        let summary = summarize(&records);
        assert_eq!(
            summary["css"],
            QuizSummary {
                attempts: 3,
                best_percent: 80,
                last_percent: 60,
                timeouts: 1,
            }
        );
        assert_eq!(summary["html"].attempts, 1);
    }

    #[test]
    fn average_of_empty_history_is_none() {
        assert_eq!(average_percent(&[]), None);
        let avg = average_percent(&[record("a", 50, false), record("b", 100, false)]).unwrap();
        assert!((avg - 75.0).abs() < f64::EPSILON);
    }
}
