use quizclock::bank::QuestionBank;
use quizclock::bank::model::{DifficultyTier, Question, QuestionKind, Quiz};
use quizclock::engine::{EngineNotice, QuizEngine, stats};
use quizclock::session::clock::ManualClock;
use quizclock::store::background::BackgroundRecorder;
use quizclock::store::json_store::JsonStore;
use tempfile::TempDir;

fn bank() -> QuestionBank {
    let questions = (0..4)
        .map(|i| Question {
            id: format!("q{i}"),
            prompt: format!("Question {i}"),
            explanation: String::new(),
            options: vec!["yes".into(), "no".into()],
            correct_index: 0,
            kind: QuestionKind::FillBlank {
                template: format!("let x{i} = ____;"),
            },
        })
        .collect();
    QuestionBank::from_quizzes(vec![Quiz {
        id: "blanks".to_string(),
        title: "Blanks".to_string(),
        description: String::new(),
        tier: DifficultyTier::Intermediate,
        category: "scripting".to_string(),
        questions,
    }])
    .unwrap()
}

#[test]
fn completed_sessions_land_in_the_history_file() {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::with_base_dir(dir.path().to_path_buf(), 100).unwrap();
    let clock = ManualClock::new();
    let mut engine = QuizEngine::new(
        bank(),
        clock.clone(),
        BackgroundRecorder::spawn(store),
    );

    // One finished by hand with 3 of 4 right.
    engine.start_quiz("blanks").unwrap();
    for answer in [0, 0, 1, 0] {
        engine.select_answer(answer).unwrap();
        engine.next().unwrap();
    }

    // One left to time out with nothing answered.
    engine.start_quiz("blanks").unwrap();
    clock.advance_secs(300);
    assert!(engine.poll().is_some());

    let notices = engine.drain_notices();
    assert_eq!(
        notices
            .iter()
            .filter(|n| matches!(n, EngineNotice::Completed { .. }))
            .count(),
        2
    );

    assert!(engine.recorder().drain_failures().is_empty());
    // Dropping the engine joins the writer thread.
    drop(engine);

    let reader = JsonStore::with_base_dir(dir.path().to_path_buf(), 100).unwrap();
    let history = reader.load_history().results;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].result.score_percent, 75);
    assert!(!history[0].result.timed_out);
    assert_eq!(history[1].result.score_percent, 0);
    assert!(history[1].result.timed_out);
    assert_eq!(history[1].tier, DifficultyTier::Intermediate);

    let summaries = stats::summarize(&history);
    let blanks = &summaries["blanks"];
    assert_eq!(blanks.attempts, 2);
    assert_eq!(blanks.best_percent, 75);
    assert_eq!(blanks.last_percent, 0);
    assert_eq!(blanks.timeouts, 1);
}
