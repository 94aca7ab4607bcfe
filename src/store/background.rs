use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use crate::bank::model::DifficultyTier;
use crate::session::result::QuizResult;
use crate::store::{PersistenceError, ResultRecorder};

struct Job {
    quiz_id: String,
    category: String,
    tier: DifficultyTier,
    result: QuizResult,
}

/// Runs another recorder on a worker thread.
///
/// `record_result` returns as soon as the job is queued. Write failures come
/// back later through [`BackgroundRecorder::drain_failures`].
pub struct BackgroundRecorder {
    tx: Option<mpsc::Sender<Job>>,
    failures: mpsc::Receiver<PersistenceError>,
    worker: Option<JoinHandle<()>>,
}

impl BackgroundRecorder {
    pub fn spawn<R>(mut inner: R) -> Self
    where
        R: ResultRecorder + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<Job>();
        let (fail_tx, failures) = mpsc::channel();

        let worker = thread::spawn(move || {
            for job in rx {
                if let Err(e) =
                    inner.record_result(&job.quiz_id, &job.category, job.tier, &job.result)
                {
                    tracing::warn!("could not record result for {}: {e}", job.quiz_id);
                    if fail_tx.send(e).is_err() {
                        return;
                    }
                }
            }
        });

        Self {
            tx: Some(tx),
            failures,
            worker: Some(worker),
        }
    }

    pub fn drain_failures(&self) -> Vec<PersistenceError> {
        self.failures.try_iter().collect()
    }

    /// Wait for queued writes to finish and return any failures not yet drained.
    pub fn shutdown(mut self) -> Vec<PersistenceError> {
        self.stop();
        self.drain_failures()
    }

    fn stop(&mut self) {
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!("result writer thread panicked");
            }
        }
    }
}

impl Drop for BackgroundRecorder {
    fn drop(&mut self) {
        self.stop();
    }
}

impl ResultRecorder for BackgroundRecorder {
    fn record_result(
        &mut self,
        quiz_id: &str,
        category: &str,
        tier: DifficultyTier,
        result: &QuizResult,
    ) -> Result<(), PersistenceError> {
        let tx = self.tx.as_ref().ok_or(PersistenceError::WorkerGone)?;
        tx.send(Job {
            quiz_id: quiz_id.to_string(),
            category: category.to_string(),
            tier,
            result: *result,
        })
        .map_err(|_| PersistenceError::WorkerGone)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct Shared {
        seen: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl ResultRecorder for Shared {
        fn record_result(
            &mut self,
            quiz_id: &str,
            _category: &str,
            _tier: DifficultyTier,
            _result: &QuizResult,
        ) -> Result<(), PersistenceError> {
            if self.fail {
                return Err(PersistenceError::Io(std::io::Error::other("disk full")));
            }
            self.seen.lock().unwrap().push(quiz_id.to_string());
            Ok(())
        }
    }

    fn result() -> QuizResult {
        QuizResult {
            score_percent: 50,
            correct_count: 1,
            total_questions: 2,
            timed_out: false,
        }
    }

    #[test]
    fn writes_happen_on_worker() {
        let inner = Shared::default();
        let seen = Arc::clone(&inner.seen);
        let mut recorder = BackgroundRecorder::spawn(inner);
        recorder
            .record_result("a", "markup", DifficultyTier::Beginner, &result())
            .unwrap();
        recorder
            .record_result("b", "markup", DifficultyTier::Beginner, &result())
            .unwrap();
        assert!(recorder.shutdown().is_empty());
        assert_eq!(*seen.lock().unwrap(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn failures_are_reported_back() {
        let inner = Shared {
            fail: true,
            ..Shared::default()
        };
        let mut recorder = BackgroundRecorder::spawn(inner);
        recorder
            .record_result("a", "markup", DifficultyTier::Beginner, &result())
            .unwrap();
        let failures = recorder.shutdown();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].to_string().contains("disk full"));
    }
}
