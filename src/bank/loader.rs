use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bank::model::Quiz;

#[derive(Embed)]
#[folder = "assets/quizzes/"]
struct QuizAssets;

#[derive(Debug, Error)]
pub enum BankError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse {name}: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("quiz '{quiz_id}', question '{question_id}': {reason}")]
    InvalidQuestion {
        quiz_id: String,
        question_id: String,
        reason: String,
    },
    #[error("quiz id '{0}' is defined more than once")]
    DuplicateQuiz(String),
}

/// On-disk shape of a bank file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BankFile {
    pub quizzes: Vec<Quiz>,
}

/// Read-only catalog of quizzes, in load order.
#[derive(Clone, Debug, Default)]
pub struct QuestionBank {
    quizzes: Vec<Arc<Quiz>>,
}

impl QuestionBank {
    pub fn from_quizzes(quizzes: Vec<Quiz>) -> Result<Self, BankError> {
        let mut bank = Self::default();
        bank.extend(quizzes)?;
        Ok(bank)
    }

    /// Bundled banks only.
    pub fn embedded() -> Result<Self, BankError> {
        let mut bank = Self::default();
        let mut names: Vec<String> = QuizAssets::iter()
            .filter(|f| f.ends_with(".json"))
            .map(|f| f.to_string())
            .collect();
        names.sort();
        for name in names {
            let Some(file) = QuizAssets::get(&name) else {
                continue;
            };
            let parsed = parse_bank(&name, file.data.as_ref())?;
            bank.extend(parsed.quizzes)?;
        }
        Ok(bank)
    }

    /// Bundled banks plus every `*.json` file found in `extra_dirs`.
    ///
    /// A broken user file is skipped and reported back rather than failing the
    /// whole load; a broken bundled file is a hard error.
    pub fn load(extra_dirs: &[PathBuf]) -> Result<(Self, Vec<BankError>), BankError> {
        let mut bank = Self::embedded()?;
        let mut skipped = Vec::new();
        for dir in extra_dirs {
            for path in bank_files_in(dir) {
                let result = read_bank_file(&path).and_then(|file| bank.extend(file.quizzes));
                if let Err(err) = result {
                    tracing::warn!("skipping quiz bank {}: {err}", path.display());
                    skipped.push(err);
                }
            }
        }
        tracing::info!("question bank loaded with {} quizzes", bank.len());
        Ok((bank, skipped))
    }

    /// Validates the whole batch before adding any of it.
    fn extend(&mut self, quizzes: Vec<Quiz>) -> Result<(), BankError> {
        let mut seen: HashSet<&str> = self.quizzes.iter().map(|q| q.id.as_str()).collect();
        for quiz in &quizzes {
            validate_quiz(quiz)?;
            if !seen.insert(quiz.id.as_str()) {
                return Err(BankError::DuplicateQuiz(quiz.id.clone()));
            }
            if quiz.is_empty() {
                tracing::warn!("quiz '{}' has no questions and cannot be started", quiz.id);
            }
        }
        self.quizzes.extend(quizzes.into_iter().map(Arc::new));
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<Arc<Quiz>> {
        self.quizzes.iter().find(|q| q.id == id).cloned()
    }

    pub fn quizzes(&self) -> &[Arc<Quiz>] {
        &self.quizzes
    }

    pub fn len(&self) -> usize {
        self.quizzes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quizzes.is_empty()
    }

    /// Categories in order of first appearance.
    pub fn categories(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for quiz in &self.quizzes {
            if !out.contains(&quiz.category.as_str()) {
                out.push(&quiz.category);
            }
        }
        out
    }

    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Arc<Quiz>> {
        self.quizzes.iter().filter(move |q| q.category == category)
    }
}

fn parse_bank(name: &str, bytes: &[u8]) -> Result<BankFile, BankError> {
    serde_json::from_slice(bytes).map_err(|source| BankError::Parse {
        name: name.to_string(),
        source,
    })
}

fn read_bank_file(path: &Path) -> Result<BankFile, BankError> {
    let bytes = fs::read(path).map_err(|source| BankError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_bank(&path.display().to_string(), &bytes)
}

fn bank_files_in(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|x| x.to_str()) == Some("json"))
        .collect();
    files.sort();
    files
}

fn validate_quiz(quiz: &Quiz) -> Result<(), BankError> {
    let invalid = |question_id: &str, reason: String| BankError::InvalidQuestion {
        quiz_id: quiz.id.clone(),
        question_id: question_id.to_string(),
        reason,
    };

    let mut ids = HashSet::new();
    for question in &quiz.questions {
        if question.options.len() < 2 {
            return Err(invalid(
                &question.id,
                format!("needs at least 2 options, has {}", question.options.len()),
            ));
        }
        if question.correct_index >= question.options.len() {
            return Err(invalid(
                &question.id,
                format!(
                    "correct_index {} is out of range for {} options",
                    question.correct_index,
                    question.options.len()
                ),
            ));
        }
        if !ids.insert(question.id.as_str()) {
            return Err(invalid(&question.id, "duplicate question id".to_string()));
        }
    }
    Ok(())
}
