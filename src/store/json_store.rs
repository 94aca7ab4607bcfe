use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Result, bail};
use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};

use crate::bank::model::DifficultyTier;
use crate::config::Config;
use crate::session::result::QuizResult;
use crate::store::schema::{EXPORT_VERSION, ExportData, ResultHistoryData, ResultRecord};
use crate::store::{PersistenceError, ResultRecorder};

const HISTORY_FILE: &str = "results.json";

pub struct JsonStore {
    base_dir: PathBuf,
    history_limit: usize,
}

impl JsonStore {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_base_dir(config.data_path(), config.history_limit)
    }

    pub fn with_base_dir(base_dir: PathBuf, history_limit: usize) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self {
            base_dir,
            history_limit,
        })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                    tracing::warn!("{} is unreadable, starting fresh: {e}", path.display());
                    T::default()
                }),
                Err(_) => T::default(),
            }
        } else {
            T::default()
        }
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<(), PersistenceError> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Stored history, or an empty one when missing, corrupt or from an older
    /// schema.
    pub fn load_history(&self) -> ResultHistoryData {
        let data: ResultHistoryData = self.load(HISTORY_FILE);
        if data.needs_reset() {
            tracing::warn!(
                "result history schema {} is not supported, starting fresh",
                data.schema_version
            );
            return ResultHistoryData::default();
        }
        data
    }

    pub fn save_history(&self, data: &ResultHistoryData) -> Result<(), PersistenceError> {
        self.save(HISTORY_FILE, data)
    }

    pub fn export_all(&self, config: &Config) -> ExportData {
        ExportData {
            quizclock_export_version: EXPORT_VERSION,
            exported_at: Utc::now(),
            config: config.clone(),
            history: self.load_history(),
        }
    }

    /// Replace the stored history with an export's. The write is atomic, so a
    /// failed import leaves the previous history in place.
    pub fn import_all(&self, data: &ExportData) -> Result<()> {
        if data.quizclock_export_version != EXPORT_VERSION {
            bail!(
                "Unsupported export version: {} (expected {})",
                data.quizclock_export_version,
                EXPORT_VERSION
            );
        }
        if data.history.needs_reset() {
            bail!(
                "Unsupported history schema: {}",
                data.history.schema_version
            );
        }
        let mut history = data.history.clone();
        history.truncate_oldest(self.history_limit);
        if let Err(e) = self.save_history(&history) {
            bail!("Import failed: {e}");
        }
        Ok(())
    }
}

impl ResultRecorder for JsonStore {
    fn record_result(
        &mut self,
        quiz_id: &str,
        category: &str,
        tier: DifficultyTier,
        result: &QuizResult,
    ) -> Result<(), PersistenceError> {
        let mut history = self.load_history();
        history.results.push(ResultRecord {
            quiz_id: quiz_id.to_string(),
            category: category.to_string(),
            tier,
            result: *result,
            recorded_at: Utc::now(),
        });
        history.truncate_oldest(self.history_limit);
        self.save_history(&history)?;
        tracing::debug!("recorded result for {quiz_id} ({} stored)", history.results.len());
        Ok(())
    }
}
