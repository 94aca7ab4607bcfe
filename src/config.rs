use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
    #[serde(default = "default_quiz_dir")]
    pub quiz_dir: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_notice_secs")]
    pub notice_secs: u64,
}

fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_tick_rate_ms() -> u64 {
    100
}
fn default_quiz_dir() -> String {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quizclock")
        .join("quizzes")
        .to_string_lossy()
        .to_string()
}
fn default_data_dir() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quizclock")
        .to_string_lossy()
        .to_string()
}
fn default_history_limit() -> usize {
    500
}
fn default_notice_secs() -> u64 {
    4
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            tick_rate_ms: default_tick_rate_ms(),
            quiz_dir: default_quiz_dir(),
            data_dir: default_data_dir(),
            history_limit: default_history_limit(),
            notice_secs: default_notice_secs(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quizclock")
            .join("config.toml")
    }

    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    pub fn quiz_path(&self) -> PathBuf {
        PathBuf::from(&self.quiz_dir)
    }

    /// Take the preferences from an imported config. Paths stay local.
    pub fn adopt_preferences(&mut self, imported: &Config) {
        self.theme = imported.theme.clone();
        self.tick_rate_ms = imported.tick_rate_ms;
        self.history_limit = imported.history_limit;
        self.notice_secs = imported.notice_secs;
        self.validate();
    }

    /// Clamp values a hand-edited file may have pushed out of range.
    pub fn validate(&mut self) {
        // Ticks slower than a second would skip visible countdown steps.
        self.tick_rate_ms = self.tick_rate_ms.clamp(16, 1000);
        self.history_limit = self.history_limit.clamp(1, 10_000);
        self.notice_secs = self.notice_secs.clamp(1, 30);
        if self.data_dir.trim().is_empty() {
            self.data_dir = default_data_dir();
        }
        if self.quiz_dir.trim().is_empty() {
            self.quiz_dir = default_quiz_dir();
        }
    }
}
