//! Search history for katafind
//!
//! Records the queries whose suggestions were actually activated, one per
//! line in `~/.katafind/history`. Consecutive duplicates are collapsed and
//! the file is truncated to the configured maximum size.

use std::fs;

use tracing::debug;

use crate::config::HistoryConfig;
use crate::error::Result;

/// File-backed history of activated searches
pub struct SearchHistory {
    /// Recorded queries, oldest first
    entries: Vec<String>,

    /// History configuration
    config: HistoryConfig,
}

impl SearchHistory {
    /// Load history according to configuration
    ///
    /// A missing or unreadable file yields an empty history; persistence
    /// problems never break the session.
    ///
    /// # Arguments
    /// * `config` - History configuration
    ///
    /// # Returns
    /// * `Self` - Loaded history
    pub fn load(config: HistoryConfig) -> Self {
        let mut entries = Vec::new();
        if config.persist {
            if let Ok(contents) = fs::read_to_string(&config.file_path) {
                entries = contents
                    .lines()
                    .map(str::to_string)
                    .filter(|line| !line.is_empty())
                    .collect();
            }
        }

        let mut history = Self { entries, config };
        history.truncate();
        history
    }

    /// Create an empty, non-persistent history
    pub fn in_memory(max_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            config: HistoryConfig {
                persist: false,
                max_size,
                ..HistoryConfig::default()
            },
        }
    }

    /// Record an activated query
    ///
    /// Empty queries and immediate repeats are skipped.
    ///
    /// # Arguments
    /// * `query` - Query text to record
    pub fn record(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }
        if self.entries.last().map(String::as_str) == Some(query) {
            return;
        }
        self.entries.push(query.to_string());
        self.truncate();
    }

    /// Save history to its configured file
    ///
    /// # Returns
    /// * `Result<()>` - Success or error
    pub fn save(&self) -> Result<()> {
        if !self.config.persist {
            return Ok(());
        }
        if let Some(parent) = self.config.file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut contents = self.entries.join("\n");
        if !contents.is_empty() {
            contents.push('\n');
        }
        fs::write(&self.config.file_path, contents)?;
        debug!(
            entries = self.entries.len(),
            path = %self.config.file_path.display(),
            "Saved search history"
        );
        Ok(())
    }

    /// Get recorded queries, oldest first
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Get the most recent query
    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    /// Drop oldest entries beyond the configured maximum
    fn truncate(&mut self) {
        if self.entries.len() > self.config.max_size {
            let excess = self.entries.len() - self.config.max_size;
            self.entries.drain(..excess);
        }
    }
}
