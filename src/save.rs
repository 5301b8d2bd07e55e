/*
Skydash
*/
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Ten playable levels, one record slot each.
pub const LEVEL_SLOTS: usize = 10;

const SAVE_FILE: &str = "save.json";

/// Persisted player progress. Owned by the run state machine; everything
/// else reads it or goes through its mutation methods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
pub struct ProgressRecord {
    pub level_highscores: [f32; LEVEL_SLOTS],
    pub level_completion_times: [f32; LEVEL_SLOTS],
    /// Always the sum of `level_highscores`, recomputed on every change.
    pub overall_highscore: f32,
    /// Always the sum of `level_completion_times`.
    pub total_completion_time: f32,
    pub equipped_skin_index: usize,
    /// One-way flag, flips false -> true when the tutorial is dismissed.
    pub first_time_shown: bool,
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self {
            level_highscores: [0.0; LEVEL_SLOTS],
            level_completion_times: [0.0; LEVEL_SLOTS],
            overall_highscore: 0.0,
            total_completion_time: 0.0,
            equipped_skin_index: 0,
            first_time_shown: false,
        }
    }
}

impl ProgressRecord {
    /// Record slot for a playable level index (1..=10).
    pub fn slot(level_index: usize) -> usize {
        debug_assert!(level_index >= 1, "hub has no record slot");
        level_index - 1
    }

    /// Bank a level completion. The completion time is overwritten
    /// unconditionally (last completion wins); the highscore only when
    /// strictly better. Returns true when a new best score was set.
    pub fn record_completion(&mut self, level_index: usize, score: f32, time_taken: f32) -> bool {
        let slot = Self::slot(level_index);
        self.level_completion_times[slot] = time_taken;

        let new_best = self.level_highscores[slot] < score;
        if new_best {
            self.level_highscores[slot] = score;
        }

        self.recompute_totals();
        new_best
    }

    /// Full-sum recomputation, never incremental.
    pub fn recompute_totals(&mut self) {
        self.overall_highscore = self.level_highscores.iter().sum();
        self.total_completion_time = self.level_completion_times.iter().sum();
    }

    pub fn level_completed(&self, level_index: usize) -> bool {
        self.level_completion_times[Self::slot(level_index)] > 0.0
    }

    pub fn completed_count(&self) -> usize {
        self.level_completion_times.iter().filter(|t| **t > 0.0).count()
    }
}

/// Whole-record blob store for the progress save file.
#[derive(Resource, Debug, Clone)]
pub struct SaveStore {
    root: PathBuf,
}

impl SaveStore {
    pub fn at(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn default_location() -> Self {
        #[cfg(debug_assertions)]
        {
            // Debug builds: save in project directory
            let root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            Self { root }
        }
        #[cfg(not(debug_assertions))]
        {
            // Release builds: save in the user config directory
            let root = dirs::config_dir()
                .map(|mut p| {
                    p.push("Skydash");
                    p
                })
                .unwrap_or_else(|| PathBuf::from("."));
            Self { root }
        }
    }

    fn path(&self) -> PathBuf {
        self.root.join(SAVE_FILE)
    }

    /// None when no save exists yet, or when the file is unreadable/corrupt.
    /// Callers substitute a fresh record; a bad save is never fatal.
    pub fn load(&self) -> Option<ProgressRecord> {
        let path = self.path();
        let contents = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!("Corrupt save at {:?} ({err}), starting fresh", path);
                None
            }
        }
    }

    pub fn save(&self, record: &ProgressRecord) {
        if let Err(err) = std::fs::create_dir_all(&self.root) {
            warn!("Could not create save directory {:?}: {err}", self.root);
            return;
        }
        match serde_json::to_string_pretty(record) {
            Ok(contents) => {
                if let Err(err) = std::fs::write(self.path(), contents) {
                    warn!("Could not write save file: {err}");
                }
            }
            Err(err) => warn!("Could not serialize progress record: {err}"),
        }
    }

    /// Deletes the save file entirely (progress reset).
    pub fn clear(&self) {
        let path = self.path();
        if path.exists() {
            if let Err(err) = std::fs::remove_file(&path) {
                warn!("Could not clear save file: {err}");
            } else {
                info!("Save data cleared");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_time_always_overwritten() {
        let mut record = ProgressRecord::default();

        record.record_completion(4, 40.0, 30.0);
        assert_eq!(record.level_completion_times[3], 30.0);
        assert_eq!(record.level_highscores[3], 40.0);

        // Worse score, slower time: time still overwritten, score kept.
        record.record_completion(4, 25.0, 55.0);
        assert_eq!(record.level_completion_times[3], 55.0);
        assert_eq!(record.level_highscores[3], 40.0);
    }

    #[test]
    fn test_highscore_only_improves() {
        let mut record = ProgressRecord::default();
        record.level_highscores[2] = 40.0;
        record.recompute_totals();

        let improved = record.record_completion(3, 55.0, 20.0);
        assert!(improved);
        assert_eq!(record.level_highscores[2], 55.0);

        let improved = record.record_completion(3, 55.0, 18.0);
        assert!(!improved, "equal score is not a new best");
        assert_eq!(record.level_highscores[2], 55.0);
    }

    #[test]
    fn test_totals_are_exact_sums() {
        let mut record = ProgressRecord::default();
        record.record_completion(1, 80.0, 12.5);
        record.record_completion(10, 60.0, 47.5);

        assert_eq!(record.overall_highscore, 140.0);
        assert_eq!(record.total_completion_time, 60.0);
        assert_eq!(record.completed_count(), 2);
        assert!(record.level_completed(1));
        assert!(!record.level_completed(2));
    }

    #[test]
    fn test_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SaveStore::at(dir.path().to_path_buf());

        assert!(store.load().is_none(), "absent save loads as None");

        let mut record = ProgressRecord::default();
        record.record_completion(2, 76.0, 21.25);
        record.equipped_skin_index = 2;
        record.first_time_shown = true;
        store.save(&record);

        let loaded = store.load().expect("saved record loads back");
        assert_eq!(loaded, record);

        store.clear();
        assert!(store.load().is_none(), "cleared save loads as None");
    }

    #[test]
    fn test_corrupt_save_is_recovered() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SAVE_FILE), "{not json").unwrap();

        let store = SaveStore::at(dir.path().to_path_buf());
        assert!(store.load().is_none());
    }
}
