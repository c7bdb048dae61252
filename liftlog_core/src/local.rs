//! Local file-backed store.
//!
//! Rows are persisted under a data directory as JSONL append logs (one file
//! per table) plus single-document JSON state files for the profile, streak
//! and records. All reads and appends take advisory file locks, and state
//! files are replaced atomically:
//! 1. Writing to a temp file
//! 2. Syncing to disk
//! 3. Renaming over the original

use crate::{
    ActivityEntry, Error, Exercise, ExerciseCategory, ExerciseSet, NewExerciseSet, NewWorkout,
    NewWorkoutExercise, PersonalRecord, Profile, Result, Streak, Workout, WorkoutExercise,
    WorkoutStore,
};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

const WORKOUTS_FILE: &str = "workouts.jsonl";
const WORKOUT_EXERCISES_FILE: &str = "workout_exercises.jsonl";
const SETS_FILE: &str = "exercise_sets.jsonl";
const ACTIVITY_FILE: &str = "activity.jsonl";
const PROFILE_FILE: &str = "profile.json";
const STREAK_FILE: &str = "streak.json";
const RECORDS_FILE: &str = "records.json";

/// File-backed [`WorkoutStore`] scoped to one user's data directory
pub struct LocalStore {
    data_dir: PathBuf,
    exercises: Vec<Exercise>,
    default_profile: Profile,
}

impl LocalStore {
    /// Open (creating if needed) the store at `data_dir`.
    ///
    /// The exercise table is the preset catalog merged with the caller's
    /// custom definitions; a custom exercise reusing a preset id replaces it.
    pub fn open(
        data_dir: impl Into<PathBuf>,
        default_profile: Profile,
        custom_exercises: Vec<Exercise>,
    ) -> Result<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;

        let mut exercises: Vec<Exercise> = crate::catalog::get_default_catalog()
            .exercises
            .values()
            .cloned()
            .collect();
        for custom in custom_exercises {
            if let Some(existing) = exercises.iter_mut().find(|e| e.id == custom.id) {
                tracing::warn!("Custom exercise {} shadows a preset", custom.id);
                *existing = custom;
            } else {
                exercises.push(custom);
            }
        }

        Ok(Self {
            data_dir,
            exercises,
            default_profile,
        })
    }

    fn path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }
}

// ----------------------------------------------------------------------------
// File helpers
// ----------------------------------------------------------------------------

/// Append one row to a JSONL table with an exclusive lock
fn append_line<T: Serialize>(path: &Path, row: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    file.lock_exclusive()?;

    let mut writer = std::io::BufWriter::new(&file);
    let line = serde_json::to_string(row)?;
    writer.write_all(line.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    file.unlock()?;
    Ok(())
}

/// Read every row from a JSONL table with a shared lock
///
/// Missing files read as empty. Corrupt lines are logged and skipped so one
/// bad write cannot take the whole table down.
fn read_lines<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut rows = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<T>(&line) {
            Ok(row) => rows.push(row),
            Err(e) => {
                tracing::warn!(
                    "Skipping corrupt row at {:?}:{}: {}",
                    path,
                    line_num + 1,
                    e
                );
            }
        }
    }

    file.unlock()?;
    Ok(rows)
}

/// Atomically replace a JSONL table with the given rows
fn rewrite_lines<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| Error::Store(format!("Table path {:?} has no parent", path)))?;
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        for row in rows {
            let line = serde_json::to_string(row)?;
            writer.write_all(line.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

/// Load a single-document state file, degrading to `None` on problems
fn load_state<T: DeserializeOwned>(path: &Path) -> Option<T> {
    if !path.exists() {
        return None;
    }

    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            tracing::warn!("Unable to read state file {:?}: {}. Using defaults.", path, e);
            return None;
        }
    };

    match serde_json::from_str::<T>(&contents) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Failed to parse state file {:?}: {}. Using defaults.", path, e);
            None
        }
    }
}

/// Atomically write a single-document state file
fn store_state<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| Error::Store(format!("State path {:?} has no parent", path)))?;
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        let contents = serde_json::to_string(value)?;
        writer.write_all(contents.as_bytes())?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::debug!("Saved state to {:?}", path);
    Ok(())
}

// ----------------------------------------------------------------------------
// WorkoutStore implementation
// ----------------------------------------------------------------------------

impl WorkoutStore for LocalStore {
    fn list_exercises(&self, category: ExerciseCategory) -> Result<Vec<Exercise>> {
        let mut matching: Vec<Exercise> = self
            .exercises
            .iter()
            .filter(|e| e.category == category)
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(matching)
    }

    fn get_exercise(&self, id: &str) -> Result<Option<Exercise>> {
        Ok(self.exercises.iter().find(|e| e.id == id).cloned())
    }

    fn load_profile(&self) -> Result<Profile> {
        Ok(load_state(&self.path(PROFILE_FILE)).unwrap_or_else(|| self.default_profile.clone()))
    }

    fn load_streak(&self) -> Result<Streak> {
        Ok(load_state(&self.path(STREAK_FILE)).unwrap_or_default())
    }

    fn load_records(&self) -> Result<Vec<PersonalRecord>> {
        Ok(load_state(&self.path(RECORDS_FILE)).unwrap_or_default())
    }

    fn get_workout(&self, id: Uuid) -> Result<Option<Workout>> {
        let workouts: Vec<Workout> = read_lines(&self.path(WORKOUTS_FILE))?;
        Ok(workouts.into_iter().find(|w| w.id == id))
    }

    fn list_workouts_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<Workout>> {
        let mut workouts: Vec<Workout> = read_lines(&self.path(WORKOUTS_FILE))?;
        workouts.retain(|w| w.started_at >= cutoff);
        workouts.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(workouts)
    }

    fn list_workout_exercises(&self, workout_id: Uuid) -> Result<Vec<WorkoutExercise>> {
        let mut rows: Vec<WorkoutExercise> = read_lines(&self.path(WORKOUT_EXERCISES_FILE))?;
        rows.retain(|we| we.workout_id == workout_id);
        rows.sort_by_key(|we| we.order_index);
        Ok(rows)
    }

    fn list_sets(&self, workout_exercise_id: Uuid) -> Result<Vec<ExerciseSet>> {
        let mut rows: Vec<ExerciseSet> = read_lines(&self.path(SETS_FILE))?;
        rows.retain(|s| s.workout_exercise_id == workout_exercise_id);
        rows.sort_by_key(|s| s.set_number);
        Ok(rows)
    }

    fn insert_workout(&mut self, new: &NewWorkout) -> Result<Workout> {
        let workout = Workout {
            id: Uuid::new_v4(),
            name: new.name.clone(),
            started_at: new.started_at,
            ended_at: new.ended_at,
        };
        append_line(&self.path(WORKOUTS_FILE), &workout)?;
        tracing::debug!("Inserted workout {}", workout.id);
        Ok(workout)
    }

    fn insert_workout_exercise(&mut self, new: &NewWorkoutExercise) -> Result<WorkoutExercise> {
        if self.get_exercise(&new.exercise_id)?.is_none() {
            return Err(Error::Store(format!(
                "Unknown exercise id: {}",
                new.exercise_id
            )));
        }
        let row = WorkoutExercise {
            id: Uuid::new_v4(),
            workout_id: new.workout_id,
            exercise_id: new.exercise_id.clone(),
            order_index: new.order_index,
        };
        append_line(&self.path(WORKOUT_EXERCISES_FILE), &row)?;
        Ok(row)
    }

    fn insert_sets(&mut self, sets: &[NewExerciseSet]) -> Result<Vec<ExerciseSet>> {
        let mut inserted = Vec::with_capacity(sets.len());
        for new in sets {
            let row = ExerciseSet {
                id: Uuid::new_v4(),
                workout_exercise_id: new.workout_exercise_id,
                set_number: new.set_number,
                weight: new.weight,
                reps: new.reps,
                is_warmup: new.is_warmup,
            };
            append_line(&self.path(SETS_FILE), &row)?;
            inserted.push(row);
        }
        Ok(inserted)
    }

    fn save_streak(&mut self, streak: &Streak) -> Result<()> {
        store_state(&self.path(STREAK_FILE), streak)
    }

    fn save_records(&mut self, records: &[PersonalRecord]) -> Result<()> {
        store_state(&self.path(RECORDS_FILE), &records)
    }

    fn insert_activity(&mut self, entry: &ActivityEntry) -> Result<()> {
        append_line(&self.path(ACTIVITY_FILE), entry)
    }

    fn delete_workout(&mut self, id: Uuid) -> Result<()> {
        let mut workouts: Vec<Workout> = read_lines(&self.path(WORKOUTS_FILE))?;
        workouts.retain(|w| w.id != id);
        rewrite_lines(&self.path(WORKOUTS_FILE), &workouts)
    }

    fn delete_workout_exercise(&mut self, id: Uuid) -> Result<()> {
        let mut rows: Vec<WorkoutExercise> = read_lines(&self.path(WORKOUT_EXERCISES_FILE))?;
        rows.retain(|we| we.id != id);
        rewrite_lines(&self.path(WORKOUT_EXERCISES_FILE), &rows)
    }

    fn delete_sets_for(&mut self, workout_exercise_id: Uuid) -> Result<()> {
        let mut rows: Vec<ExerciseSet> = read_lines(&self.path(SETS_FILE))?;
        rows.retain(|s| s.workout_exercise_id != workout_exercise_id);
        rewrite_lines(&self.path(SETS_FILE), &rows)
    }

    fn delete_activity(&mut self, id: Uuid) -> Result<()> {
        let mut rows: Vec<ActivityEntry> = read_lines(&self.path(ACTIVITY_FILE))?;
        rows.retain(|a| a.id != id);
        rewrite_lines(&self.path(ACTIVITY_FILE), &rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_store(dir: &Path) -> LocalStore {
        LocalStore::open(dir, Profile::default(), vec![]).unwrap()
    }

    #[test]
    fn test_insert_and_list_workouts() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = open_store(temp_dir.path());

        let now = Utc::now();
        let workout = store
            .insert_workout(&NewWorkout {
                name: "Push Day".into(),
                started_at: now,
                ended_at: now,
            })
            .unwrap();

        let listed = store
            .list_workouts_since(now - chrono::Duration::days(1))
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, workout.id);
    }

    #[test]
    fn test_profile_defaults_when_missing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let defaults = Profile {
            rest_timer_seconds: 120,
            ..Profile::default()
        };
        let store = LocalStore::open(temp_dir.path(), defaults, vec![]).unwrap();

        let profile = store.load_profile().unwrap();
        assert_eq!(profile.rest_timer_seconds, 120);
    }

    #[test]
    fn test_streak_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = open_store(temp_dir.path());

        let streak = Streak {
            current_streak: 3,
            longest_streak: 7,
            last_workout_date: Some(chrono::NaiveDate::from_ymd_opt(2026, 8, 1).unwrap()),
        };
        store.save_streak(&streak).unwrap();

        let loaded = store.load_streak().unwrap();
        assert_eq!(loaded, streak);
    }

    #[test]
    fn test_corrupted_streak_returns_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = open_store(temp_dir.path());
        store
            .save_streak(&Streak {
                current_streak: 5,
                longest_streak: 5,
                last_workout_date: None,
            })
            .unwrap();

        std::fs::write(temp_dir.path().join(STREAK_FILE), "{ invalid json }").unwrap();

        let loaded = store.load_streak().unwrap();
        assert_eq!(loaded, Streak::default());
    }

    #[test]
    fn test_corrupt_jsonl_line_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = open_store(temp_dir.path());

        let now = Utc::now();
        store
            .insert_workout(&NewWorkout {
                name: "Legs".into(),
                started_at: now,
                ended_at: now,
            })
            .unwrap();

        // Append garbage directly to the table
        let mut file = OpenOptions::new()
            .append(true)
            .open(temp_dir.path().join(WORKOUTS_FILE))
            .unwrap();
        writeln!(file, "{{ not json").unwrap();

        let listed = store
            .list_workouts_since(now - chrono::Duration::days(1))
            .unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[test]
    fn test_delete_workout_rewrites_table() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = open_store(temp_dir.path());

        let now = Utc::now();
        let keep = store
            .insert_workout(&NewWorkout {
                name: "Keep".into(),
                started_at: now,
                ended_at: now,
            })
            .unwrap();
        let gone = store
            .insert_workout(&NewWorkout {
                name: "Drop".into(),
                started_at: now,
                ended_at: now,
            })
            .unwrap();

        store.delete_workout(gone.id).unwrap();

        let listed = store
            .list_workouts_since(now - chrono::Duration::days(1))
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, keep.id);
    }

    #[test]
    fn test_custom_exercise_merged_into_listing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let custom = Exercise {
            id: "sled_push".into(),
            name: "Sled Push".into(),
            category: ExerciseCategory::Legs,
            muscle_groups: vec!["quads".into()],
            equipment: Some("sled".into()),
            is_preset: false,
        };
        let store = LocalStore::open(temp_dir.path(), Profile::default(), vec![custom]).unwrap();

        let legs = store.list_exercises(ExerciseCategory::Legs).unwrap();
        assert!(legs.iter().any(|e| e.id == "sled_push" && !e.is_preset));
    }
}
