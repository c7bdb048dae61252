//! Storage backend abstraction.
//!
//! Every component that reads or writes persisted rows goes through the
//! [`WorkoutStore`] trait rather than a module-global client, so the backend
//! can be swapped for a fake in tests. [`MemoryStore`] is that fake, and also
//! serves dry runs.

use crate::{
    ActivityEntry, Error, Exercise, ExerciseCategory, ExerciseSet, NewExerciseSet, NewWorkout,
    NewWorkoutExercise, PersonalRecord, Profile, Result, Streak, Workout, WorkoutExercise,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Backend operations used by the logging flow, history and records.
///
/// Insert methods return the created row with its assigned id, mirroring a
/// read-after-write against a database. Delete methods exist so a failed save
/// sequence can undo its earlier inserts.
pub trait WorkoutStore {
    // --- reads -------------------------------------------------------------

    /// Preset and custom exercises in a category, sorted by name
    fn list_exercises(&self, category: ExerciseCategory) -> Result<Vec<Exercise>>;

    /// Look up a single exercise definition
    fn get_exercise(&self, id: &str) -> Result<Option<Exercise>>;

    /// The user's stored preferences
    fn load_profile(&self) -> Result<Profile>;

    /// The user's streak row
    fn load_streak(&self) -> Result<Streak>;

    /// All stored personal records
    fn load_records(&self) -> Result<Vec<PersonalRecord>>;

    /// One workout by id
    fn get_workout(&self, id: Uuid) -> Result<Option<Workout>>;

    /// Workouts started at or after the cutoff, newest first
    fn list_workouts_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<Workout>>;

    /// Exercise join rows for a workout, ordered by order_index
    fn list_workout_exercises(&self, workout_id: Uuid) -> Result<Vec<WorkoutExercise>>;

    /// Sets for a workout exercise, ordered by set_number
    fn list_sets(&self, workout_exercise_id: Uuid) -> Result<Vec<ExerciseSet>>;

    // --- writes ------------------------------------------------------------

    fn insert_workout(&mut self, new: &NewWorkout) -> Result<Workout>;

    fn insert_workout_exercise(&mut self, new: &NewWorkoutExercise) -> Result<WorkoutExercise>;

    /// Bulk-insert sets for one workout exercise
    fn insert_sets(&mut self, sets: &[NewExerciseSet]) -> Result<Vec<ExerciseSet>>;

    fn save_streak(&mut self, streak: &Streak) -> Result<()>;

    /// Replace the stored record list
    fn save_records(&mut self, records: &[PersonalRecord]) -> Result<()>;

    fn insert_activity(&mut self, entry: &ActivityEntry) -> Result<()>;

    // --- compensation ------------------------------------------------------

    fn delete_workout(&mut self, id: Uuid) -> Result<()>;

    fn delete_workout_exercise(&mut self, id: Uuid) -> Result<()>;

    fn delete_sets_for(&mut self, workout_exercise_id: Uuid) -> Result<()>;

    fn delete_activity(&mut self, id: Uuid) -> Result<()>;
}

/// In-memory store backed by plain vectors.
///
/// Used as the substitutable fake in tests and for `--dry-run` logging, where
/// nothing should touch disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub exercises: Vec<Exercise>,
    pub profile: Profile,
    pub streak: Streak,
    pub records: Vec<PersonalRecord>,
    pub workouts: Vec<Workout>,
    pub workout_exercises: Vec<WorkoutExercise>,
    pub sets: Vec<ExerciseSet>,
    pub activity: Vec<ActivityEntry>,
}

impl MemoryStore {
    /// Empty store with the given exercise definitions available
    pub fn with_exercises(exercises: Vec<Exercise>) -> Self {
        Self {
            exercises,
            ..Self::default()
        }
    }

    /// Store seeded with the default preset catalog
    pub fn with_default_catalog() -> Self {
        let catalog = crate::catalog::get_default_catalog();
        Self::with_exercises(catalog.exercises.values().cloned().collect())
    }
}

impl WorkoutStore for MemoryStore {
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
        Ok(self.profile.clone())
    }

    fn load_streak(&self) -> Result<Streak> {
        Ok(self.streak.clone())
    }

    fn load_records(&self) -> Result<Vec<PersonalRecord>> {
        Ok(self.records.clone())
    }

    fn get_workout(&self, id: Uuid) -> Result<Option<Workout>> {
        Ok(self.workouts.iter().find(|w| w.id == id).cloned())
    }

    fn list_workouts_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<Workout>> {
        let mut matching: Vec<Workout> = self
            .workouts
            .iter()
            .filter(|w| w.started_at >= cutoff)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(matching)
    }

    fn list_workout_exercises(&self, workout_id: Uuid) -> Result<Vec<WorkoutExercise>> {
        let mut matching: Vec<WorkoutExercise> = self
            .workout_exercises
            .iter()
            .filter(|we| we.workout_id == workout_id)
            .cloned()
            .collect();
        matching.sort_by_key(|we| we.order_index);
        Ok(matching)
    }

    fn list_sets(&self, workout_exercise_id: Uuid) -> Result<Vec<ExerciseSet>> {
        let mut matching: Vec<ExerciseSet> = self
            .sets
            .iter()
            .filter(|s| s.workout_exercise_id == workout_exercise_id)
            .cloned()
            .collect();
        matching.sort_by_key(|s| s.set_number);
        Ok(matching)
    }

    fn insert_workout(&mut self, new: &NewWorkout) -> Result<Workout> {
        let workout = Workout {
            id: Uuid::new_v4(),
            name: new.name.clone(),
            started_at: new.started_at,
            ended_at: new.ended_at,
        };
        self.workouts.push(workout.clone());
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
        self.workout_exercises.push(row.clone());
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
            self.sets.push(row.clone());
            inserted.push(row);
        }
        Ok(inserted)
    }

    fn save_streak(&mut self, streak: &Streak) -> Result<()> {
        self.streak = streak.clone();
        Ok(())
    }

    fn save_records(&mut self, records: &[PersonalRecord]) -> Result<()> {
        self.records = records.to_vec();
        Ok(())
    }

    fn insert_activity(&mut self, entry: &ActivityEntry) -> Result<()> {
        self.activity.push(entry.clone());
        Ok(())
    }

    fn delete_workout(&mut self, id: Uuid) -> Result<()> {
        self.workouts.retain(|w| w.id != id);
        Ok(())
    }

    fn delete_workout_exercise(&mut self, id: Uuid) -> Result<()> {
        self.workout_exercises.retain(|we| we.id != id);
        Ok(())
    }

    fn delete_sets_for(&mut self, workout_exercise_id: Uuid) -> Result<()> {
        self.sets
            .retain(|s| s.workout_exercise_id != workout_exercise_id);
        Ok(())
    }

    fn delete_activity(&mut self, id: Uuid) -> Result<()> {
        self.activity.retain(|a| a.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_exercises_sorted_and_filtered() {
        let store = MemoryStore::with_default_catalog();
        let chest = store.list_exercises(ExerciseCategory::Chest).unwrap();
        assert!(!chest.is_empty());
        assert!(chest.iter().all(|e| e.category == ExerciseCategory::Chest));
        for pair in chest.windows(2) {
            assert!(pair[0].name <= pair[1].name);
        }
    }

    #[test]
    fn test_insert_workout_assigns_id() {
        let mut store = MemoryStore::with_default_catalog();
        let now = Utc::now();
        let workout = store
            .insert_workout(&NewWorkout {
                name: "Push Day".into(),
                started_at: now,
                ended_at: now,
            })
            .unwrap();

        let fetched = store.get_workout(workout.id).unwrap().unwrap();
        assert_eq!(fetched.name, "Push Day");
    }

    #[test]
    fn test_insert_workout_exercise_requires_known_exercise() {
        let mut store = MemoryStore::with_default_catalog();
        let result = store.insert_workout_exercise(&NewWorkoutExercise {
            workout_id: Uuid::new_v4(),
            exercise_id: "no_such_exercise".into(),
            order_index: 0,
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_delete_undoes_insert() {
        let mut store = MemoryStore::with_default_catalog();
        let now = Utc::now();
        let workout = store
            .insert_workout(&NewWorkout {
                name: "Legs".into(),
                started_at: now,
                ended_at: now,
            })
            .unwrap();

        store.delete_workout(workout.id).unwrap();
        assert!(store.get_workout(workout.id).unwrap().is_none());
    }
}
