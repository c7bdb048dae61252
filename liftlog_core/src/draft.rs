//! The in-progress workout tree.
//!
//! A [`WorkoutDraft`] is owned by the logging session and mutated as the user
//! adds exercises and sets. It is discarded without trace if the session is
//! abandoned, and replaced by persisted rows on a successful save.
//!
//! Invariants:
//! - `set_number` is 1-based, contiguous, and matches position in the owning
//!   exercise's set list
//! - a set can only be marked completed once both weight and reps are present
//! - only completed sets reach persistence; the rest are silently dropped

use crate::{Error, Exercise, Result};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Transient-identifier provider, chosen once at startup
pub trait IdGen {
    fn new_id(&self) -> Uuid;
}

/// Default provider backed by UUID v4
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidGen;

impl IdGen for UuidGen {
    fn new_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Field selector for [`WorkoutDraft::update_set`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SetField {
    Weight(Option<f64>),
    Reps(Option<u32>),
    Warmup(bool),
}

/// One planned or performed set within a draft exercise
#[derive(Clone, Debug, PartialEq)]
pub struct DraftSet {
    pub id: Uuid,
    pub set_number: u32,
    pub weight: Option<f64>,
    pub reps: Option<u32>,
    pub is_warmup: bool,
    pub completed: bool,
}

impl DraftSet {
    /// Whether the set has everything it needs to be marked completed
    pub fn is_fillable(&self) -> bool {
        self.weight.is_some() && self.reps.is_some()
    }
}

/// An exercise within the draft, with its ordered sets
#[derive(Clone, Debug)]
pub struct DraftExercise {
    pub id: Uuid,
    pub exercise: Exercise,
    pub sets: Vec<DraftSet>,
}

/// The whole in-progress workout tree
#[derive(Clone, Debug)]
pub struct WorkoutDraft {
    pub id: Uuid,
    pub name: String,
    pub started_at: DateTime<Utc>,
    pub exercises: Vec<DraftExercise>,
}

impl WorkoutDraft {
    /// Start a new empty draft
    pub fn new(ids: &dyn IdGen, name: &str, started_at: DateTime<Utc>) -> Self {
        let name = if name.trim().is_empty() {
            "Workout".to_string()
        } else {
            name.trim().to_string()
        };
        Self {
            id: ids.new_id(),
            name,
            started_at,
            exercises: Vec::new(),
        }
    }

    /// Append an exercise, seeded with one empty set
    ///
    /// Returns the index of the new exercise. Deterministic, no failure mode.
    pub fn add_exercise(&mut self, ids: &dyn IdGen, exercise: Exercise) -> usize {
        let seed = DraftSet {
            id: ids.new_id(),
            set_number: 1,
            weight: None,
            reps: None,
            is_warmup: false,
            completed: false,
        };
        self.exercises.push(DraftExercise {
            id: ids.new_id(),
            exercise,
            sets: vec![seed],
        });
        self.exercises.len() - 1
    }

    /// Append a set to an exercise, carrying forward the previous set's
    /// weight and reps
    ///
    /// Returns the new set's number.
    pub fn add_set(&mut self, ids: &dyn IdGen, exercise_index: usize) -> Result<u32> {
        let exercise = self.exercise_mut(exercise_index)?;
        let last = exercise.sets.last();

        let set = DraftSet {
            id: ids.new_id(),
            set_number: exercise.sets.len() as u32 + 1,
            weight: last.and_then(|s| s.weight),
            reps: last.and_then(|s| s.reps),
            is_warmup: false,
            completed: false,
        };
        let number = set.set_number;
        exercise.sets.push(set);
        Ok(number)
    }

    /// Replace one field on a set
    pub fn update_set(
        &mut self,
        exercise_index: usize,
        set_index: usize,
        field: SetField,
    ) -> Result<()> {
        let set = self.set_mut(exercise_index, set_index)?;
        match field {
            SetField::Weight(weight) => set.weight = weight,
            SetField::Reps(reps) => set.reps = reps,
            SetField::Warmup(warmup) => set.is_warmup = warmup,
        }
        Ok(())
    }

    /// Mark a set completed
    ///
    /// Fails without mutating anything unless both weight and reps are
    /// present; callers disable the action in that case, this is the
    /// backstop.
    pub fn complete_set(&mut self, exercise_index: usize, set_index: usize) -> Result<()> {
        let set = self.set_mut(exercise_index, set_index)?;
        if !set.is_fillable() {
            return Err(Error::Workout(format!(
                "Set {} needs weight and reps before it can be completed",
                set.set_number
            )));
        }
        set.completed = true;
        Ok(())
    }

    /// Remove an exercise and all of its sets. Irreversible within the
    /// session.
    pub fn remove_exercise(&mut self, exercise_index: usize) -> Result<()> {
        if exercise_index >= self.exercises.len() {
            return Err(Error::Workout(format!(
                "No exercise at index {}",
                exercise_index
            )));
        }
        let removed = self.exercises.remove(exercise_index);
        tracing::debug!("Removed {} from draft", removed.exercise.name);
        Ok(())
    }

    /// Count of completed sets across all exercises
    pub fn completed_set_count(&self) -> usize {
        self.exercises
            .iter()
            .map(|e| e.sets.iter().filter(|s| s.completed).count())
            .sum()
    }

    fn exercise_mut(&mut self, exercise_index: usize) -> Result<&mut DraftExercise> {
        self.exercises
            .get_mut(exercise_index)
            .ok_or_else(|| Error::Workout(format!("No exercise at index {}", exercise_index)))
    }

    fn set_mut(&mut self, exercise_index: usize, set_index: usize) -> Result<&mut DraftSet> {
        let exercise = self.exercise_mut(exercise_index)?;
        exercise
            .sets
            .get_mut(set_index)
            .ok_or_else(|| Error::Workout(format!("No set at index {}", set_index)))
    }
}
