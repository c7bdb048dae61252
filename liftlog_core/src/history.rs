//! Workout history queries.
//!
//! Joins the workout, exercise and set tables into the shapes the progress
//! and detail views render, and computes the trailing-week volume summary.

use crate::{Result, Workout, WorkoutStore};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// A persisted set with its exercise context resolved
#[derive(Clone, Debug)]
pub struct ExerciseDetail {
    pub exercise_id: String,
    pub exercise_name: String,
    pub order_index: u32,
    pub sets: Vec<crate::ExerciseSet>,
}

/// One workout with everything needed to render it
#[derive(Clone, Debug)]
pub struct WorkoutDetail {
    pub workout: Workout,
    pub exercises: Vec<ExerciseDetail>,
}

impl WorkoutDetail {
    /// Total volume (weight x reps) across non-warmup sets
    pub fn volume(&self) -> f64 {
        self.exercises
            .iter()
            .flat_map(|e| e.sets.iter())
            .filter(|s| !s.is_warmup)
            .map(|s| s.weight.unwrap_or(0.0) * s.reps.unwrap_or(0) as f64)
            .sum()
    }
}

/// Load one workout with exercises and sets
pub fn load_detail(store: &dyn WorkoutStore, id: Uuid) -> Result<Option<WorkoutDetail>> {
    let Some(workout) = store.get_workout(id)? else {
        return Ok(None);
    };
    Ok(Some(assemble(store, workout)?))
}

/// Load the last `days` days of workouts, newest first
pub fn load_recent(
    store: &dyn WorkoutStore,
    days: i64,
    now: DateTime<Utc>,
) -> Result<Vec<WorkoutDetail>> {
    let cutoff = now - Duration::days(days);
    let workouts = store.list_workouts_since(cutoff)?;

    let mut details = Vec::with_capacity(workouts.len());
    for workout in workouts {
        details.push(assemble(store, workout)?);
    }

    tracing::debug!("Loaded {} workouts from last {} days", details.len(), days);
    Ok(details)
}

/// Total volume over the trailing seven days
pub fn weekly_volume(
    store: &dyn WorkoutStore,
    now: DateTime<Utc>,
) -> Result<f64> {
    let details = load_recent(store, 7, now)?;
    Ok(details.iter().map(WorkoutDetail::volume).sum())
}

fn assemble(store: &dyn WorkoutStore, workout: Workout) -> Result<WorkoutDetail> {
    let join_rows = store.list_workout_exercises(workout.id)?;

    let mut exercises = Vec::with_capacity(join_rows.len());
    for join_row in join_rows {
        let sets = store.list_sets(join_row.id)?;
        let exercise_name = store
            .get_exercise(&join_row.exercise_id)?
            .map(|e| e.name)
            .unwrap_or_else(|| join_row.exercise_id.clone());
        exercises.push(ExerciseDetail {
            exercise_id: join_row.exercise_id,
            exercise_name,
            order_index: join_row.order_index,
            sets,
        });
    }

    Ok(WorkoutDetail { workout, exercises })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::get_default_catalog;
    use crate::draft::{SetField, UuidGen, WorkoutDraft};
    use crate::save;
    use crate::store::MemoryStore;

    fn save_bench_workout(store: &mut MemoryStore, weight: f64, now: DateTime<Utc>) -> Uuid {
        let bench = get_default_catalog().get("bench_press").unwrap().clone();
        let mut draft = WorkoutDraft::new(&UuidGen, "Push Day", now);
        let ei = draft.add_exercise(&UuidGen, bench);
        draft
            .update_set(ei, 0, SetField::Weight(Some(weight)))
            .unwrap();
        draft.update_set(ei, 0, SetField::Reps(Some(10))).unwrap();
        draft.complete_set(ei, 0).unwrap();
        save::save_workout(store, &UuidGen, &draft, now)
            .unwrap()
            .workout
            .id
    }

    #[test]
    fn test_load_detail_resolves_names_and_sets() {
        let mut store = MemoryStore::with_default_catalog();
        let now = Utc::now();
        let id = save_bench_workout(&mut store, 60.0, now);

        let detail = load_detail(&store, id).unwrap().unwrap();
        assert_eq!(detail.workout.name, "Push Day");
        assert_eq!(detail.exercises.len(), 1);
        assert_eq!(detail.exercises[0].exercise_name, "Bench Press");
        assert_eq!(detail.exercises[0].sets.len(), 1);
    }

    #[test]
    fn test_load_detail_unknown_id() {
        let store = MemoryStore::with_default_catalog();
        assert!(load_detail(&store, Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn test_load_recent_newest_first_and_windowed() {
        let mut store = MemoryStore::with_default_catalog();
        let now = Utc::now();
        save_bench_workout(&mut store, 60.0, now - Duration::days(10));
        save_bench_workout(&mut store, 62.5, now - Duration::days(2));
        save_bench_workout(&mut store, 65.0, now);

        let recent = load_recent(&store, 7, now).unwrap();
        assert_eq!(recent.len(), 2);
        assert!(recent[0].workout.started_at >= recent[1].workout.started_at);
    }

    #[test]
    fn test_weekly_volume_sums_weight_times_reps() {
        let mut store = MemoryStore::with_default_catalog();
        let now = Utc::now();
        save_bench_workout(&mut store, 60.0, now - Duration::days(1));
        save_bench_workout(&mut store, 40.0, now);

        // 60*10 + 40*10
        let volume = weekly_volume(&store, now).unwrap();
        assert!((volume - 1000.0).abs() < f64::EPSILON);
    }
}
