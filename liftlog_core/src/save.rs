//! Persistence sequencer for finished workouts.
//!
//! Serializes an in-progress draft into the dependent inserts the backend
//! expects: workout row, per-exercise join rows, completed sets, streak
//! update, activity feed entries, personal records. No transaction spans the
//! sequence, so every persisted step is recorded in a compensation log; when
//! a later step fails, earlier writes are undone in reverse order before the
//! error is surfaced. The caller's draft is never touched, so retry is
//! possible without data loss.

use crate::records::RecordUpdate;
use crate::{
    records, streak, ActivityDetail, ActivityEntry, Error, IdGen, NewExerciseSet, NewWorkout,
    NewWorkoutExercise, PersonalRecord, RecordKind, Result, Streak, Workout, WorkoutDraft,
    WorkoutStore,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// What a successful save produced
#[derive(Clone, Debug)]
pub struct SaveOutcome {
    pub workout: Workout,
    pub streak: Streak,
    pub record_updates: Vec<RecordUpdate>,
}

/// One persisted step that can be undone
enum Undo {
    Workout(Uuid),
    WorkoutExercise(Uuid),
    SetsFor(Uuid),
    Streak(Streak),
    Records(Vec<PersonalRecord>),
    Activity(Uuid),
}

/// Persist a finished draft.
///
/// Steps, in order:
/// 1. Insert the workout row (ended_at = `now`)
/// 2. Per exercise in list order: insert the join row, then bulk-insert only
///    the completed sets
/// 3. Advance the streak for `now`'s date
/// 4. Insert the workout-completed activity entry
/// 5. Update personal records and announce new max-weight records
///
/// On failure the compensation log is replayed in reverse (best effort,
/// failures logged) and the original error returned.
pub fn save_workout(
    store: &mut dyn WorkoutStore,
    ids: &dyn IdGen,
    draft: &WorkoutDraft,
    now: DateTime<Utc>,
) -> Result<SaveOutcome> {
    if draft.exercises.is_empty() {
        return Err(Error::Workout("Workout has no exercises".into()));
    }

    let mut undo = Vec::new();
    match run_sequence(store, ids, draft, now, &mut undo) {
        Ok(outcome) => {
            tracing::info!(
                "Saved workout {} ({} exercises, {} sets)",
                outcome.workout.id,
                draft.exercises.len(),
                draft.completed_set_count()
            );
            Ok(outcome)
        }
        Err(e) => {
            rollback(store, undo);
            Err(e)
        }
    }
}

fn run_sequence(
    store: &mut dyn WorkoutStore,
    ids: &dyn IdGen,
    draft: &WorkoutDraft,
    now: DateTime<Utc>,
    undo: &mut Vec<Undo>,
) -> Result<SaveOutcome> {
    // Step 1: workout row
    let workout = store.insert_workout(&NewWorkout {
        name: draft.name.clone(),
        started_at: draft.started_at,
        ended_at: now,
    })?;
    undo.push(Undo::Workout(workout.id));

    // Step 2: join rows and completed sets, preserving list order
    for (index, draft_exercise) in draft.exercises.iter().enumerate() {
        let join_row = store.insert_workout_exercise(&NewWorkoutExercise {
            workout_id: workout.id,
            exercise_id: draft_exercise.exercise.id.clone(),
            order_index: index as u32,
        })?;
        undo.push(Undo::WorkoutExercise(join_row.id));

        let completed: Vec<NewExerciseSet> = draft_exercise
            .sets
            .iter()
            .filter(|s| s.completed)
            .map(|s| NewExerciseSet {
                workout_exercise_id: join_row.id,
                set_number: s.set_number,
                weight: s.weight,
                reps: s.reps,
                is_warmup: s.is_warmup,
            })
            .collect();

        if !completed.is_empty() {
            // Logged before the insert so a partial bulk write still gets
            // cleaned up
            undo.push(Undo::SetsFor(join_row.id));
            store.insert_sets(&completed)?;
        }
    }

    // Step 3: streak transition
    let previous_streak = store.load_streak()?;
    let new_streak = streak::advance(&previous_streak, now.date_naive());
    undo.push(Undo::Streak(previous_streak));
    store.save_streak(&new_streak)?;

    // Step 4: activity feed entry with denormalized summary
    let completed_entry = ActivityEntry {
        id: ids.new_id(),
        reference_id: Some(workout.id),
        created_at: now,
        detail: ActivityDetail::WorkoutCompleted {
            workout_name: workout.name.clone(),
            exercise_count: draft.exercises.len() as u32,
        },
    };
    undo.push(Undo::Activity(completed_entry.id));
    store.insert_activity(&completed_entry)?;

    // Step 5: personal records
    let mut stored_records = store.load_records()?;
    let record_updates = records::compute_updates(&stored_records, draft, workout.id, now);
    if !record_updates.is_empty() {
        undo.push(Undo::Records(stored_records.clone()));
        records::apply_updates(&mut stored_records, &record_updates);
        store.save_records(&stored_records)?;

        for update in &record_updates {
            // Only max-weight records are announced in the feed
            if update.record.kind != RecordKind::MaxWeight {
                continue;
            }
            let pr_entry = ActivityEntry {
                id: ids.new_id(),
                reference_id: Some(workout.id),
                created_at: now,
                detail: ActivityDetail::PrAchieved {
                    exercise_name: update.exercise_name.clone(),
                    weight: update.record.value,
                },
            };
            undo.push(Undo::Activity(pr_entry.id));
            store.insert_activity(&pr_entry)?;
        }
    }

    Ok(SaveOutcome {
        workout,
        streak: new_streak,
        record_updates,
    })
}

/// Replay the compensation log in reverse, best effort
fn rollback(store: &mut dyn WorkoutStore, undo: Vec<Undo>) {
    tracing::warn!("Save failed; undoing {} persisted steps", undo.len());
    for step in undo.into_iter().rev() {
        let result = match step {
            Undo::Workout(id) => store.delete_workout(id),
            Undo::WorkoutExercise(id) => store.delete_workout_exercise(id),
            Undo::SetsFor(id) => store.delete_sets_for(id),
            Undo::Streak(previous) => store.save_streak(&previous),
            Undo::Records(previous) => store.save_records(&previous),
            Undo::Activity(id) => store.delete_activity(id),
        };
        if let Err(e) = result {
            tracing::warn!("Compensation step failed: {}", e);
        }
    }
}
