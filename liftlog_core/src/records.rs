//! Personal record computation.
//!
//! After a save, the heaviest weight and highest rep count among an
//! exercise's completed working sets are compared against the stored records.
//! Warmup sets never count.

use crate::{PersonalRecord, RecordKind, WorkoutDraft};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A new or improved record produced by one workout
#[derive(Clone, Debug)]
pub struct RecordUpdate {
    pub exercise_name: String,
    pub record: PersonalRecord,
    pub previous: Option<f64>,
}

/// Compare a finished draft against existing records.
///
/// Returns one update per (exercise, kind) whose best completed working-set
/// value strictly beats the stored record (or where no record exists yet).
pub fn compute_updates(
    existing: &[PersonalRecord],
    draft: &WorkoutDraft,
    workout_id: Uuid,
    now: DateTime<Utc>,
) -> Vec<RecordUpdate> {
    let mut updates = Vec::new();

    for draft_exercise in &draft.exercises {
        let working_sets: Vec<_> = draft_exercise
            .sets
            .iter()
            .filter(|s| s.completed && !s.is_warmup)
            .collect();
        if working_sets.is_empty() {
            continue;
        }

        let best_weight = working_sets
            .iter()
            .filter_map(|s| s.weight)
            .fold(None::<f64>, |best, w| {
                Some(best.map_or(w, |b| b.max(w)))
            });
        let best_reps = working_sets.iter().filter_map(|s| s.reps).max();

        let candidates = [
            (RecordKind::MaxWeight, best_weight),
            (RecordKind::MaxReps, best_reps.map(f64::from)),
        ];

        for (kind, value) in candidates {
            let Some(value) = value else { continue };

            let previous = existing
                .iter()
                .find(|r| r.exercise_id == draft_exercise.exercise.id && r.kind == kind)
                .map(|r| r.value);

            if previous.map_or(true, |prev| value > prev) {
                updates.push(RecordUpdate {
                    exercise_name: draft_exercise.exercise.name.clone(),
                    record: PersonalRecord {
                        exercise_id: draft_exercise.exercise.id.clone(),
                        kind,
                        value,
                        achieved_at: now,
                        workout_id,
                    },
                    previous,
                });
            }
        }
    }

    updates
}

/// Fold updates into the stored record list
pub fn apply_updates(records: &mut Vec<PersonalRecord>, updates: &[RecordUpdate]) {
    for update in updates {
        let record = &update.record;
        match records
            .iter_mut()
            .find(|r| r.exercise_id == record.exercise_id && r.kind == record.kind)
        {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
    }
}
