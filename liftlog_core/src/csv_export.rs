//! CSV export of workout history.
//!
//! Flattens the workout/exercise/set tree into one CSV row per set for use
//! in spreadsheets or other tools.

use crate::history::WorkoutDetail;
use crate::{history, Result, WorkoutStore};
use chrono::{DateTime, Utc};
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    workout_id: String,
    workout_name: String,
    started_at: String,
    exercise: String,
    order_index: u32,
    set_number: u32,
    weight: Option<f64>,
    reps: Option<u32>,
    is_warmup: bool,
}

fn rows_for(detail: &WorkoutDetail) -> Vec<CsvRow> {
    let mut rows = Vec::new();
    for exercise in &detail.exercises {
        for set in &exercise.sets {
            rows.push(CsvRow {
                workout_id: detail.workout.id.to_string(),
                workout_name: detail.workout.name.clone(),
                started_at: detail.workout.started_at.to_rfc3339(),
                exercise: exercise.exercise_name.clone(),
                order_index: exercise.order_index,
                set_number: set.set_number,
                weight: set.weight,
                reps: set.reps,
                is_warmup: set.is_warmup,
            });
        }
    }
    rows
}

/// Export the last `days` days of history to a CSV file.
///
/// Overwrites any existing file and returns the number of set rows written.
pub fn export_history(
    store: &dyn WorkoutStore,
    path: &Path,
    days: i64,
    now: DateTime<Utc>,
) -> Result<usize> {
    let details = history::load_recent(store, days, now)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    let mut count = 0;
    for detail in &details {
        for row in rows_for(detail) {
            writer.serialize(row)?;
            count += 1;
        }
    }
    writer.flush()?;

    tracing::info!("Exported {} set rows to {:?}", count, path);
    Ok(count)
}
