//! Core domain types for liftlog.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercises and their categories
//! - Persisted workout rows (workouts, workout exercises, sets)
//! - Streaks, personal records and the activity feed
//! - Profile preferences

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Exercise Types
// ============================================================================

/// Training category an exercise belongs to
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseCategory {
    Chest,
    Back,
    Legs,
    Shoulders,
    Arms,
    Core,
    Cardio,
    FullBody,
    Custom,
}

impl ExerciseCategory {
    /// The categories shown to the user when starting a workout
    pub const SELECTABLE: [ExerciseCategory; 8] = [
        ExerciseCategory::Chest,
        ExerciseCategory::Back,
        ExerciseCategory::Legs,
        ExerciseCategory::Shoulders,
        ExerciseCategory::Arms,
        ExerciseCategory::Core,
        ExerciseCategory::Cardio,
        ExerciseCategory::FullBody,
    ];

    /// Parse a category name as entered on the command line
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "chest" => Some(ExerciseCategory::Chest),
            "back" => Some(ExerciseCategory::Back),
            "legs" => Some(ExerciseCategory::Legs),
            "shoulders" => Some(ExerciseCategory::Shoulders),
            "arms" => Some(ExerciseCategory::Arms),
            "core" => Some(ExerciseCategory::Core),
            "cardio" => Some(ExerciseCategory::Cardio),
            "full_body" | "fullbody" | "full-body" => Some(ExerciseCategory::FullBody),
            "custom" => Some(ExerciseCategory::Custom),
            _ => None,
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            ExerciseCategory::Chest => "Chest",
            ExerciseCategory::Back => "Back",
            ExerciseCategory::Legs => "Legs",
            ExerciseCategory::Shoulders => "Shoulders",
            ExerciseCategory::Arms => "Arms",
            ExerciseCategory::Core => "Core",
            ExerciseCategory::Cardio => "Cardio",
            ExerciseCategory::FullBody => "Full Body",
            ExerciseCategory::Custom => "Custom",
        }
    }
}

/// A named movement definition (e.g., "Bench Press")
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub category: ExerciseCategory,
    pub muscle_groups: Vec<String>,
    pub equipment: Option<String>,
    pub is_preset: bool,
}

// ============================================================================
// Profile Types
// ============================================================================

/// Weight unit preference for display
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WeightUnit {
    Lbs,
    Kg,
}

impl WeightUnit {
    pub fn label(&self) -> &'static str {
        match self {
            WeightUnit::Lbs => "lbs",
            WeightUnit::Kg => "kg",
        }
    }
}

/// Preferences loaded before a logging session begins
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Profile {
    pub preferred_unit: WeightUnit,
    pub rest_timer_enabled: bool,
    pub rest_timer_seconds: u32,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            preferred_unit: WeightUnit::Lbs,
            rest_timer_enabled: true,
            rest_timer_seconds: 90,
        }
    }
}

// ============================================================================
// Persisted Workout Rows
// ============================================================================

/// A saved workout session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Workout {
    pub id: Uuid,
    pub name: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

/// Join row linking a workout to an exercise, with ordering
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutExercise {
    pub id: Uuid,
    pub workout_id: Uuid,
    pub exercise_id: String,
    pub order_index: u32,
}

/// One performed set within a workout exercise
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExerciseSet {
    pub id: Uuid,
    pub workout_exercise_id: Uuid,
    pub set_number: u32,
    pub weight: Option<f64>,
    pub reps: Option<u32>,
    pub is_warmup: bool,
}

/// Insert payload for a workout row (without id)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewWorkout {
    pub name: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

/// Insert payload for a workout-exercise join row
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewWorkoutExercise {
    pub workout_id: Uuid,
    pub exercise_id: String,
    pub order_index: u32,
}

/// Insert payload for a performed set
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewExerciseSet {
    pub workout_exercise_id: Uuid,
    pub set_number: u32,
    pub weight: Option<f64>,
    pub reps: Option<u32>,
    pub is_warmup: bool,
}

// ============================================================================
// Streak, Records and Activity Feed
// ============================================================================

/// Consecutive-day workout streak
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Streak {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_workout_date: Option<NaiveDate>,
}

impl Default for Streak {
    fn default() -> Self {
        Self {
            current_streak: 0,
            longest_streak: 0,
            last_workout_date: None,
        }
    }
}

/// Kind of personal record tracked per exercise
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    MaxWeight,
    MaxReps,
}

/// A user's best recorded value for an exercise and metric
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PersonalRecord {
    pub exercise_id: String,
    pub kind: RecordKind,
    pub value: f64,
    pub achieved_at: DateTime<Utc>,
    pub workout_id: Uuid,
}

/// Payload of an activity-feed entry, tagged by activity kind
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActivityDetail {
    WorkoutCompleted {
        workout_name: String,
        exercise_count: u32,
    },
    PrAchieved {
        exercise_name: String,
        weight: f64,
    },
    TrophyEarned {
        trophy_name: String,
    },
    ChallengeWon {
        challenge_name: String,
    },
    StreakMilestone {
        days: u32,
    },
}

/// A row in the activity feed
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: Uuid,
    pub reference_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub detail: ActivityDetail,
}
