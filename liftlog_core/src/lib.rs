#![forbid(unsafe_code)]

//! Core domain model and business logic for the Liftlog workout tracker.
//!
//! This crate provides:
//! - Domain types (exercises, workouts, sets, streaks, records)
//! - The preset exercise catalog
//! - The workout logging state machine and rest timer
//! - Storage abstraction with a local file-backed store
//! - The save sequencer with compensating undo
//! - History queries and CSV export

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod store;
pub mod local;
pub mod draft;
pub mod timer;
pub mod session;
pub mod streak;
pub mod records;
pub mod save;
pub mod history;
pub mod csv_export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::build_default_catalog;
pub use config::Config;
pub use store::{MemoryStore, WorkoutStore};
pub use local::LocalStore;
pub use draft::{DraftExercise, DraftSet, IdGen, SetField, UuidGen, WorkoutDraft};
pub use timer::RestTimer;
pub use session::{LogSession, Screen};
pub use save::{save_workout, SaveOutcome};
pub use history::{load_detail, load_recent, weekly_volume, WorkoutDetail};
pub use csv_export::export_history;
