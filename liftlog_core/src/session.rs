//! Workout logging session state machine.
//!
//! Coordinates the category/exercise picker, the in-progress draft and the
//! rest timer across the three screens of the logging flow:
//!
//! `Category` → `Exercises` → `Workout` → (save) → done
//!
//! Starting a workout and selecting a category are separate steps; selecting
//! a category never implicitly creates a draft. The store is passed into the
//! methods that query it, never held globally.

use crate::draft::SetField;
use crate::save::SaveOutcome;
use crate::{
    save, Error, Exercise, ExerciseCategory, IdGen, Profile, RestTimer, Result, WorkoutDraft,
    WorkoutStore,
};
use chrono::{DateTime, Utc};

/// Which screen of the logging flow the user is on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Category,
    Exercises,
    Workout,
}

/// One user's logging flow, from category pick to save
pub struct LogSession {
    profile: Profile,
    screen: Screen,
    category: Option<ExerciseCategory>,
    exercise_list: Vec<Exercise>,
    draft: Option<WorkoutDraft>,
    rest_timer: RestTimer,
    ids: Box<dyn IdGen>,
}

impl LogSession {
    /// Session with known preferences
    pub fn new(profile: Profile, ids: Box<dyn IdGen>) -> Self {
        Self {
            profile,
            screen: Screen::Category,
            category: None,
            exercise_list: Vec::new(),
            draft: None,
            rest_timer: RestTimer::new(),
            ids,
        }
    }

    /// Load the user's preferences from the store, then build the session.
    ///
    /// A failed preference fetch degrades to `fallback` with a warning; it
    /// never blocks logging.
    pub fn open(store: &dyn WorkoutStore, fallback: Profile, ids: Box<dyn IdGen>) -> Self {
        let profile = match store.load_profile() {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!("Failed to load profile: {}. Using defaults.", e);
                fallback
            }
        };
        Self::new(profile, ids)
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn category(&self) -> Option<ExerciseCategory> {
        self.category
    }

    /// The exercise list fetched for the selected category
    pub fn exercises(&self) -> &[Exercise] {
        &self.exercise_list
    }

    pub fn draft(&self) -> Option<&WorkoutDraft> {
        self.draft.as_ref()
    }

    pub fn rest_timer(&self) -> &RestTimer {
        &self.rest_timer
    }

    /// Begin a new in-progress workout
    pub fn start_workout(&mut self, name: &str, now: DateTime<Utc>) -> Result<()> {
        if self.draft.is_some() {
            return Err(Error::Workout("A workout is already in progress".into()));
        }
        self.draft = Some(WorkoutDraft::new(self.ids.as_ref(), name, now));
        Ok(())
    }

    /// Pick a category and fetch its exercise list.
    ///
    /// Re-queries on every call; nothing is cached across categories. Valid
    /// from any screen once a workout is started, which is also how the user
    /// gets back to the picker to add another exercise.
    pub fn select_category(
        &mut self,
        store: &dyn WorkoutStore,
        category: ExerciseCategory,
    ) -> Result<&[Exercise]> {
        if self.draft.is_none() {
            return Err(Error::Workout(
                "Start a workout before picking a category".into(),
            ));
        }

        let exercises = store.list_exercises(category)?;
        tracing::debug!(
            "Fetched {} exercises for {:?}",
            exercises.len(),
            category
        );

        self.category = Some(category);
        self.exercise_list = exercises;
        self.screen = Screen::Exercises;
        Ok(&self.exercise_list)
    }

    /// Case-insensitive lookup in the fetched exercise list
    pub fn find_exercise(&self, name: &str) -> Option<&Exercise> {
        self.exercise_list
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Add an exercise to the draft, moving to the workout screen
    pub fn add_exercise(&mut self, exercise: Exercise) -> Result<usize> {
        let ids = &*self.ids;
        let draft = self
            .draft
            .as_mut()
            .ok_or_else(|| Error::Workout("No workout in progress".into()))?;
        let index = draft.add_exercise(ids, exercise);

        self.screen = Screen::Workout;
        self.category = None;
        self.exercise_list.clear();
        Ok(index)
    }

    /// Append a set to an exercise, carrying the previous set's values
    pub fn add_set(&mut self, exercise_index: usize) -> Result<u32> {
        let ids = &*self.ids;
        self.draft
            .as_mut()
            .ok_or_else(|| Error::Workout("No workout in progress".into()))?
            .add_set(ids, exercise_index)
    }

    pub fn update_set(
        &mut self,
        exercise_index: usize,
        set_index: usize,
        field: SetField,
    ) -> Result<()> {
        self.draft_mut()?.update_set(exercise_index, set_index, field)
    }

    /// Whether complete_set would succeed, for disabling the action in a UI
    pub fn can_complete_set(&self, exercise_index: usize, set_index: usize) -> bool {
        self.draft
            .as_ref()
            .and_then(|d| d.exercises.get(exercise_index))
            .and_then(|e| e.sets.get(set_index))
            .map(|s| s.is_fillable() && !s.completed)
            .unwrap_or(false)
    }

    /// Mark a set done; starts (or restarts) the rest timer when the profile
    /// enables it
    pub fn complete_set(&mut self, exercise_index: usize, set_index: usize) -> Result<()> {
        self.draft_mut()?.complete_set(exercise_index, set_index)?;

        if self.profile.rest_timer_enabled {
            self.rest_timer.start(self.profile.rest_timer_seconds);
        }
        Ok(())
    }

    pub fn remove_exercise(&mut self, exercise_index: usize) -> Result<()> {
        self.draft_mut()?.remove_exercise(exercise_index)
    }

    /// Advance the rest timer by one second
    pub fn tick_rest(&mut self) -> Option<u32> {
        self.rest_timer.tick()
    }

    pub fn skip_rest(&mut self) {
        self.rest_timer.skip()
    }

    /// Persist the draft and leave the logging flow.
    ///
    /// On success the session resets to the category screen with no draft.
    /// On failure everything is left untouched so the user can retry.
    pub fn finish(
        &mut self,
        store: &mut dyn WorkoutStore,
        now: DateTime<Utc>,
    ) -> Result<SaveOutcome> {
        let draft = self
            .draft
            .as_ref()
            .ok_or_else(|| Error::Workout("No workout in progress".into()))?;

        let outcome = save::save_workout(store, self.ids.as_ref(), draft, now)?;

        self.draft = None;
        self.screen = Screen::Category;
        self.category = None;
        self.exercise_list.clear();
        self.rest_timer.skip();
        Ok(outcome)
    }

    fn draft_mut(&mut self) -> Result<&mut WorkoutDraft> {
        self.draft
            .as_mut()
            .ok_or_else(|| Error::Workout("No workout in progress".into()))
    }
}
