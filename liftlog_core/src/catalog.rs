//! Built-in catalog of preset exercises.
//!
//! This module provides the preset exercise definitions served by the local
//! store, grouped by training category.

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// The complete catalog of exercise definitions, keyed by exercise id
#[derive(Clone, Debug)]
pub struct ExerciseCatalog {
    pub exercises: HashMap<String, Exercise>,
}

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<ExerciseCatalog> = Lazy::new(build_default_catalog_internal);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static ExerciseCatalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog with built-in preset exercises
///
/// **Note**: For production use, prefer `get_default_catalog()` which returns a
/// cached reference. This function is retained for testing and custom catalog creation.
pub fn build_default_catalog() -> ExerciseCatalog {
    build_default_catalog_internal()
}

fn preset(
    id: &str,
    name: &str,
    category: ExerciseCategory,
    muscle_groups: &[&str],
    equipment: Option<&str>,
) -> Exercise {
    Exercise {
        id: id.into(),
        name: name.into(),
        category,
        muscle_groups: muscle_groups.iter().map(|m| (*m).into()).collect(),
        equipment: equipment.map(Into::into),
        is_preset: true,
    }
}

/// Internal function that actually builds the catalog
fn build_default_catalog_internal() -> ExerciseCatalog {
    use ExerciseCategory::*;

    let presets = [
        // Chest
        preset("bench_press", "Bench Press", Chest, &["chest", "triceps"], Some("barbell")),
        preset("incline_db_press", "Incline Dumbbell Press", Chest, &["chest", "shoulders"], Some("dumbbell")),
        preset("pushup", "Push-up", Chest, &["chest", "triceps"], None),
        // Back
        preset("deadlift", "Deadlift", Back, &["back", "hamstrings", "glutes"], Some("barbell")),
        preset("barbell_row", "Barbell Row", Back, &["back", "biceps"], Some("barbell")),
        preset("lat_pulldown", "Lat Pulldown", Back, &["back", "biceps"], Some("cable")),
        preset("pullup", "Pull-up", Back, &["back", "biceps"], Some("pullup_bar")),
        // Legs
        preset("back_squat", "Back Squat", Legs, &["quads", "glutes"], Some("barbell")),
        preset("leg_press", "Leg Press", Legs, &["quads", "glutes"], Some("machine")),
        preset("romanian_deadlift", "Romanian Deadlift", Legs, &["hamstrings", "glutes"], Some("barbell")),
        // Shoulders
        preset("overhead_press", "Overhead Press", Shoulders, &["shoulders", "triceps"], Some("barbell")),
        preset("lateral_raise", "Lateral Raise", Shoulders, &["shoulders"], Some("dumbbell")),
        // Arms
        preset("barbell_curl", "Barbell Curl", Arms, &["biceps"], Some("barbell")),
        preset("tricep_pushdown", "Tricep Pushdown", Arms, &["triceps"], Some("cable")),
        preset("hammer_curl", "Hammer Curl", Arms, &["biceps", "forearms"], Some("dumbbell")),
        // Core
        preset("plank", "Plank", Core, &["core"], None),
        preset("hanging_leg_raise", "Hanging Leg Raise", Core, &["core", "hip_flexors"], Some("pullup_bar")),
        // Cardio
        preset("rowing_machine", "Rowing Machine", Cardio, &["full_body"], Some("machine")),
        preset("treadmill_run", "Treadmill Run", Cardio, &["legs"], Some("machine")),
        // Full body
        preset("clean_and_press", "Clean and Press", FullBody, &["full_body"], Some("barbell")),
        preset("kettlebell_swing", "Kettlebell Swing", FullBody, &["glutes", "hamstrings", "core"], Some("kettlebell")),
    ];

    let mut exercises = HashMap::new();
    for exercise in presets {
        exercises.insert(exercise.id.clone(), exercise);
    }

    ExerciseCatalog { exercises }
}

impl ExerciseCatalog {
    /// Look up an exercise by id
    pub fn get(&self, id: &str) -> Option<&Exercise> {
        self.exercises.get(id)
    }

    /// All preset exercises in a category, sorted by name
    pub fn by_category(&self, category: ExerciseCategory) -> Vec<Exercise> {
        let mut matching: Vec<Exercise> = self
            .exercises
            .values()
            .filter(|e| e.category == category)
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.name.cmp(&b.name));
        matching
    }

    /// Validate catalog integrity, returning a list of problems found
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (key, exercise) in &self.exercises {
            if key != &exercise.id {
                errors.push(format!(
                    "Exercise keyed as {} but has id {}",
                    key, exercise.id
                ));
            }
            if exercise.name.trim().is_empty() {
                errors.push(format!("Exercise {} has an empty name", exercise.id));
            }
            if exercise.muscle_groups.is_empty() {
                errors.push(format!("Exercise {} lists no muscle groups", exercise.id));
            }
        }

        // Duplicate names within a category would make picker selection ambiguous
        for category in ExerciseCategory::SELECTABLE {
            let mut names: Vec<&str> = self
                .exercises
                .values()
                .filter(|e| e.category == category)
                .map(|e| e.name.as_str())
                .collect();
            let total = names.len();
            names.sort_unstable();
            names.dedup();
            if names.len() != total {
                errors.push(format!("Duplicate exercise names in category {:?}", category));
            }
            if total == 0 {
                errors.push(format!("Catalog has no exercises in category {:?}", category));
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_loads() {
        let catalog = build_default_catalog();
        assert!(catalog.exercises.len() >= 20);
    }

    #[test]
    fn test_default_catalog_validates() {
        let catalog = build_default_catalog();
        let errors = catalog.validate();
        assert!(
            errors.is_empty(),
            "Default catalog has validation errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_by_category_sorted_by_name() {
        let catalog = build_default_catalog();
        let chest = catalog.by_category(ExerciseCategory::Chest);
        assert!(chest.len() >= 2);
        for pair in chest.windows(2) {
            assert!(pair[0].name <= pair[1].name);
        }
        assert!(chest.iter().all(|e| e.category == ExerciseCategory::Chest));
    }

    #[test]
    fn test_every_selectable_category_has_presets() {
        let catalog = build_default_catalog();
        for category in ExerciseCategory::SELECTABLE {
            assert!(
                !catalog.by_category(category).is_empty(),
                "No presets in {:?}",
                category
            );
        }
    }

    #[test]
    fn test_get_known_exercise() {
        let catalog = build_default_catalog();
        let bench = catalog.get("bench_press").unwrap();
        assert_eq!(bench.name, "Bench Press");
        assert!(bench.is_preset);
    }
}
