//! Configuration file support for liftlog.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/liftlog/config.toml`.

use crate::{Error, Exercise, ExerciseCategory, Profile, Result, WeightUnit};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub profile: ProfileConfig,

    #[serde(default)]
    pub exercises: ExercisesConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Profile preference defaults, used until a stored profile exists
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default = "default_unit")]
    pub preferred_unit: WeightUnit,

    #[serde(default = "default_rest_timer_enabled")]
    pub rest_timer_enabled: bool,

    #[serde(default = "default_rest_timer_seconds")]
    pub rest_timer_seconds: u32,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            preferred_unit: default_unit(),
            rest_timer_enabled: default_rest_timer_enabled(),
            rest_timer_seconds: default_rest_timer_seconds(),
        }
    }
}

impl ProfileConfig {
    /// Build the profile these defaults describe
    pub fn to_profile(&self) -> Profile {
        Profile {
            preferred_unit: self.preferred_unit,
            rest_timer_enabled: self.rest_timer_enabled,
            rest_timer_seconds: self.rest_timer_seconds,
        }
    }
}

/// Custom exercise definition added alongside the presets
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CustomExercise {
    pub id: String,
    pub name: String,
    pub category: ExerciseCategory,
    #[serde(default)]
    pub muscle_groups: Vec<String>,
    pub equipment: Option<String>,
}

impl CustomExercise {
    pub fn to_exercise(&self) -> Exercise {
        Exercise {
            id: self.id.clone(),
            name: self.name.clone(),
            category: self.category,
            muscle_groups: self.muscle_groups.clone(),
            equipment: self.equipment.clone(),
            is_preset: false,
        }
    }
}

/// User-defined exercises configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct ExercisesConfig {
    #[serde(default)]
    pub custom: Vec<CustomExercise>,
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("liftlog")
}

fn default_unit() -> WeightUnit {
    WeightUnit::Lbs
}

fn default_rest_timer_enabled() -> bool {
    true
}

fn default_rest_timer_seconds() -> u32 {
    90
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("liftlog").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Custom exercises defined in the config, as exercise rows
    pub fn custom_exercises(&self) -> Vec<Exercise> {
        self.exercises
            .custom
            .iter()
            .map(CustomExercise::to_exercise)
            .collect()
    }
}
