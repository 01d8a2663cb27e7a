use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::calculator::CalculatorState;
use crate::constants::defaults;
use crate::custom_climb::CustomClimbFields;
use crate::logging::LogConfig;
use crate::physics::PhysicsModel;
use crate::units::UnitSystem;

const CONFIG_VERSION: &str = "1";

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application metadata
    pub metadata: ConfigMetadata,

    /// Starting values for a fresh calculator state
    #[serde(default)]
    pub rider: RiderDefaults,

    /// Physical model overrides
    #[serde(default)]
    pub physics: PhysicsModel,

    /// Where state and extra reference data live
    #[serde(default)]
    pub storage: StorageSettings,

    /// Logging output
    #[serde(default)]
    pub logging: LogConfig,
}

/// Configuration metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// Rider and selection defaults used when no saved state exists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiderDefaults {
    pub unit_system: UnitSystem,
    pub rider_weight_kg: f64,
    pub bike_weight_kg: f64,
    pub power_watts: f64,
    pub climb_id: String,
    pub chainring_id: String,
    pub cassette_id: String,
    pub altitude_m: f64,
    pub temperature_c: f64,
}

/// File locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory holding the persisted calculator state
    pub data_dir: PathBuf,

    /// Optional JSON file with extra climbs, chainrings or cassettes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_data: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let now = Utc::now();
        AppConfig {
            metadata: ConfigMetadata {
                version: CONFIG_VERSION.to_string(),
                created_at: now,
                updated_at: now,
            },
            rider: RiderDefaults::default(),
            physics: PhysicsModel::default(),
            storage: StorageSettings::default(),
            logging: LogConfig::default(),
        }
    }
}

impl Default for RiderDefaults {
    fn default() -> Self {
        RiderDefaults {
            unit_system: UnitSystem::Metric,
            rider_weight_kg: defaults::RIDER_WEIGHT_KG,
            bike_weight_kg: defaults::BIKE_WEIGHT_KG,
            power_watts: defaults::POWER_WATTS,
            climb_id: defaults::CLIMB_ID.to_string(),
            chainring_id: defaults::CHAINRING_ID.to_string(),
            cassette_id: defaults::CASSETTE_ID.to_string(),
            altitude_m: defaults::ALTITUDE_M,
            temperature_c: defaults::TEMPERATURE_C,
        }
    }
}

impl RiderDefaults {
    /// Calculator state seeded from these defaults
    pub fn initial_state(&self) -> CalculatorState {
        CalculatorState {
            unit_system: self.unit_system,
            rider_weight_kg: self.rider_weight_kg,
            bike_weight_kg: self.bike_weight_kg,
            power_watts: self.power_watts,
            selected_climb_id: self.climb_id.clone(),
            custom_climb: CustomClimbFields::default(),
            selected_chainring_id: self.chainring_id.clone(),
            selected_cassette_id: self.cassette_id.clone(),
            altitude_m: self.altitude_m,
            temperature_c: self.temperature_c,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            data_dir: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("climbrs"),
            reference_data: None,
        }
    }
}

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".climbrs")
            .join("config.toml")
    }

    /// Load configuration with fallback to defaults
    ///
    /// A missing file is not an error. A file that exists but cannot be
    /// read or parsed is reported on stderr, since logging is configured
    /// from this very file.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_config_path);

        if !config_path.exists() {
            return Self::default();
        }

        match Self::load_from_file(&config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "Ignoring config file {}: {:#}; using defaults",
                    config_path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save configuration to default location
    pub fn save_default(&mut self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to_file(config_path)
    }

    /// Reject physically meaningless values
    pub fn validate(&self) -> Result<()> {
        let physics = &self.physics;
        let positive = |v: f64| v.is_finite() && v > 0.0;
        let non_negative = |v: f64| v.is_finite() && v >= 0.0;

        if !positive(physics.gravity) {
            bail!("physics.gravity must be positive, got {}", physics.gravity);
        }
        if !non_negative(physics.crr) || !non_negative(physics.cda) {
            bail!("physics.crr and physics.cda must not be negative");
        }
        if !positive(physics.drivetrain_efficiency) || physics.drivetrain_efficiency > 1.0 {
            bail!(
                "physics.drivetrain_efficiency must be in (0, 1], got {}",
                physics.drivetrain_efficiency
            );
        }
        if !positive(self.rider.rider_weight_kg) || !non_negative(self.rider.bike_weight_kg) {
            bail!("rider weights must be positive");
        }
        Ok(())
    }
}
