// Library interface for climbrs modules
// This allows the CLI, integration tests and benches to share the core

pub mod calculator;
pub mod categories;
pub mod climb_time;
pub mod config;
pub mod constants;
pub mod custom_climb;
pub mod data;
pub mod display;
pub mod environment;
pub mod error;
pub mod export;
pub mod gearing;
pub mod import;
pub mod logging;
pub mod models;
pub mod physics;
pub mod storage;
pub mod units;

// Re-export commonly used types for convenience
pub use models::*;
pub use calculator::{reduce, Action, Calculator, CalculatorState};
pub use climb_time::{calculate_climb_time, ClimbConditions, ClimbTimeCalculator};
pub use custom_climb::{ClimbField, CustomClimbFields};
pub use data::ReferenceData;
pub use error::{ClimbRsError, Result};
pub use export::{ClimbReport, ExportFormat};
pub use gearing::{analyze_gears, GearAnalysis, RpmStatus};
pub use import::{GpxProfileImporter, ImportManager};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use physics::PhysicsModel;
pub use units::UnitSystem;
