//! Physical constants, classification tables and default values
//!
//! Everything the calculation modules treat as fixed lives here so the
//! numbers are reviewed in one place.

/// Gravitational acceleration (m/s²)
pub const GRAVITY: f64 = 9.81;

/// Rolling resistance coefficient (good road surface)
pub const CRR: f64 = 0.004;

/// Aerodynamic drag area (m²), climbing on the hoods
pub const CDA: f64 = 0.35;

/// Drivetrain efficiency (97%)
pub const DRIVETRAIN_EFFICIENCY: f64 = 0.97;

/// Wheel diameter in inches used for gear-inch calculations (700c with 25mm tyre)
pub const WHEEL_DIAMETER_IN: f64 = 27.0;

/// Numeric floor for solved velocities (m/s)
pub const MIN_VELOCITY_MS: f64 = 0.1;

/// Newton-Raphson iteration budget
pub const SOLVER_MAX_ITERATIONS: usize = 20;

/// Newton-Raphson step size below which the solve is considered converged (m/s)
pub const SOLVER_TOLERANCE: f64 = 1e-4;

/// International Standard Atmosphere parameters
pub mod atmosphere {
    /// Sea level pressure (Pa)
    pub const SEA_LEVEL_PRESSURE_PA: f64 = 101_325.0;
    /// Temperature lapse rate (K/m)
    pub const LAPSE_RATE: f64 = 0.0065;
    /// Sea level standard temperature (K)
    pub const SEA_LEVEL_TEMPERATURE_K: f64 = 288.15;
    /// Barometric exponent
    pub const PRESSURE_EXPONENT: f64 = 5.2561;
    /// Molar mass of dry air (kg/mol)
    pub const MOLAR_MASS_AIR: f64 = 0.0289644;
    /// Universal gas constant (J/(mol·K))
    pub const GAS_CONSTANT: f64 = 8.31447;
    /// Offset between Celsius and Kelvin
    pub const CELSIUS_TO_KELVIN: f64 = 273.15;
}

/// Altitude power model coefficients (non-acclimatised athletes, x in km)
///
/// `percent = A·x³ + B·x² + C·x + 100`, clamped to `[MIN_PERCENT, 100]`.
pub mod altitude_power {
    pub const A: f64 = 0.178;
    pub const B: f64 = -1.43;
    pub const C: f64 = -4.07;
    pub const MIN_PERCENT: f64 = 60.0;
    pub const MAX_PERCENT: f64 = 100.0;
}

/// Cadence bands (rpm)
pub mod rpm {
    pub const IDEAL_MIN: f64 = 70.0;
    pub const IDEAL_MAX: f64 = 95.0;
    pub const OK_MIN: f64 = 60.0;
    pub const OK_MAX: f64 = 110.0;
}

/// Unit conversion factors
pub mod conversions {
    pub const LB_TO_KG: f64 = 0.453592;
    pub const KG_TO_LB: f64 = 1.0 / LB_TO_KG;
    pub const KM_TO_MI: f64 = 0.621371;
    pub const MI_TO_KM: f64 = 1.0 / KM_TO_MI;
    pub const M_TO_FT: f64 = 3.28084;
    pub const FT_TO_M: f64 = 1.0 / M_TO_FT;
    pub const MPS_TO_KMH: f64 = 3.6;
    pub const KMH_TO_MPH: f64 = KM_TO_MI;
    pub const MPH_TO_KMH: f64 = MI_TO_KM;
    pub const INCHES_PER_MILE: f64 = 63_360.0;
}

/// Power-to-weight categories, descending by minimum W/kg
pub const POWER_CATEGORIES: &[(f64, &str)] = &[
    (6.0, "World-class professional"),
    (5.0, "Professional / Elite"),
    (4.0, "Very strong amateur / Cat 1-2"),
    (3.5, "Strong amateur / Cat 3"),
    (3.0, "Good fitness / Cat 4-5"),
    (2.5, "Recreational rider"),
    (0.0, "Beginner"),
];

/// Label returned when no power category threshold matches
pub const FALLBACK_POWER_CATEGORY: &str = "Beginner";

/// VAM brackets (vertical metres per hour), descending by minimum VAM
pub const VAM_CATEGORIES: &[(f64, &str)] = &[
    (1700.0, "Grand Tour contender"),
    (1500.0, "World-class"),
    (1200.0, "Elite"),
    (900.0, "Competitive"),
    (600.0, "Recreational"),
    (0.0, "Beginner"),
];

/// Default calculator values
pub mod defaults {
    pub const RIDER_WEIGHT_KG: f64 = 70.0;
    pub const BIKE_WEIGHT_KG: f64 = 8.0;
    pub const POWER_WATTS: f64 = 200.0;
    pub const CLIMB_ID: &str = "alpe-dhuez";
    pub const CHAINRING_ID: &str = "50-34";
    pub const CASSETTE_ID: &str = "11-34";
    pub const ALTITUDE_M: f64 = 0.0;
    pub const TEMPERATURE_C: f64 = 15.0;
    /// Chainring used when the selected id is unknown
    pub const CHAINRING_TEETH: &[u32] = &[50, 34];
    /// Cassette used when the selected id is unknown
    pub const CASSETTE_COGS: &[u32] = &[11, 12, 13, 14, 15, 17, 19, 21, 24, 27, 30, 34];
}

/// Climb id that selects the user-entered custom climb
pub const CUSTOM_CLIMB_ID: &str = "custom";
