//! Environmental model: air density and altitude-dependent power availability
//!
//! Pressure follows the International Standard Atmosphere barometric formula.
//! Power availability uses the cubic model of Bassett et al. (1999) for
//! non-acclimatised athletes.

use serde::Serialize;

use crate::constants::altitude_power;
use crate::constants::atmosphere::*;

/// Reference density used for the density comparison (kg/m³, ISA at 15°C)
pub const SEA_LEVEL_DENSITY: f64 = 1.225;

/// Barometric pressure (Pa) at the given altitude
pub fn barometric_pressure(altitude_m: f64) -> f64 {
    SEA_LEVEL_PRESSURE_PA
        * (1.0 - LAPSE_RATE * altitude_m / SEA_LEVEL_TEMPERATURE_K).powf(PRESSURE_EXPONENT)
}

/// Air density (kg/m³) at altitude for the given air temperature
pub fn air_density(altitude_m: f64, temperature_c: f64) -> f64 {
    let temperature_k = temperature_c + CELSIUS_TO_KELVIN;
    let pressure = barometric_pressure(altitude_m);
    (pressure * MOLAR_MASS_AIR) / (GAS_CONSTANT * temperature_k)
}

/// Percentage of sea-level power available at altitude, within [60, 100]
///
/// The cubic turns upward near 6.5 km; above that point the curve is held at
/// its minimum so availability never increases with altitude.
pub fn altitude_power_percent(altitude_m: f64) -> f64 {
    let x = (altitude_m / 1000.0).min(power_curve_minimum_km());
    let percent = altitude_power::A * x.powi(3)
        + altitude_power::B * x.powi(2)
        + altitude_power::C * x
        + 100.0;
    percent.clamp(altitude_power::MIN_PERCENT, altitude_power::MAX_PERCENT)
}

/// Altitude (km) where the cubic power model reaches its minimum
fn power_curve_minimum_km() -> f64 {
    // Positive root of the derivative 3A·x² + 2B·x + C
    let a = 3.0 * altitude_power::A;
    let b = 2.0 * altitude_power::B;
    let c = altitude_power::C;
    (-b + (b * b - 4.0 * a * c).sqrt()) / (2.0 * a)
}

/// Oxygen availability relative to sea level, as a percentage
///
/// Ratio of barometric pressure at altitude to sea-level pressure. Temperature
/// is ignored.
pub fn oxygen_percent(altitude_m: f64) -> f64 {
    barometric_pressure(altitude_m) / SEA_LEVEL_PRESSURE_PA * 100.0
}

/// How much the altitude costs in power
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerLossSeverity {
    /// Under 2%
    Negligible,
    /// 2–5%
    Mild,
    /// 5–10%
    Moderate,
    /// 10% or more
    Severe,
}

impl PowerLossSeverity {
    pub fn from_loss(loss_percent: f64) -> Self {
        if loss_percent < 2.0 {
            PowerLossSeverity::Negligible
        } else if loss_percent < 5.0 {
            PowerLossSeverity::Mild
        } else if loss_percent < 10.0 {
            PowerLossSeverity::Moderate
        } else {
            PowerLossSeverity::Severe
        }
    }
}

/// Conditions at a single altitude and temperature
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnvironmentSummary {
    pub altitude_m: f64,
    pub temperature_c: f64,
    pub air_density: f64,
    pub oxygen_percent: f64,
    pub power_percent: f64,
    /// `100 − power_percent`
    pub power_loss_percent: f64,
    /// Density relative to [`SEA_LEVEL_DENSITY`] (%); negative means thinner air
    pub density_change_percent: f64,
    pub severity: PowerLossSeverity,
}

impl EnvironmentSummary {
    pub fn at(altitude_m: f64, temperature_c: f64) -> Self {
        let density = air_density(altitude_m, temperature_c);
        let power_percent = altitude_power_percent(altitude_m);
        let power_loss_percent = 100.0 - power_percent;
        Self {
            altitude_m,
            temperature_c,
            air_density: density,
            oxygen_percent: oxygen_percent(altitude_m),
            power_percent,
            power_loss_percent,
            density_change_percent: (density - SEA_LEVEL_DENSITY) / SEA_LEVEL_DENSITY * 100.0,
            severity: PowerLossSeverity::from_loss(power_loss_percent),
        }
    }
}
