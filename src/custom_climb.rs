//! Custom climb inference
//!
//! Distance, elevation and gradient are tied together by
//! `gradient% = elevation / (distance·1000) · 100`. Once two of them are
//! known the third follows. The field the rider just edited is never
//! recomputed.

use serde::{Deserialize, Serialize};

/// One of the three custom climb inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClimbField {
    Distance,
    Elevation,
    Gradient,
}

impl std::str::FromStr for ClimbField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "distance" => Ok(ClimbField::Distance),
            "elevation" => Ok(ClimbField::Elevation),
            "gradient" => Ok(ClimbField::Gradient),
            _ => Err(format!("Invalid climb field: {}", s)),
        }
    }
}

/// User-entered climb values; any of them may be missing
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CustomClimbFields {
    /// Length (km)
    pub distance: Option<f64>,
    /// Elevation gain (m)
    pub elevation: Option<f64>,
    /// Average gradient (%)
    pub gradient: Option<f64>,
}

fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

impl CustomClimbFields {
    pub fn new(distance: Option<f64>, elevation: Option<f64>, gradient: Option<f64>) -> Self {
        Self {
            distance,
            elevation,
            gradient,
        }
    }

    pub fn get(&self, field: ClimbField) -> Option<f64> {
        match field {
            ClimbField::Distance => self.distance,
            ClimbField::Elevation => self.elevation,
            ClimbField::Gradient => self.gradient,
        }
    }

    pub fn with(mut self, field: ClimbField, value: Option<f64>) -> Self {
        match field {
            ClimbField::Distance => self.distance = value,
            ClimbField::Elevation => self.elevation = value,
            ClimbField::Gradient => self.gradient = value,
        }
        self
    }

    /// All three values, when every one of them is present
    pub fn complete(&self) -> Option<(f64, f64, f64)> {
        Some((
            present(self.distance)?,
            present(self.elevation)?,
            present(self.gradient)?,
        ))
    }

    /// Values with zero or negative entries treated as missing
    pub fn normalized(&self) -> Self {
        Self {
            distance: present(self.distance),
            elevation: present(self.elevation),
            gradient: present(self.gradient),
        }
    }
}

pub fn gradient_from(distance_km: f64, elevation_m: f64) -> f64 {
    (elevation_m / (distance_km * 1000.0)) * 100.0
}

pub fn elevation_from(distance_km: f64, gradient_pct: f64) -> f64 {
    distance_km * 1000.0 * (gradient_pct / 100.0)
}

pub fn distance_from(elevation_m: f64, gradient_pct: f64) -> f64 {
    elevation_m / (gradient_pct / 100.0) / 1000.0
}

/// Derive the missing value after `changed` was edited
///
/// Returns `None` when fewer than two values are present. Otherwise the
/// first applicable rule wins: gradient from distance and elevation, then
/// elevation from distance and gradient, then distance from elevation and
/// gradient. A rule never targets the edited field; when none applies the
/// fields come back unchanged.
pub fn infer_missing(fields: &CustomClimbFields, changed: ClimbField) -> Option<CustomClimbFields> {
    let distance = present(fields.distance);
    let elevation = present(fields.elevation);
    let gradient = present(fields.gradient);

    let filled = [distance, elevation, gradient]
        .iter()
        .filter(|v| v.is_some())
        .count();
    if filled < 2 {
        return None;
    }

    let mut result = *fields;

    match (distance, elevation, gradient) {
        (Some(d), Some(e), _) if changed != ClimbField::Gradient => {
            result.gradient = Some(gradient_from(d, e));
        }
        (Some(d), _, Some(g)) if changed != ClimbField::Elevation => {
            result.elevation = Some(elevation_from(d, g));
        }
        (_, Some(e), Some(g)) if changed != ClimbField::Distance => {
            result.distance = Some(distance_from(e, g));
        }
        _ => {}
    }

    Some(result)
}
