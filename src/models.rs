use serde::{Deserialize, Serialize};

use crate::error::ProfileError;
use crate::gearing::GearAnalysis;

/// Climb difficulty classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClimbCategory {
    #[serde(rename = "HC")]
    HorsCategorie,
    #[serde(rename = "Cat 1")]
    Cat1,
    #[serde(rename = "Cat 2")]
    Cat2,
    #[serde(rename = "Cat 3")]
    Cat3,
    #[serde(rename = "Cat 4")]
    Cat4,
    Custom,
}

impl std::fmt::Display for ClimbCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClimbCategory::HorsCategorie => write!(f, "HC"),
            ClimbCategory::Cat1 => write!(f, "Cat 1"),
            ClimbCategory::Cat2 => write!(f, "Cat 2"),
            ClimbCategory::Cat3 => write!(f, "Cat 3"),
            ClimbCategory::Cat4 => write!(f, "Cat 4"),
            ClimbCategory::Custom => write!(f, "Custom"),
        }
    }
}

/// Single point of an elevation profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElevationPoint {
    /// Distance from the start of the climb (km)
    pub distance_km: f64,

    /// Altitude above sea level (m)
    pub elevation_m: f64,

    /// Local gradient at this point (%)
    pub gradient_pct: f64,
}

impl ElevationPoint {
    pub fn new(distance_km: f64, elevation_m: f64, gradient_pct: f64) -> Self {
        Self {
            distance_km,
            elevation_m,
            gradient_pct,
        }
    }
}

/// Validated elevation profile: at least two points, starting at distance 0,
/// strictly increasing in distance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ElevationPoint>", into = "Vec<ElevationPoint>")]
pub struct ElevationProfile {
    points: Vec<ElevationPoint>,
}

impl ElevationProfile {
    pub fn new(points: Vec<ElevationPoint>) -> Result<Self, ProfileError> {
        if points.len() < 2 {
            return Err(ProfileError::TooFewPoints {
                count: points.len(),
            });
        }

        for (index, point) in points.iter().enumerate() {
            if !(point.distance_km.is_finite()
                && point.elevation_m.is_finite()
                && point.gradient_pct.is_finite())
            {
                return Err(ProfileError::NonFinite { index });
            }
        }

        if points[0].distance_km != 0.0 {
            return Err(ProfileError::NonZeroStart {
                distance_km: points[0].distance_km,
            });
        }

        if let Some(index) = points
            .windows(2)
            .position(|pair| pair[1].distance_km <= pair[0].distance_km)
        {
            return Err(ProfileError::NotMonotonic { index: index + 1 });
        }

        Ok(Self { points })
    }

    pub fn points(&self) -> &[ElevationPoint] {
        &self.points
    }

    /// Number of points (always at least 2)
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Adjacent point pairs, one per constant-gradient segment
    pub fn segments(&self) -> impl Iterator<Item = (&ElevationPoint, &ElevationPoint)> {
        self.points.windows(2).map(|pair| (&pair[0], &pair[1]))
    }

    /// Total profile length (km)
    pub fn total_distance_km(&self) -> f64 {
        self.points
            .last()
            .map(|p| p.distance_km)
            .unwrap_or_default()
    }

    /// Net elevation change from first to last point (m)
    pub fn net_elevation_m(&self) -> f64 {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => last.elevation_m - first.elevation_m,
            _ => 0.0,
        }
    }
}

impl TryFrom<Vec<ElevationPoint>> for ElevationProfile {
    type Error = ProfileError;

    fn try_from(points: Vec<ElevationPoint>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<ElevationProfile> for Vec<ElevationPoint> {
    fn from(profile: ElevationProfile) -> Self {
        profile.points
    }
}

/// Shape of the climb between start and summit
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "points")]
pub enum Terrain {
    /// Only the average gradient is known
    #[default]
    Uniform,
    /// Piecewise-linear elevation profile
    Profiled(ElevationProfile),
}

impl Terrain {
    /// Build terrain from raw points
    ///
    /// Fewer than two points carry no segment, so they yield `Uniform`
    /// rather than an error. Anything else must validate as a profile.
    pub fn from_points(points: Vec<ElevationPoint>) -> Result<Self, ProfileError> {
        if points.len() < 2 {
            return Ok(Terrain::Uniform);
        }
        ElevationProfile::new(points).map(Terrain::Profiled)
    }

    pub fn profile(&self) -> Option<&ElevationProfile> {
        match self {
            Terrain::Uniform => None,
            Terrain::Profiled(profile) => Some(profile),
        }
    }

    pub fn is_uniform(&self) -> bool {
        matches!(self, Terrain::Uniform)
    }
}

/// A climb: identity, headline numbers and terrain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Climb {
    /// Unique identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Region or route description
    pub location: String,

    /// Length of the climb (km)
    pub distance_km: f64,

    /// Elevation gained (m)
    pub elevation_m: f64,

    /// Average gradient (%)
    pub gradient_pct: f64,

    /// Difficulty classification
    pub category: ClimbCategory,

    /// Profile, when one is known
    #[serde(default, skip_serializing_if = "Terrain::is_uniform")]
    pub terrain: Terrain,
}

impl Climb {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        location: impl Into<String>,
        distance_km: f64,
        elevation_m: f64,
        gradient_pct: f64,
        category: ClimbCategory,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location: location.into(),
            distance_km,
            elevation_m,
            gradient_pct,
            category,
            terrain: Terrain::Uniform,
        }
    }

    /// Climb built from user-entered custom values
    pub fn custom(distance_km: f64, elevation_m: f64, gradient_pct: f64) -> Self {
        Self::new(
            crate::constants::CUSTOM_CLIMB_ID,
            "Custom Climb",
            "Your route",
            distance_km,
            elevation_m,
            gradient_pct,
            ClimbCategory::Custom,
        )
    }

    /// Attach an elevation profile
    pub fn with_profile(mut self, profile: ElevationProfile) -> Self {
        self.terrain = Terrain::Profiled(profile);
        self
    }
}

/// Rider, bike and conditions; weights are always kilograms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiderState {
    pub rider_weight_kg: f64,
    pub bike_weight_kg: f64,
    pub power_watts: f64,
    pub unit_system: crate::units::UnitSystem,
    /// Starting altitude (m)
    pub altitude_m: f64,
    /// Air temperature (°C)
    pub temperature_c: f64,
}

impl RiderState {
    pub fn total_mass_kg(&self) -> f64 {
        self.rider_weight_kg + self.bike_weight_kg
    }
}

/// Per-point breakdown along a profiled climb
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfilePointData {
    pub distance_km: f64,
    pub elevation_m: f64,
    pub gradient_pct: f64,
    /// Oxygen availability relative to sea level (%)
    pub oxygen_percent: f64,
    /// Power available relative to sea level (%)
    pub power_percent: f64,
    /// Rider power after the altitude reduction only (W)
    pub available_power_w: f64,
    /// Power at the wheel after altitude and drivetrain losses (W)
    pub effective_power_w: f64,
    /// Steady speed at this point's gradient and altitude (km/h)
    pub speed_kmh: f64,
}

/// Outcome of a climb time calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimbResult {
    /// Total climbing time (s)
    pub time_seconds: f64,

    /// Average speed (km/h)
    pub avg_speed_kmh: f64,

    /// Average velocity (m/s)
    pub velocity_ms: f64,

    /// Vertical ascent rate (m/h)
    pub vam: f64,

    /// Mean power availability across segments (%)
    pub avg_power_percent: f64,

    /// Point-by-point breakdown for profiled climbs
    pub profile_data: Option<Vec<ProfilePointData>>,
}

/// Everything derived from the calculator state in one pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculatorDerived {
    pub rider_weight_kg: f64,
    pub bike_weight_kg: f64,
    pub total_mass_kg: f64,
    pub power_to_weight: f64,
    pub power_category: &'static str,
    pub selected_climb: Option<Climb>,
    pub climb_result: Option<ClimbResult>,
    pub vam_category: Option<&'static str>,
    pub gear_analysis: Vec<GearAnalysis>,
    pub avg_speed_kmh: f64,
}
