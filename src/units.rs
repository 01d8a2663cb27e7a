//! Unit conversions and the metric/imperial presentation boundary
//!
//! All calculations run on canonical units (kilograms, kilometres, metres,
//! km/h, °C). `UnitSystem` converts to and from what the rider sees.

use serde::{Deserialize, Serialize};

use crate::constants::conversions::*;

pub fn lb_to_kg(lb: f64) -> f64 {
    lb * LB_TO_KG
}

pub fn kg_to_lb(kg: f64) -> f64 {
    kg * KG_TO_LB
}

pub fn km_to_mi(km: f64) -> f64 {
    km * KM_TO_MI
}

pub fn mi_to_km(mi: f64) -> f64 {
    mi * MI_TO_KM
}

pub fn m_to_ft(m: f64) -> f64 {
    m * M_TO_FT
}

pub fn ft_to_m(ft: f64) -> f64 {
    ft * FT_TO_M
}

pub fn kmh_to_mph(kmh: f64) -> f64 {
    kmh * KMH_TO_MPH
}

pub fn mph_to_kmh(mph: f64) -> f64 {
    mph * MPH_TO_KMH
}

pub fn mps_to_kmh(mps: f64) -> f64 {
    mps * MPS_TO_KMH
}

pub fn kmh_to_mps(kmh: f64) -> f64 {
    kmh / MPS_TO_KMH
}

/// Display unit preference
///
/// Only affects presentation; stored values are always canonical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Canonical kilograms to display weight
    pub fn weight_from_kg(&self, kg: f64) -> f64 {
        match self {
            UnitSystem::Metric => kg,
            UnitSystem::Imperial => kg_to_lb(kg),
        }
    }

    /// Display weight to canonical kilograms
    pub fn weight_to_kg(&self, value: f64) -> f64 {
        match self {
            UnitSystem::Metric => value,
            UnitSystem::Imperial => lb_to_kg(value),
        }
    }

    pub fn distance_from_km(&self, km: f64) -> f64 {
        match self {
            UnitSystem::Metric => km,
            UnitSystem::Imperial => km_to_mi(km),
        }
    }

    pub fn distance_to_km(&self, value: f64) -> f64 {
        match self {
            UnitSystem::Metric => value,
            UnitSystem::Imperial => mi_to_km(value),
        }
    }

    pub fn elevation_from_m(&self, m: f64) -> f64 {
        match self {
            UnitSystem::Metric => m,
            UnitSystem::Imperial => m_to_ft(m),
        }
    }

    pub fn elevation_to_m(&self, value: f64) -> f64 {
        match self {
            UnitSystem::Metric => value,
            UnitSystem::Imperial => ft_to_m(value),
        }
    }

    pub fn speed_from_kmh(&self, kmh: f64) -> f64 {
        match self {
            UnitSystem::Metric => kmh,
            UnitSystem::Imperial => kmh_to_mph(kmh),
        }
    }

    pub fn weight_label(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "kg",
            UnitSystem::Imperial => "lb",
        }
    }

    pub fn distance_label(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "km",
            UnitSystem::Imperial => "mi",
        }
    }

    pub fn elevation_label(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "m",
            UnitSystem::Imperial => "ft",
        }
    }

    pub fn speed_label(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "km/h",
            UnitSystem::Imperial => "mph",
        }
    }
}

impl std::str::FromStr for UnitSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" | "kg" | "km" => Ok(UnitSystem::Metric),
            "imperial" | "lb" | "mi" => Ok(UnitSystem::Imperial),
            _ => Err(format!("Invalid unit system: {}", s)),
        }
    }
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitSystem::Metric => write!(f, "metric"),
            UnitSystem::Imperial => write!(f, "imperial"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn relative_error(a: f64, b: f64) -> f64 {
        ((a - b) / b).abs()
    }

    #[test]
    fn test_known_conversions() {
        assert!((lb_to_kg(100.0) - 45.3592).abs() < 1e-9);
        assert!((km_to_mi(10.0) - 6.21371).abs() < 1e-9);
        assert!((m_to_ft(1000.0) - 3280.84).abs() < 1e-9);
        assert!((mps_to_kmh(10.0) - 36.0).abs() < 1e-9);
        assert!((kmh_to_mps(36.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_unit_system_is_display_only() {
        let imperial = UnitSystem::Imperial;
        let shown = imperial.weight_from_kg(70.0);
        assert!((shown - 154.32).abs() < 0.01);
        assert!((imperial.weight_to_kg(shown) - 70.0).abs() < 1e-9);

        let metric = UnitSystem::Metric;
        assert_eq!(metric.weight_from_kg(70.0), 70.0);
        assert_eq!(metric.weight_label(), "kg");
        assert_eq!(imperial.speed_label(), "mph");
    }

    #[test]
    fn test_unit_system_parsing() {
        assert_eq!("metric".parse::<UnitSystem>().unwrap(), UnitSystem::Metric);
        assert_eq!("LB".parse::<UnitSystem>().unwrap(), UnitSystem::Imperial);
        assert!("furlongs".parse::<UnitSystem>().is_err());
    }

    proptest! {
        #[test]
        fn test_weight_round_trip(x in 0.001f64..10_000.0) {
            prop_assert!(relative_error(kg_to_lb(lb_to_kg(x)), x) < 1e-6);
        }

        #[test]
        fn test_elevation_round_trip(x in 0.001f64..10_000.0) {
            prop_assert!(relative_error(ft_to_m(m_to_ft(x)), x) < 1e-6);
        }

        #[test]
        fn test_distance_and_speed_round_trip(x in 0.001f64..1_000.0) {
            prop_assert!(relative_error(mi_to_km(km_to_mi(x)), x) < 1e-6);
            prop_assert!(relative_error(mph_to_kmh(kmh_to_mph(x)), x) < 1e-6);
            prop_assert!(relative_error(kmh_to_mps(mps_to_kmh(x)), x) < 1e-6);
        }
    }
}
