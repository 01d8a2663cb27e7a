//! Climb time integration
//!
//! A profiled climb is integrated segment by segment: each pair of adjacent
//! profile points is treated as a constant-gradient sub-climb evaluated at
//! its mid elevation. Climbs without a profile are solved once at the
//! average gradient, with altitude effects taken halfway up.

use crate::categories::calculate_vam;
use crate::environment::{air_density, altitude_power_percent, oxygen_percent};
use crate::models::{Climb, ClimbResult, ElevationProfile, ProfilePointData, Terrain};
use crate::physics::PhysicsModel;
use crate::units::mps_to_kmh;

/// Environmental inputs shared by every segment of a climb
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimbConditions {
    /// Crank power (W)
    pub power_watts: f64,
    /// Rider plus bike (kg)
    pub total_mass_kg: f64,
    /// Air temperature (°C)
    pub temperature_c: f64,
    /// Altitude of the climb's foot (m); only used for climbs without a profile
    pub base_altitude_m: f64,
}

impl ClimbConditions {
    pub fn new(power_watts: f64, total_mass_kg: f64, temperature_c: f64) -> Self {
        Self {
            power_watts,
            total_mass_kg,
            temperature_c,
            base_altitude_m: 0.0,
        }
    }

    pub fn with_base_altitude(mut self, altitude_m: f64) -> Self {
        self.base_altitude_m = altitude_m;
        self
    }
}

/// Climb time calculator bound to a physics model
#[derive(Debug, Clone, Default)]
pub struct ClimbTimeCalculator {
    physics: PhysicsModel,
}

impl ClimbTimeCalculator {
    pub fn new(physics: PhysicsModel) -> Self {
        Self { physics }
    }

    pub fn physics(&self) -> &PhysicsModel {
        &self.physics
    }

    /// Estimate time, speed and VAM for a climb
    pub fn calculate(&self, climb: &Climb, conditions: &ClimbConditions) -> ClimbResult {
        match &climb.terrain {
            Terrain::Uniform => self.calculate_uniform(climb, conditions),
            Terrain::Profiled(profile) => self.calculate_profiled(climb, profile, conditions),
        }
    }

    /// Single-segment estimate at the average gradient
    fn calculate_uniform(&self, climb: &Climb, conditions: &ClimbConditions) -> ClimbResult {
        let mid_altitude = conditions.base_altitude_m + climb.elevation_m / 2.0;
        let density = air_density(mid_altitude, conditions.temperature_c);
        let power_percent = altitude_power_percent(mid_altitude);
        let effective_power = self
            .physics
            .effective_power(conditions.power_watts, power_percent);

        let velocity = self
            .physics
            .solve(
                effective_power,
                conditions.total_mass_kg,
                climb.gradient_pct,
                density,
            )
            .velocity_ms;

        let time_seconds = climb.distance_km * 1000.0 / velocity;

        ClimbResult {
            time_seconds,
            avg_speed_kmh: mps_to_kmh(velocity),
            velocity_ms: velocity,
            vam: calculate_vam(climb.elevation_m, time_seconds),
            avg_power_percent: power_percent,
            profile_data: None,
        }
    }

    /// Segment-wise integration along the elevation profile
    fn calculate_profiled(
        &self,
        climb: &Climb,
        profile: &ElevationProfile,
        conditions: &ClimbConditions,
    ) -> ClimbResult {
        let mut total_time = 0.0;
        let mut total_distance = 0.0;
        let mut total_power_percent = 0.0;
        let mut segment_count = 0usize;

        for (start, end) in profile.segments() {
            let distance_m = (end.distance_km - start.distance_km) * 1000.0;
            let avg_elevation = (start.elevation_m + end.elevation_m) / 2.0;
            let gradient = (start.gradient_pct + end.gradient_pct) / 2.0;

            let density = air_density(avg_elevation, conditions.temperature_c);
            let power_percent = altitude_power_percent(avg_elevation);
            let effective_power = self
                .physics
                .effective_power(conditions.power_watts, power_percent);

            let velocity = self
                .physics
                .solve(effective_power, conditions.total_mass_kg, gradient, density)
                .velocity_ms;

            total_time += distance_m / velocity;
            total_distance += distance_m;
            total_power_percent += power_percent;
            segment_count += 1;
        }

        let velocity = total_distance / total_time;

        ClimbResult {
            time_seconds: total_time,
            avg_speed_kmh: mps_to_kmh(velocity),
            velocity_ms: velocity,
            vam: calculate_vam(climb.elevation_m, total_time),
            avg_power_percent: total_power_percent / segment_count as f64,
            profile_data: Some(self.profile_breakdown(profile, conditions)),
        }
    }

    /// Conditions at each individual profile point
    ///
    /// Display-only; the aggregate result is computed from segments.
    pub fn profile_breakdown(
        &self,
        profile: &ElevationProfile,
        conditions: &ClimbConditions,
    ) -> Vec<ProfilePointData> {
        profile
            .points()
            .iter()
            .map(|point| {
                let power_percent = altitude_power_percent(point.elevation_m);
                let density = air_density(point.elevation_m, conditions.temperature_c);
                let effective_power = self
                    .physics
                    .effective_power(conditions.power_watts, power_percent);
                let velocity = self
                    .physics
                    .solve(
                        effective_power,
                        conditions.total_mass_kg,
                        point.gradient_pct,
                        density,
                    )
                    .velocity_ms;

                ProfilePointData {
                    distance_km: point.distance_km,
                    elevation_m: point.elevation_m,
                    gradient_pct: point.gradient_pct,
                    oxygen_percent: oxygen_percent(point.elevation_m),
                    power_percent,
                    available_power_w: conditions.power_watts * power_percent / 100.0,
                    effective_power_w: effective_power,
                    speed_kmh: mps_to_kmh(velocity),
                }
            })
            .collect()
    }
}

/// Climb time with the default physical parameters
pub fn calculate_climb_time(
    power_watts: f64,
    total_mass_kg: f64,
    climb: &Climb,
    temperature_c: f64,
) -> ClimbResult {
    ClimbTimeCalculator::default().calculate(
        climb,
        &ClimbConditions::new(power_watts, total_mass_kg, temperature_c),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClimbCategory, ElevationPoint};

    fn alpe_dhuez() -> Climb {
        Climb::new(
            "alpe-dhuez",
            "Alpe d'Huez",
            "Isère, French Alps",
            13.8,
            1122.0,
            8.1,
            ClimbCategory::HorsCategorie,
        )
    }

    fn profiled_climb() -> Climb {
        let profile = ElevationProfile::new(vec![
            ElevationPoint::new(0.0, 1000.0, 6.0),
            ElevationPoint::new(2.0, 1120.0, 6.0),
            ElevationPoint::new(4.0, 1300.0, 9.0),
            ElevationPoint::new(6.0, 1460.0, 8.0),
        ])
        .unwrap();
        Climb::new("test", "Test", "Nowhere", 6.0, 460.0, 7.7, ClimbCategory::Cat1)
            .with_profile(profile)
    }

    #[test]
    fn test_alpe_dhuez_time_is_plausible() {
        let result = calculate_climb_time(200.0, 78.0, &alpe_dhuez(), 15.0);
        let hours = result.time_seconds / 3600.0;
        assert!(hours > 1.0 && hours < 1.5, "time was {} h", hours);
        assert!(result.profile_data.is_none());
        assert!((result.avg_speed_kmh - result.velocity_ms * 3.6).abs() < 1e-9);
        assert!((result.vam - 1122.0 / result.time_seconds * 3600.0).abs() < 1e-9);
    }

    #[test]
    fn test_uniform_uses_mid_climb_altitude() {
        let result = calculate_climb_time(200.0, 78.0, &alpe_dhuez(), 15.0);
        assert_eq!(result.avg_power_percent, altitude_power_percent(561.0));
    }

    #[test]
    fn test_base_altitude_slows_uniform_climb() {
        let calculator = ClimbTimeCalculator::default();
        let climb = alpe_dhuez();
        let sea_level = calculator.calculate(&climb, &ClimbConditions::new(250.0, 75.0, 15.0));
        let high = calculator.calculate(
            &climb,
            &ClimbConditions::new(250.0, 75.0, 15.0).with_base_altitude(2000.0),
        );
        assert!(high.time_seconds > sea_level.time_seconds);
    }

    #[test]
    fn test_profiled_integration() {
        let climb = profiled_climb();
        let result = calculate_climb_time(250.0, 75.0, &climb, 10.0);

        let data = result.profile_data.as_ref().unwrap();
        assert_eq!(data.len(), 4);
        assert!(data[0].oxygen_percent > data[3].oxygen_percent);
        assert!(data.iter().all(|p| p.effective_power_w < p.available_power_w));

        // Mean of the three segment midpoints' power availability
        let expected = (altitude_power_percent(1060.0)
            + altitude_power_percent(1210.0)
            + altitude_power_percent(1380.0))
            / 3.0;
        assert!((result.avg_power_percent - expected).abs() < 1e-9);

        assert!((result.avg_speed_kmh - 6000.0 / result.time_seconds * 3.6).abs() < 1e-9);
        assert!((result.vam - 460.0 / result.time_seconds * 3600.0).abs() < 1e-9);
    }

    #[test]
    fn test_profiled_matches_manual_segment_sum() {
        let climb = profiled_climb();
        let conditions = ClimbConditions::new(250.0, 75.0, 10.0);
        let calculator = ClimbTimeCalculator::default();
        let physics = calculator.physics();

        let profile = climb.terrain.profile().unwrap();
        let manual: f64 = profile
            .segments()
            .map(|(a, b)| {
                let elevation = (a.elevation_m + b.elevation_m) / 2.0;
                let power = physics.effective_power(250.0, altitude_power_percent(elevation));
                let v = physics
                    .solve(
                        power,
                        75.0,
                        (a.gradient_pct + b.gradient_pct) / 2.0,
                        air_density(elevation, 10.0),
                    )
                    .velocity_ms;
                (b.distance_km - a.distance_km) * 1000.0 / v
            })
            .sum();

        let result = calculator.calculate(&climb, &conditions);
        assert!((result.time_seconds - manual).abs() < 1e-9);
    }

    #[test]
    fn test_flat_climb_is_finite() {
        let climb = Climb::custom(5.0, 0.0, 0.0);
        let result = calculate_climb_time(200.0, 80.0, &climb, 20.0);
        assert!(result.time_seconds.is_finite());
        assert_eq!(result.vam, 0.0);
    }

    #[test]
    fn test_repeatable_results() {
        let climb = profiled_climb();
        let a = calculate_climb_time(231.0, 79.0, &climb, 12.0);
        let b = calculate_climb_time(231.0, 79.0, &climb, 12.0);
        assert_eq!(a, b);
        assert_eq!(a.time_seconds.to_bits(), b.time_seconds.to_bits());
    }
}
