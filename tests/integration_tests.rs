use climbrs::gearing::RpmStatus;
use climbrs::models::{ClimbCategory, ElevationPoint, ElevationProfile, Terrain};
use climbrs::{
    calculate_climb_time, reduce, Action, Calculator, CalculatorState, ClimbField, Climb,
    ClimbConditions, ClimbTimeCalculator, PhysicsModel, ReferenceData, UnitSystem,
};

/// Integration tests that drive the calculator the way the CLI does

#[cfg(test)]
mod integration_tests {
    use super::*;

    fn custom_state(distance: f64, elevation: f64) -> CalculatorState {
        CalculatorState::default().apply_all([
            Action::SetClimb {
                climb_id: "custom".to_string(),
            },
            Action::SetCustomClimbField {
                field: ClimbField::Distance,
                value: Some(distance),
            },
            Action::SetCustomClimbField {
                field: ClimbField::Elevation,
                value: Some(elevation),
            },
        ])
    }

    /// Default rider on Alpe d'Huez at sea level
    #[test]
    fn test_default_alpe_dhuez_workflow() {
        let calculator = Calculator::default();
        let state = CalculatorState::default();
        let derived = calculator.derive(&state);

        let climb = derived.selected_climb.as_ref().unwrap();
        assert_eq!(climb.name, "Alpe d'Huez");
        assert_eq!(climb.category, ClimbCategory::HorsCategorie);

        let result = derived.climb_result.as_ref().unwrap();
        assert!(result.time_seconds > 3600.0 && result.time_seconds < 5400.0);
        assert!(result.profile_data.is_none());
        assert_eq!(derived.total_mass_kg, 78.0);
        assert!((derived.power_to_weight - 200.0 / 70.0).abs() < 1e-12);

        // Compact crank: everything on the 34
        assert_eq!(derived.gear_analysis.len(), 12);
        assert!(derived.gear_analysis.iter().all(|g| g.chainring == 34));
        assert_eq!(derived.gear_analysis[0].cog, 34);
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let calculator = Calculator::default();
        let state = CalculatorState::default().apply_all([
            Action::SetPower { watts: 260.0 },
            Action::SetAltitude { altitude_m: 1200.0 },
            Action::SetClimb {
                climb_id: "ventoux".to_string(),
            },
        ]);

        let first = calculator.derive(&state);
        let second = calculator.derive(&state);
        let a = first.climb_result.unwrap();
        let b = second.climb_result.unwrap();
        assert_eq!(a.time_seconds.to_bits(), b.time_seconds.to_bits());
        assert_eq!(a.vam.to_bits(), b.vam.to_bits());
        assert_eq!(first.gear_analysis, second.gear_analysis);
    }

    #[test]
    fn test_every_preset_produces_a_result() {
        let calculator = Calculator::default();
        for climb in &ReferenceData::builtin().climbs {
            let state = reduce(
                CalculatorState::default(),
                Action::SetClimb {
                    climb_id: climb.id.clone(),
                },
            );
            let result = calculator.derive(&state).climb_result.unwrap();
            assert!(result.time_seconds.is_finite() && result.time_seconds > 0.0, "{}", climb.id);
            assert!(result.vam > 0.0, "{}", climb.id);
        }
    }

    #[test]
    fn test_more_power_is_faster() {
        let calculator = Calculator::default();
        let slow = calculator.derive(&CalculatorState::default());
        let fast = calculator.derive(&reduce(
            CalculatorState::default(),
            Action::SetPower { watts: 300.0 },
        ));
        assert!(
            fast.climb_result.unwrap().time_seconds < slow.climb_result.unwrap().time_seconds
        );
    }

    #[test]
    fn test_custom_climb_inference_feeds_derivation() {
        let state = custom_state(13.8, 1122.0);
        let gradient = state.custom_climb.gradient.unwrap();
        assert!((gradient - 8.13).abs() < 0.01);

        let derived = Calculator::default().derive(&state);
        let climb = derived.selected_climb.unwrap();
        assert_eq!(climb.category, ClimbCategory::Custom);
        assert_eq!(climb.distance_km, 13.8);

        // Nearly the preset's geometry (8.13% against a rounded 8.1%)
        let preset = Calculator::default()
            .derive(&CalculatorState::default())
            .climb_result
            .unwrap();
        let custom = derived.climb_result.unwrap();
        assert!((custom.time_seconds - preset.time_seconds).abs() / preset.time_seconds < 0.01);
    }

    #[test]
    fn test_incomplete_custom_climb_has_no_result() {
        let state = CalculatorState::default().apply_all([
            Action::SetClimb {
                climb_id: "custom".to_string(),
            },
            Action::SetCustomClimbField {
                field: ClimbField::Distance,
                value: Some(5.0),
            },
        ]);
        let derived = Calculator::default().derive(&state);
        assert!(derived.selected_climb.is_none());
        assert!(derived.climb_result.is_none());
        assert!(derived.gear_analysis.is_empty());
        assert_eq!(derived.vam_category, None);
    }

    #[test]
    fn test_unit_switch_keeps_canonical_values() {
        let metric = CalculatorState::default();
        let imperial = reduce(
            metric.clone(),
            Action::SetUnitSystem {
                unit_system: UnitSystem::Imperial,
            },
        );
        assert_eq!(imperial.rider_weight_kg, metric.rider_weight_kg);

        let calculator = Calculator::default();
        assert_eq!(
            calculator.derive(&metric).climb_result,
            calculator.derive(&imperial).climb_result
        );
    }

    #[test]
    fn test_imperial_weight_entry() {
        let state = reduce(
            CalculatorState::default(),
            Action::rider_weight_in(UnitSystem::Imperial, 165.0),
        );
        assert!((state.rider_weight_kg - 165.0 * 0.453592).abs() < 1e-9);
    }

    #[test]
    fn test_profiled_climb_breakdown() {
        let profile = ElevationProfile::new(vec![
            ElevationPoint::new(0.0, 1000.0, 4.0),
            ElevationPoint::new(1.0, 1040.0, 12.0),
            ElevationPoint::new(2.0, 1160.0, 12.0),
        ])
        .unwrap();
        let climb = Climb::custom(2.0, 160.0, 8.0).with_profile(profile);
        assert!(matches!(climb.terrain, Terrain::Profiled(_)));

        let result = calculate_climb_time(250.0, 80.0, &climb, 15.0);
        let points = result.profile_data.unwrap();
        assert_eq!(points.len(), 3);
        // Steeper ground, slower rider
        assert!(points[1].speed_kmh < points[0].speed_kmh);
        assert!(points.iter().all(|p| p.effective_power_w < p.available_power_w));
        assert!(result.time_seconds > 0.0);
    }

    #[test]
    fn test_altitude_offsets_uniform_climb() {
        let climb = ReferenceData::builtin().climb("alpe-dhuez").cloned().unwrap();
        let calculator = ClimbTimeCalculator::new(PhysicsModel::default());

        let sea_level = calculator.calculate(&climb, &ClimbConditions::new(200.0, 78.0, 15.0));
        let high = calculator.calculate(
            &climb,
            &ClimbConditions::new(200.0, 78.0, 15.0).with_base_altitude(2000.0),
        );
        assert!(high.avg_power_percent < sea_level.avg_power_percent);
        assert!(high.time_seconds > sea_level.time_seconds);
    }

    #[test]
    fn test_rpm_status_boundaries() {
        assert_eq!(RpmStatus::classify(70.0), RpmStatus::Ideal);
        assert_eq!(RpmStatus::classify(69.999), RpmStatus::Ok);
        assert_eq!(RpmStatus::classify(59.999), RpmStatus::TooSlow);
        assert_eq!(RpmStatus::classify(110.001), RpmStatus::TooFast);
    }
}
