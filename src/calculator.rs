//! Calculator state, actions and the derived-value pipeline
//!
//! State is owned by the caller and replaced wholesale by [`reduce`]. Every
//! derived value is recomputed from scratch by [`Calculator::derive`], so two
//! derivations from equal state are identical.

use serde::{Deserialize, Serialize};

use crate::categories::{power_category, power_to_weight, vam_category};
use crate::climb_time::{ClimbConditions, ClimbTimeCalculator};
use crate::constants::{defaults, CUSTOM_CLIMB_ID};
use crate::custom_climb::{infer_missing, ClimbField, CustomClimbFields};
use crate::data::ReferenceData;
use crate::gearing::analyze_gears;
use crate::models::{CalculatorDerived, Climb, RiderState};
use crate::physics::PhysicsModel;
use crate::units::UnitSystem;

/// Snapshot of every user input; weights are kilograms regardless of the
/// display unit system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalculatorState {
    pub unit_system: UnitSystem,
    #[serde(rename = "riderWeight")]
    pub rider_weight_kg: f64,
    #[serde(rename = "bikeWeight")]
    pub bike_weight_kg: f64,
    #[serde(rename = "power")]
    pub power_watts: f64,
    pub selected_climb_id: String,
    pub custom_climb: CustomClimbFields,
    pub selected_chainring_id: String,
    pub selected_cassette_id: String,
    #[serde(rename = "altitude")]
    pub altitude_m: f64,
    #[serde(rename = "temperature")]
    pub temperature_c: f64,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            unit_system: UnitSystem::Metric,
            rider_weight_kg: defaults::RIDER_WEIGHT_KG,
            bike_weight_kg: defaults::BIKE_WEIGHT_KG,
            power_watts: defaults::POWER_WATTS,
            selected_climb_id: defaults::CLIMB_ID.to_string(),
            custom_climb: CustomClimbFields::default(),
            selected_chainring_id: defaults::CHAINRING_ID.to_string(),
            selected_cassette_id: defaults::CASSETTE_ID.to_string(),
            altitude_m: defaults::ALTITUDE_M,
            temperature_c: defaults::TEMPERATURE_C,
        }
    }
}

impl CalculatorState {
    pub fn rider(&self) -> RiderState {
        RiderState {
            rider_weight_kg: self.rider_weight_kg,
            bike_weight_kg: self.bike_weight_kg,
            power_watts: self.power_watts,
            unit_system: self.unit_system,
            altitude_m: self.altitude_m,
            temperature_c: self.temperature_c,
        }
    }

    pub fn is_custom_climb(&self) -> bool {
        self.selected_climb_id == CUSTOM_CLIMB_ID
    }

    /// Apply a batch of actions in order
    pub fn apply_all<I: IntoIterator<Item = Action>>(self, actions: I) -> Self {
        actions.into_iter().fold(self, reduce)
    }
}

/// A single user edit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Display-only; stored weights are left alone
    SetUnitSystem { unit_system: UnitSystem },
    SetRiderWeight { weight_kg: f64 },
    SetBikeWeight { weight_kg: f64 },
    SetPower { watts: f64 },
    SetClimb { climb_id: String },
    SetCustomClimbField { field: ClimbField, value: Option<f64> },
    SetChainring { id: String },
    SetCassette { id: String },
    SetAltitude { altitude_m: f64 },
    SetTemperature { temperature_c: f64 },
}

impl Action {
    /// Rider weight entered in the given unit system
    pub fn rider_weight_in(unit_system: UnitSystem, value: f64) -> Self {
        Action::SetRiderWeight {
            weight_kg: unit_system.weight_to_kg(value),
        }
    }

    /// Bike weight entered in the given unit system
    pub fn bike_weight_in(unit_system: UnitSystem, value: f64) -> Self {
        Action::SetBikeWeight {
            weight_kg: unit_system.weight_to_kg(value),
        }
    }
}

/// Inferred zero (or NaN) values are stored as absent
fn nonzero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}

/// Produce the next state; only the field named by the action changes
pub fn reduce(state: CalculatorState, action: Action) -> CalculatorState {
    match action {
        Action::SetUnitSystem { unit_system } => CalculatorState {
            unit_system,
            ..state
        },
        Action::SetRiderWeight { weight_kg } => CalculatorState {
            rider_weight_kg: weight_kg,
            ..state
        },
        Action::SetBikeWeight { weight_kg } => CalculatorState {
            bike_weight_kg: weight_kg,
            ..state
        },
        Action::SetPower { watts } => CalculatorState {
            power_watts: watts,
            ..state
        },
        Action::SetClimb { climb_id } => CalculatorState {
            selected_climb_id: climb_id,
            ..state
        },
        Action::SetCustomClimbField { field, value } => {
            let edited = state.custom_climb.with(field, value);
            let custom_climb = match infer_missing(&edited, field) {
                Some(inferred) => CustomClimbFields::new(
                    nonzero(inferred.distance),
                    nonzero(inferred.elevation),
                    nonzero(inferred.gradient),
                ),
                None => edited,
            };
            CalculatorState {
                custom_climb,
                ..state
            }
        }
        Action::SetChainring { id } => CalculatorState {
            selected_chainring_id: id,
            ..state
        },
        Action::SetCassette { id } => CalculatorState {
            selected_cassette_id: id,
            ..state
        },
        Action::SetAltitude { altitude_m } => CalculatorState { altitude_m, ..state },
        Action::SetTemperature { temperature_c } => CalculatorState {
            temperature_c,
            ..state
        },
    }
}

/// Derives display values from calculator state against a set of reference
/// tables and a physics model
#[derive(Debug, Clone, Default)]
pub struct Calculator {
    reference: ReferenceData,
    climb_time: ClimbTimeCalculator,
}

impl Calculator {
    pub fn new(reference: ReferenceData, physics: PhysicsModel) -> Self {
        Self {
            reference,
            climb_time: ClimbTimeCalculator::new(physics),
        }
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn physics(&self) -> &PhysicsModel {
        self.climb_time.physics()
    }

    /// Climb for the current selection
    ///
    /// The custom climb exists only once all three of its values are
    /// positive; an unknown preset id selects nothing.
    pub fn selected_climb(&self, state: &CalculatorState) -> Option<Climb> {
        if state.is_custom_climb() {
            let (distance, elevation, gradient) = state.custom_climb.complete()?;
            Some(Climb::custom(distance, elevation, gradient))
        } else {
            self.reference.climb(&state.selected_climb_id).cloned()
        }
    }

    pub fn derive(&self, state: &CalculatorState) -> CalculatorDerived {
        let rider = state.rider();
        let total_mass_kg = rider.total_mass_kg();

        let power_to_weight = power_to_weight(state.power_watts, state.rider_weight_kg);
        let selected_climb = self.selected_climb(state);

        let conditions = ClimbConditions::new(state.power_watts, total_mass_kg, state.temperature_c)
            .with_base_altitude(state.altitude_m);
        let climb_result = selected_climb
            .as_ref()
            .map(|climb| self.climb_time.calculate(climb, &conditions));

        let avg_speed_kmh = climb_result
            .as_ref()
            .map(|r| r.avg_speed_kmh)
            .filter(|s| s.is_finite())
            .unwrap_or(0.0);

        let gear_analysis = if avg_speed_kmh > 0.0 {
            analyze_gears(
                self.reference.chainring_teeth(&state.selected_chainring_id),
                self.reference.cassette_cogs(&state.selected_cassette_id),
                avg_speed_kmh,
            )
        } else {
            Vec::new()
        };

        CalculatorDerived {
            rider_weight_kg: state.rider_weight_kg,
            bike_weight_kg: state.bike_weight_kg,
            total_mass_kg,
            power_to_weight,
            power_category: power_category(power_to_weight),
            vam_category: climb_result.as_ref().map(|r| vam_category(r.vam)),
            selected_climb,
            climb_result,
            gear_analysis,
            avg_speed_kmh,
        }
    }
}
