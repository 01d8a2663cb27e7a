//! Force-balance model and climbing velocity solver
//!
//! Steady-state climbing satisfies `P = v · (F_gravity + F_rolling + F_aero)`.
//! Gravity and rolling resistance do not depend on speed, so the balance is a
//! cubic in `v` that is solved here with Newton-Raphson iteration.

use serde::{Deserialize, Serialize};

use crate::constants::{
    CDA, CRR, DRIVETRAIN_EFFICIENCY, GRAVITY, MIN_VELOCITY_MS, SOLVER_MAX_ITERATIONS,
    SOLVER_TOLERANCE,
};

/// Rider-and-bike physical parameters used by the solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsModel {
    /// Gravitational acceleration (m/s²)
    pub gravity: f64,
    /// Rolling resistance coefficient
    pub crr: f64,
    /// Drag coefficient times frontal area (m²)
    pub cda: f64,
    /// Fraction of crank power reaching the rear wheel
    pub drivetrain_efficiency: f64,
}

impl Default for PhysicsModel {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            crr: CRR,
            cda: CDA,
            drivetrain_efficiency: DRIVETRAIN_EFFICIENCY,
        }
    }
}

/// Outcome of a velocity solve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocitySolution {
    /// Steady-state velocity (m/s), never below the numeric floor
    pub velocity_ms: f64,
    /// Newton-Raphson steps taken
    pub iterations: usize,
    /// Whether the last step was below the tolerance
    pub converged: bool,
}

impl PhysicsModel {
    /// Speed-independent resistance (gravity + rolling) in newtons
    pub fn static_force(&self, total_mass_kg: f64, gradient_percent: f64) -> f64 {
        let theta = (gradient_percent / 100.0).atan();
        let gravity_force = total_mass_kg * self.gravity * theta.sin();
        let rolling_force = self.crr * total_mass_kg * self.gravity * theta.cos();
        gravity_force + rolling_force
    }

    /// Aerodynamic drag (N) at the given speed
    pub fn aero_force(&self, velocity_ms: f64, air_density: f64) -> f64 {
        0.5 * self.cda * air_density * velocity_ms * velocity_ms
    }

    /// Power (W) needed to hold `velocity_ms` on the given gradient
    pub fn power_required(
        &self,
        velocity_ms: f64,
        total_mass_kg: f64,
        gradient_percent: f64,
        air_density: f64,
    ) -> f64 {
        velocity_ms
            * (self.static_force(total_mass_kg, gradient_percent)
                + self.aero_force(velocity_ms, air_density))
    }

    /// Crank power reduced by drivetrain losses and altitude availability
    pub fn effective_power(&self, power_watts: f64, power_percent: f64) -> f64 {
        power_watts * self.drivetrain_efficiency * (power_percent / 100.0)
    }

    /// Solve for the steady-state velocity at the given effective power
    ///
    /// The initial guess ignores drag (`P / F_static`) and falls back to the
    /// velocity floor when that is not a positive number. At most
    /// `SOLVER_MAX_ITERATIONS` steps are taken; the loop stops as soon as a
    /// step is smaller than `SOLVER_TOLERANCE`.
    pub fn solve(
        &self,
        effective_power: f64,
        total_mass_kg: f64,
        gradient_percent: f64,
        air_density: f64,
    ) -> VelocitySolution {
        let static_force = self.static_force(total_mass_kg, gradient_percent);

        let mut velocity = if static_force > 0.0 {
            effective_power / static_force
        } else {
            MIN_VELOCITY_MS
        };
        if velocity.is_nan() || velocity <= 0.0 {
            velocity = MIN_VELOCITY_MS;
        }

        let mut iterations = 0;
        let mut converged = false;

        while iterations < SOLVER_MAX_ITERATIONS {
            iterations += 1;

            let drag_term = self.cda * air_density * velocity * velocity;
            let f = velocity * (static_force + 0.5 * drag_term) - effective_power;
            let f_prime = static_force + 1.5 * drag_term;

            let delta = f / f_prime;
            velocity -= delta;

            if delta.abs() < SOLVER_TOLERANCE {
                converged = true;
                break;
            }
        }

        VelocitySolution {
            velocity_ms: velocity.max(MIN_VELOCITY_MS),
            iterations,
            converged,
        }
    }
}

/// Steady-state climbing velocity (m/s) with the default physical parameters
pub fn solve_velocity(
    effective_power: f64,
    total_mass_kg: f64,
    gradient_percent: f64,
    air_density: f64,
) -> f64 {
    PhysicsModel::default()
        .solve(effective_power, total_mass_kg, gradient_percent, air_density)
        .velocity_ms
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_static_force_on_flat() {
        let model = PhysicsModel::default();
        // Only rolling resistance on the flat
        let force = model.static_force(80.0, 0.0);
        assert!((force - 0.004 * 80.0 * 9.81).abs() < 1e-9);
    }

    #[test]
    fn test_climbing_speed_is_plausible() {
        // ~190W for 78kg at 8% should be just under 3 m/s
        let v = solve_velocity(190.0, 78.0, 8.0, 1.15);
        assert!(v > 2.5 && v < 3.2, "velocity was {}", v);
    }

    #[test]
    fn test_steeper_is_slower() {
        let gentle = solve_velocity(250.0, 75.0, 4.0, 1.2);
        let steep = solve_velocity(250.0, 75.0, 10.0, 1.2);
        assert!(steep < gentle);
    }

    #[test]
    fn test_more_power_is_faster() {
        let easy = solve_velocity(150.0, 75.0, 6.0, 1.2);
        let hard = solve_velocity(300.0, 75.0, 6.0, 1.2);
        assert!(hard > easy);
    }

    #[test]
    fn test_zero_power_hits_floor() {
        let v = solve_velocity(0.0, 75.0, 5.0, 1.2);
        assert_eq!(v, MIN_VELOCITY_MS);
    }

    #[test]
    fn test_zero_gradient_does_not_blow_up() {
        let solution = PhysicsModel::default().solve(200.0, 75.0, 0.0, 1.225);
        assert!(solution.velocity_ms.is_finite());
        assert!(solution.velocity_ms > 5.0);
    }

    #[test]
    fn test_solution_reports_convergence() {
        let solution = PhysicsModel::default().solve(200.0, 78.0, 8.1, 1.15);
        assert!(solution.converged);
        assert!(solution.iterations <= SOLVER_MAX_ITERATIONS);
    }

    #[test]
    fn test_solver_is_deterministic() {
        let a = solve_velocity(237.0, 81.5, 7.3, 1.1);
        let b = solve_velocity(237.0, 81.5, 7.3, 1.1);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    proptest! {
        #[test]
        fn test_power_balance_residual(
            power in 50.0f64..600.0,
            mass in 50.0f64..130.0,
            gradient in 2.0f64..20.0,
            density in 0.7f64..1.35,
        ) {
            let model = PhysicsModel::default();
            let v = solve_velocity(power, mass, gradient, density);
            let residual = (model.power_required(v, mass, gradient, density) - power).abs();
            prop_assert!(residual < 0.01 * power, "residual {} at v={}", residual, v);
        }
    }
}
