//! Gear ratio and cadence analysis
//!
//! Climbing analysis always assumes the smallest chainring. For every cog the
//! cadence needed to hold the climb's average speed is classified into one of
//! four bands.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::constants::conversions::{INCHES_PER_MILE, KMH_TO_MPH};
use crate::constants::{rpm, WHEEL_DIAMETER_IN};

/// Cadence suitability band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RpmStatus {
    /// 70–95 rpm
    Ideal,
    /// 60–70 or 95–110 rpm
    Ok,
    /// Below 60 rpm
    TooSlow,
    /// Above 110 rpm
    TooFast,
}

impl RpmStatus {
    /// Classify a cadence
    pub fn classify(rpm: f64) -> Self {
        if (rpm::IDEAL_MIN..=rpm::IDEAL_MAX).contains(&rpm) {
            RpmStatus::Ideal
        } else if (rpm::OK_MIN..rpm::IDEAL_MIN).contains(&rpm)
            || (rpm > rpm::IDEAL_MAX && rpm <= rpm::OK_MAX)
        {
            RpmStatus::Ok
        } else if rpm < rpm::OK_MIN {
            RpmStatus::TooSlow
        } else {
            RpmStatus::TooFast
        }
    }

    /// Machine identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            RpmStatus::Ideal => "ideal",
            RpmStatus::Ok => "ok",
            RpmStatus::TooSlow => "too-slow",
            RpmStatus::TooFast => "too-fast",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            RpmStatus::Ideal => "Ideal",
            RpmStatus::Ok => "OK",
            RpmStatus::TooSlow => "Too slow",
            RpmStatus::TooFast => "Too fast",
        }
    }
}

impl std::fmt::Display for RpmStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Analysis of one chainring/cog combination
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GearAnalysis {
    pub chainring: u32,
    pub cog: u32,
    pub ratio: f64,
    pub gear_inches: f64,
    /// Cadence needed to hold the reference speed
    pub required_rpm: f64,
    pub status: RpmStatus,
}

pub fn gear_ratio(chainring: u32, cog: u32) -> f64 {
    f64::from(chainring) / f64::from(cog)
}

pub fn gear_inches(chainring: u32, cog: u32) -> f64 {
    gear_ratio(chainring, cog) * WHEEL_DIAMETER_IN
}

/// Cadence (rpm) needed to ride at `speed_kmh` in a gear of `gear_inches`
pub fn required_cadence(speed_kmh: f64, gear_inches: f64) -> f64 {
    let speed_mph = speed_kmh * KMH_TO_MPH;
    (speed_mph * INCHES_PER_MILE) / (gear_inches * PI * 60.0)
}

/// Analyse every cog against the smallest chainring, easiest gear first
///
/// Returns an empty list until there is a positive reference speed, and when
/// either tooth list is empty.
pub fn analyze_gears(chainrings: &[u32], cogs: &[u32], speed_kmh: f64) -> Vec<GearAnalysis> {
    if speed_kmh <= 0.0 || speed_kmh.is_nan() {
        return Vec::new();
    }
    let Some(&chainring) = chainrings.iter().filter(|&&t| t > 0).min() else {
        return Vec::new();
    };

    let mut gears: Vec<GearAnalysis> = cogs
        .iter()
        .filter(|&&cog| cog > 0)
        .map(|&cog| {
            let inches = gear_inches(chainring, cog);
            let required_rpm = required_cadence(speed_kmh, inches);
            GearAnalysis {
                chainring,
                cog,
                ratio: gear_ratio(chainring, cog),
                gear_inches: inches,
                required_rpm,
                status: RpmStatus::classify(required_rpm),
            }
        })
        .collect();

    gears.sort_by(|a, b| a.gear_inches.total_cmp(&b.gear_inches));
    gears
}
