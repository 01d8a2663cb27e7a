use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

use crate::calculator::CalculatorState;
use crate::categories::vam_category;
use crate::environment::EnvironmentSummary;
use crate::error::ExportError;
use crate::gearing::GearAnalysis;
use crate::models::{CalculatorDerived, Climb, ClimbResult};
use crate::units::UnitSystem;

#[cfg(feature = "charts")]
pub mod chart;
pub mod csv;
pub mod json;
pub mod text;

/// Export format types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExportFormat {
    Json,
    Text,
    Csv,
    /// Elevation profile chart; needs the `charts` feature
    Svg,
}

impl std::str::FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "text" | "txt" => Ok(ExportFormat::Text),
            "csv" => Ok(ExportFormat::Csv),
            "svg" | "chart" => Ok(ExportFormat::Svg),
            _ => Err(ExportError::UnsupportedFormat {
                format: s.to_string(),
            }),
        }
    }
}

impl ExportFormat {
    /// Format implied by a file extension
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ExportError::UnsupportedFormat {
                format: path.display().to_string(),
            })?;
        ext.parse()
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Text => "txt",
            ExportFormat::Csv => "csv",
            ExportFormat::Svg => "svg",
        }
    }
}

/// Rider inputs echoed into a report, in canonical units
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportInputs {
    pub rider_weight_kg: f64,
    pub bike_weight_kg: f64,
    pub total_mass_kg: f64,
    pub power_watts: f64,
    pub altitude_m: f64,
    pub temperature_c: f64,
    pub chainring_id: String,
    pub cassette_id: String,
}

/// Everything known about one rider on one climb
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClimbReport {
    pub generated_at: DateTime<Utc>,
    /// Display units for text output; data fields stay canonical
    pub unit_system: UnitSystem,
    pub inputs: ReportInputs,
    pub climb: Climb,
    pub result: ClimbResult,
    pub power_to_weight: f64,
    pub power_category: &'static str,
    pub vam_category: &'static str,
    pub environment: EnvironmentSummary,
    pub gears: Vec<GearAnalysis>,
}

impl ClimbReport {
    /// Assemble a report; `None` when no climb is selected
    pub fn new(state: &CalculatorState, derived: &CalculatorDerived) -> Option<Self> {
        let climb = derived.selected_climb.clone()?;
        let result = derived.climb_result.clone()?;
        let vam_category = vam_category(result.vam);

        Some(Self {
            generated_at: Utc::now(),
            unit_system: state.unit_system,
            inputs: ReportInputs {
                rider_weight_kg: derived.rider_weight_kg,
                bike_weight_kg: derived.bike_weight_kg,
                total_mass_kg: derived.total_mass_kg,
                power_watts: state.power_watts,
                altitude_m: state.altitude_m,
                temperature_c: state.temperature_c,
                chainring_id: state.selected_chainring_id.clone(),
                cassette_id: state.selected_cassette_id.clone(),
            },
            climb,
            result,
            power_to_weight: derived.power_to_weight,
            power_category: derived.power_category,
            vam_category,
            environment: EnvironmentSummary::at(state.altitude_m, state.temperature_c),
            gears: derived.gear_analysis.clone(),
        })
    }
}

/// Write a report to `output_path` in the given format
pub fn export_report<P: AsRef<Path>>(
    report: &ClimbReport,
    format: ExportFormat,
    output_path: P,
) -> Result<(), ExportError> {
    let path = output_path.as_ref();
    tracing::info!(path = %path.display(), format = ?format, "Exporting climb report");

    match format {
        ExportFormat::Json => json::export_report(report, path),
        ExportFormat::Text => text::export_report(report, path),
        ExportFormat::Csv => csv::export_report(report, path),
        #[cfg(feature = "charts")]
        ExportFormat::Svg => chart::render_profile_svg(report, path),
        #[cfg(not(feature = "charts"))]
        ExportFormat::Svg => Err(ExportError::UnsupportedFormat {
            format: "svg (build with the `charts` feature)".to_string(),
        }),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::calculator::{reduce, Action, Calculator};
    use crate::models::{ElevationPoint, ElevationProfile};

    pub(crate) fn alpe_report() -> ClimbReport {
        let state = CalculatorState::default();
        let derived = Calculator::default().derive(&state);
        ClimbReport::new(&state, &derived).unwrap()
    }

    pub(crate) fn profiled_report() -> ClimbReport {
        let mut report = alpe_report();
        let profile = ElevationProfile::new(vec![
            ElevationPoint::new(0.0, 720.0, 9.0),
            ElevationPoint::new(2.0, 900.0, 9.0),
            ElevationPoint::new(4.0, 1060.0, 8.0),
        ])
        .unwrap();
        report.climb = Climb::custom(4.0, 340.0, 8.5).with_profile(profile);
        report.result = crate::climb_time::calculate_climb_time(200.0, 78.0, &report.climb, 15.0);
        report
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("txt".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert!("pdf".parse::<ExportFormat>().is_err());
        assert_eq!(
            ExportFormat::from_path(Path::new("out/report.csv")).unwrap(),
            ExportFormat::Csv
        );
        assert!(ExportFormat::from_path(Path::new("report")).is_err());
        assert_eq!(ExportFormat::Text.extension(), "txt");
    }

    #[test]
    fn test_report_requires_a_climb() {
        let state = reduce(
            CalculatorState::default(),
            Action::SetClimb {
                climb_id: "custom".to_string(),
            },
        );
        let derived = Calculator::default().derive(&state);
        assert!(ClimbReport::new(&state, &derived).is_none());
    }

    #[test]
    fn test_report_carries_inputs() {
        let report = alpe_report();
        assert_eq!(report.climb.id, "alpe-dhuez");
        assert_eq!(report.inputs.total_mass_kg, 78.0);
        assert_eq!(report.inputs.cassette_id, "11-34");
        assert_eq!(report.gears.len(), 12);
        assert_eq!(report.environment.altitude_m, 0.0);
    }

    #[cfg(not(feature = "charts"))]
    #[test]
    fn test_svg_needs_charts_feature() {
        let dir = tempfile::tempdir().unwrap();
        let err = export_report(&alpe_report(), ExportFormat::Svg, dir.path().join("a.svg"))
            .unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedFormat { .. }));
    }
}
