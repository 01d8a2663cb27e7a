use super::{ClimbReport, ExportError};
use plotters::prelude::*;
use std::path::Path;

const CHART_SIZE: (u32, u32) = (1280, 720);
const PROFILE_COLOR: RGBColor = RGBColor(200, 0, 100);

/// Distance/elevation pairs in display units
///
/// Climbs without a profile are drawn as a straight ramp from the start
/// altitude to the summit.
fn profile_series(report: &ClimbReport) -> Vec<(f64, f64)> {
    let units = report.unit_system;
    match &report.result.profile_data {
        Some(points) => points
            .iter()
            .map(|p| {
                (
                    units.distance_from_km(p.distance_km),
                    units.elevation_from_m(p.elevation_m),
                )
            })
            .collect(),
        None => {
            let base = report.inputs.altitude_m;
            vec![
                (0.0, units.elevation_from_m(base)),
                (
                    units.distance_from_km(report.climb.distance_km),
                    units.elevation_from_m(base + report.climb.elevation_m),
                ),
            ]
        }
    }
}

/// Render the climb's elevation profile as an SVG chart
pub fn render_profile_svg<P: AsRef<Path>>(report: &ClimbReport, output_path: P) -> Result<(), ExportError> {
    let series = profile_series(report);
    if series.len() < 2 {
        return Err(ExportError::Chart {
            reason: "profile needs at least two points".to_string(),
        });
    }

    draw(report, &series, output_path.as_ref()).map_err(|e| ExportError::Chart {
        reason: e.to_string(),
    })
}

fn draw(
    report: &ClimbReport,
    series: &[(f64, f64)],
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let units = report.unit_system;
    let x_max = series.iter().map(|(x, _)| *x).fold(0.0, f64::max);
    let y_min = series.iter().map(|(_, y)| *y).fold(f64::INFINITY, f64::min);
    let y_max = series.iter().map(|(_, y)| *y).fold(f64::NEG_INFINITY, f64::max);
    let pad = ((y_max - y_min) * 0.1).max(10.0);
    let floor = y_min - pad;

    let area = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    area.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&area)
        .caption(&report.climb.name, ("sans-serif", 28))
        .margin(25)
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Bottom, 45)
        .build_cartesian_2d(0.0..x_max.max(f64::EPSILON), floor..(y_max + pad))?;

    chart
        .configure_mesh()
        .x_desc(format!("Distance ({})", units.distance_label()))
        .y_desc(format!("Elevation ({})", units.elevation_label()))
        .x_label_formatter(&|v| format!("{:.1}", v))
        .y_label_formatter(&|v| format!("{:.0}", v))
        .draw()?;

    chart.draw_series(AreaSeries::new(
        series.iter().copied(),
        floor,
        PROFILE_COLOR.mix(0.2),
    ))?;
    chart.draw_series(LineSeries::new(series.iter().copied(), &PROFILE_COLOR))?;

    area.present()?;
    tracing::debug!(path = %path.display(), points = series.len(), "Rendered profile chart");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::{alpe_report, profiled_report};

    #[test]
    fn test_uniform_climb_is_a_ramp() {
        let series = profile_series(&alpe_report());
        assert_eq!(series.len(), 2);
        assert_eq!(series[0], (0.0, 0.0));
        assert!((series[1].1 - 1122.0).abs() < 1e-9);
    }

    #[test]
    fn test_profiled_series_follows_points() {
        let series = profile_series(&profiled_report());
        assert_eq!(series.len(), 3);
        assert_eq!(series[2], (4.0, 1060.0));
    }

    #[test]
    fn test_missing_profile_points_rejected() {
        let mut report = profiled_report();
        report.result.profile_data = Some(Vec::new());
        let err = render_profile_svg(&report, "unused.svg").unwrap_err();
        assert!(matches!(err, ExportError::Chart { .. }));
    }
}
