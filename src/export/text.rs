use super::{ClimbReport, ExportError};
use crate::display::{
    format_distance, format_elevation, format_number, format_percent, format_speed, format_time,
    format_vam, format_weight,
};
use std::io::Write;
use std::path::Path;

/// Write a human-readable climb report
pub fn write_report<W: Write>(report: &ClimbReport, mut out: W) -> Result<(), ExportError> {
    let units = report.unit_system;
    let climb = &report.climb;
    let result = &report.result;

    writeln!(out, "==============================")?;
    writeln!(out, "CLIMB REPORT: {}", climb.name)?;
    writeln!(out, "==============================")?;
    writeln!(out, "Location: {}", climb.location)?;
    writeln!(out, "Category: {}", climb.category)?;
    writeln!(
        out,
        "Generated: {}",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(out)?;

    writeln!(out, "CLIMB")?;
    writeln!(out, "------------------------------")?;
    writeln!(out, "Distance: {}", format_distance(climb.distance_km, units))?;
    writeln!(out, "Elevation gain: {}", format_elevation(climb.elevation_m, units))?;
    writeln!(out, "Average gradient: {}", format_percent(climb.gradient_pct, 1))?;
    writeln!(out)?;

    writeln!(out, "RIDER")?;
    writeln!(out, "------------------------------")?;
    writeln!(out, "Rider weight: {}", format_weight(report.inputs.rider_weight_kg, units))?;
    writeln!(out, "Bike weight: {}", format_weight(report.inputs.bike_weight_kg, units))?;
    writeln!(out, "Power: {:.0} W", report.inputs.power_watts)?;
    writeln!(
        out,
        "Power to weight: {} W/kg ({})",
        format_number(report.power_to_weight, 2),
        report.power_category
    )?;
    writeln!(out)?;

    let env = &report.environment;
    writeln!(out, "CONDITIONS")?;
    writeln!(out, "------------------------------")?;
    writeln!(
        out,
        "Start altitude: {}",
        format_elevation(env.altitude_m, units)
    )?;
    writeln!(out, "Temperature: {:.0} °C", env.temperature_c)?;
    writeln!(out, "Air density: {:.3} kg/m³", env.air_density)?;
    writeln!(out, "Oxygen available: {}", format_percent(env.oxygen_percent, 1))?;
    writeln!(
        out,
        "Average power available on climb: {}",
        format_percent(result.avg_power_percent, 1)
    )?;
    writeln!(out)?;

    writeln!(out, "RESULT")?;
    writeln!(out, "------------------------------")?;
    writeln!(out, "Time: {}", format_time(result.time_seconds))?;
    writeln!(out, "Average speed: {}", format_speed(result.avg_speed_kmh, units))?;
    writeln!(out, "VAM: {} ({})", format_vam(result.vam, units), report.vam_category)?;

    if let Some(points) = &result.profile_data {
        writeln!(out)?;
        writeln!(out, "PROFILE")?;
        writeln!(out, "------------------------------")?;
        for point in points {
            writeln!(
                out,
                "{:>9}  {:>9}  {:>6}  {:>6} power  {:>5.0} W  {}",
                format_distance(point.distance_km, units),
                format_elevation(point.elevation_m, units),
                format_percent(point.gradient_pct, 1),
                format_percent(point.power_percent, 1),
                point.effective_power_w,
                format_speed(point.speed_kmh, units)
            )?;
        }
    }

    if !report.gears.is_empty() {
        writeln!(out)?;
        writeln!(
            out,
            "GEARS (at {})",
            format_speed(result.avg_speed_kmh, units)
        )?;
        writeln!(out, "------------------------------")?;
        for gear in &report.gears {
            writeln!(
                out,
                "{:>2}x{:<2}  ratio {:.2}  {:>5.1}\"  {:>4.0} rpm  {}",
                gear.chainring,
                gear.cog,
                gear.ratio,
                gear.gear_inches,
                gear.required_rpm,
                gear.status.label()
            )?;
        }
    }

    Ok(())
}

/// Export climb report to human-readable text format
pub fn export_report<P: AsRef<Path>>(report: &ClimbReport, output_path: P) -> Result<(), ExportError> {
    let file = std::fs::File::create(output_path)?;
    write_report(report, std::io::BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::{alpe_report, profiled_report};
    use crate::units::UnitSystem;

    fn render(report: &ClimbReport) -> String {
        let mut buffer = Vec::new();
        write_report(report, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_metric_report() {
        let text = render(&alpe_report());
        assert!(text.contains("CLIMB REPORT: Alpe d'Huez"));
        assert!(text.contains("Distance: 13.8 km"));
        assert!(text.contains("Elevation gain: 1,122 m"));
        assert!(text.contains("Power: 200 W"));
        assert!(text.contains("34x34"));
        assert!(!text.contains("PROFILE"));
    }

    #[test]
    fn test_imperial_report() {
        let mut report = alpe_report();
        report.unit_system = UnitSystem::Imperial;
        let text = render(&report);
        assert!(text.contains("Distance: 8.6 mi"));
        assert!(text.contains("3,681 ft"));
        assert!(text.contains("mph"));
    }

    #[test]
    fn test_profile_section() {
        let text = render(&profiled_report());
        assert!(text.contains("PROFILE"));
    }

    #[test]
    fn test_export_to_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        export_report(&alpe_report(), temp.path()).unwrap();
        let content = std::fs::read_to_string(temp.path()).unwrap();
        assert!(content.starts_with("=============================="));
    }
}
