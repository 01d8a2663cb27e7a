use super::{ClimbReport, ExportError};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// One row per profile point; climbs without a profile get a single row
/// for the whole climb
#[derive(Debug, Serialize)]
struct ProfileRow {
    distance_km: f64,
    elevation_m: f64,
    gradient_pct: f64,
    oxygen_percent: f64,
    power_percent: f64,
    available_power_w: f64,
    effective_power_w: f64,
    speed_kmh: f64,
}

fn rows(report: &ClimbReport) -> Vec<ProfileRow> {
    match &report.result.profile_data {
        Some(points) => points
            .iter()
            .map(|p| ProfileRow {
                distance_km: p.distance_km,
                elevation_m: p.elevation_m,
                gradient_pct: p.gradient_pct,
                oxygen_percent: p.oxygen_percent,
                power_percent: p.power_percent,
                available_power_w: p.available_power_w,
                effective_power_w: p.effective_power_w,
                speed_kmh: p.speed_kmh,
            })
            .collect(),
        None => {
            let available = report.inputs.power_watts * report.result.avg_power_percent / 100.0;
            vec![ProfileRow {
                distance_km: report.climb.distance_km,
                elevation_m: report.climb.elevation_m,
                gradient_pct: report.climb.gradient_pct,
                oxygen_percent: report.environment.oxygen_percent,
                power_percent: report.result.avg_power_percent,
                available_power_w: available,
                effective_power_w: available * crate::constants::DRIVETRAIN_EFFICIENCY,
                speed_kmh: report.result.avg_speed_kmh,
            }]
        }
    }
}

/// Write profile rows as CSV to any writer
pub fn write_report<W: Write>(report: &ClimbReport, writer: W) -> Result<(), ExportError> {
    let mut csv_writer = ::csv::Writer::from_writer(writer);
    for row in rows(report) {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Export climb profile to CSV format (suitable for spreadsheet plotting)
pub fn export_report<P: AsRef<Path>>(report: &ClimbReport, output_path: P) -> Result<(), ExportError> {
    let file = std::fs::File::create(output_path)?;
    write_report(report, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::{alpe_report, profiled_report};

    #[test]
    fn test_profile_rows() {
        let mut buffer = Vec::new();
        write_report(&profiled_report(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "distance_km,elevation_m,gradient_pct,oxygen_percent,power_percent,available_power_w,effective_power_w,speed_kmh"
        );
        assert!(lines[1].starts_with("0.0,720.0,9.0,"));
    }

    #[test]
    fn test_uniform_climb_single_row() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        export_report(&alpe_report(), temp.path()).unwrap();

        let mut reader = ::csv::Reader::from_path(temp.path()).unwrap();
        let records: Vec<::csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 1);
        assert_eq!(&records[0][0], "13.8");
        assert_eq!(&records[0][1], "1122.0");
    }
}
