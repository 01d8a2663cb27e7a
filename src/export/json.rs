use super::{ClimbReport, ExportError};
use std::io::Write;
use std::path::Path;

/// Export climb report to JSON format
pub fn export_report<P: AsRef<Path>>(report: &ClimbReport, output_path: P) -> Result<(), ExportError> {
    export_json(report, output_path)
}

/// Export any serializable data structure to JSON
pub fn export_json<T, P>(data: &T, output_path: P) -> Result<(), ExportError>
where
    T: serde::Serialize,
    P: AsRef<Path>,
{
    let json_data = serde_json::to_string_pretty(data)
        .map_err(|e| ExportError::SerializationError(e.to_string()))?;

    let mut file = std::fs::File::create(output_path)?;
    file.write_all(json_data.as_bytes())?;
    file.write_all(b"\n")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::{alpe_report, profiled_report};
    use tempfile::NamedTempFile;

    #[test]
    fn test_export_report() {
        let report = alpe_report();
        let temp_file = NamedTempFile::new().unwrap();

        export_report(&report, temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["climb"]["id"], "alpe-dhuez");
        assert_eq!(value["climb"]["category"], "HC");
        assert_eq!(value["unit_system"], "metric");
        assert_eq!(value["gears"].as_array().unwrap().len(), 12);
        assert!(value["result"]["profile_data"].is_null());
        assert!(value["result"]["time_seconds"].as_f64().unwrap() > 3600.0);
    }

    #[test]
    fn test_profiled_report_includes_points() {
        let temp_file = NamedTempFile::new().unwrap();
        export_report(&profiled_report(), temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["result"]["profile_data"].as_array().unwrap().len(), 3);
        assert_eq!(value["climb"]["terrain"]["kind"], "profiled");
    }
}
