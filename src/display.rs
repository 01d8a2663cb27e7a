//! Formatting at the presentation boundary
//!
//! Values arrive in canonical units (km, m, kg, km/h) and are converted to the
//! rider's unit system only here.

use crate::units::UnitSystem;

/// Elapsed time as `h:mm:ss`, or `m:ss` under an hour
///
/// Fractional seconds are truncated. Non-finite input renders as `--:--`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() {
        return "--:--".to_string();
    }
    let total = seconds.max(0.0).floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Fixed number of decimals
pub fn format_number(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}

/// Rounded to a whole number with thousands separators
pub fn format_with_commas(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

pub fn format_distance(km: f64, units: UnitSystem) -> String {
    format!(
        "{} {}",
        format_number(units.distance_from_km(km), 1),
        units.distance_label()
    )
}

pub fn format_elevation(m: f64, units: UnitSystem) -> String {
    format!(
        "{} {}",
        format_with_commas(units.elevation_from_m(m)),
        units.elevation_label()
    )
}

pub fn format_speed(kmh: f64, units: UnitSystem) -> String {
    format!(
        "{} {}",
        format_number(units.speed_from_kmh(kmh), 1),
        units.speed_label()
    )
}

pub fn format_weight(kg: f64, units: UnitSystem) -> String {
    format!(
        "{} {}",
        format_number(units.weight_from_kg(kg), 1),
        units.weight_label()
    )
}

/// Vertical ascent rate per hour in the display elevation unit
pub fn format_vam(vam: f64, units: UnitSystem) -> String {
    format!(
        "{} {}/h",
        format_with_commas(units.elevation_from_m(vam)),
        units.elevation_label()
    )
}

pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{}%", format_number(value, decimals))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(59.9), "0:59");
        assert_eq!(format_time(754.0), "12:34");
        assert_eq!(format_time(3600.0), "1:00:00");
        assert_eq!(format_time(4859.7), "1:20:59");
        assert_eq!(format_time(-5.0), "0:00");
        assert_eq!(format_time(f64::INFINITY), "--:--");
    }

    #[test]
    fn test_format_numbers() {
        assert_eq!(format_number(8.13043, 1), "8.1");
        assert_eq!(format_number(3.0, 2), "3.00");
        assert_eq!(format_with_commas(0.4), "0");
        assert_eq!(format_with_commas(999.0), "999");
        assert_eq!(format_with_commas(1122.0), "1,122");
        assert_eq!(format_with_commas(1234567.6), "1,234,568");
        assert_eq!(format_with_commas(-4500.0), "-4,500");
    }

    #[test]
    fn test_unit_aware_formatting() {
        assert_eq!(format_distance(13.8, UnitSystem::Metric), "13.8 km");
        assert_eq!(format_distance(13.8, UnitSystem::Imperial), "8.6 mi");
        assert_eq!(format_elevation(1122.0, UnitSystem::Metric), "1,122 m");
        assert_eq!(format_elevation(1122.0, UnitSystem::Imperial), "3,681 ft");
        assert_eq!(format_speed(16.09344, UnitSystem::Imperial), "10.0 mph");
        assert_eq!(format_weight(70.0, UnitSystem::Imperial), "154.3 lb");
        assert_eq!(format_vam(900.0, UnitSystem::Metric), "900 m/h");
        assert_eq!(format_percent(87.564, 1), "87.6%");
    }
}
