//! Power-to-weight and VAM classification
//!
//! Both lookups walk a table sorted by descending threshold and return the
//! first label whose threshold the value meets.

use crate::constants::{FALLBACK_POWER_CATEGORY, POWER_CATEGORIES, VAM_CATEGORIES};

/// Watts per kilogram of rider mass; 0 when the mass is not positive
pub fn power_to_weight(power_watts: f64, rider_mass_kg: f64) -> f64 {
    if rider_mass_kg <= 0.0 {
        return 0.0;
    }
    power_watts / rider_mass_kg
}

/// Label of the first table entry whose threshold `value` meets or exceeds
fn lookup(table: &'static [(f64, &'static str)], value: f64) -> Option<&'static str> {
    table
        .iter()
        .find(|(threshold, _)| value >= *threshold)
        .map(|(_, label)| *label)
}

/// Rider category for a power-to-weight ratio
pub fn power_category(wkg: f64) -> &'static str {
    lookup(POWER_CATEGORIES, wkg).unwrap_or(FALLBACK_POWER_CATEGORY)
}

/// Vertical ascent rate (m/h); 0 when the time is not positive
pub fn calculate_vam(elevation_m: f64, time_seconds: f64) -> f64 {
    if time_seconds <= 0.0 {
        return 0.0;
    }
    elevation_m / time_seconds * 3600.0
}

/// Performance bracket for a VAM value
pub fn vam_category(vam: f64) -> &'static str {
    lookup(VAM_CATEGORIES, vam).unwrap_or_else(|| {
        VAM_CATEGORIES
            .last()
            .map(|(_, label)| *label)
            .unwrap_or(FALLBACK_POWER_CATEGORY)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_to_weight() {
        assert!((power_to_weight(280.0, 70.0) - 4.0).abs() < 1e-12);
        assert_eq!(power_to_weight(280.0, 0.0), 0.0);
        assert_eq!(power_to_weight(280.0, -5.0), 0.0);
    }

    #[test]
    fn test_power_category_thresholds() {
        assert_eq!(power_category(6.2), "World-class professional");
        assert_eq!(power_category(5.0), "Professional / Elite");
        assert_eq!(power_category(4.99), "Very strong amateur / Cat 1-2");
        assert_eq!(power_category(3.5), "Strong amateur / Cat 3");
        assert_eq!(power_category(3.2), "Good fitness / Cat 4-5");
        assert_eq!(power_category(2.5), "Recreational rider");
        assert_eq!(power_category(1.0), "Beginner");
        // Below every threshold falls back
        assert_eq!(power_category(-1.0), "Beginner");
        assert_eq!(power_category(f64::NAN), "Beginner");
    }

    #[test]
    fn test_vam() {
        assert_eq!(calculate_vam(1000.0, 3600.0), 1000.0);
        assert_eq!(calculate_vam(1000.0, 0.0), 0.0);
    }

    #[test]
    fn test_vam_categories() {
        assert_eq!(vam_category(1800.0), "Grand Tour contender");
        assert_eq!(vam_category(1500.0), "World-class");
        assert_eq!(vam_category(1350.0), "Elite");
        assert_eq!(vam_category(900.0), "Competitive");
        assert_eq!(vam_category(750.0), "Recreational");
        assert_eq!(vam_category(120.0), "Beginner");
        assert_eq!(vam_category(-10.0), "Beginner");
    }

    #[test]
    fn test_tables_descend() {
        for table in [POWER_CATEGORIES, VAM_CATEGORIES] {
            assert!(table.windows(2).all(|w| w[0].0 > w[1].0));
            assert_eq!(table.last().map(|e| e.0), Some(0.0));
        }
    }
}
