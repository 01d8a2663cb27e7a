use crate::models::{Climb, ClimbCategory};

/// Built-in preset climbs
pub fn preset_climbs() -> Vec<Climb> {
    vec![
        Climb::new(
            "alpe-dhuez",
            "Alpe d'Huez",
            "Isère, French Alps",
            13.8,
            1122.0,
            8.1,
            ClimbCategory::HorsCategorie,
        ),
        Climb::new(
            "galibier",
            "Col du Galibier",
            "Savoie, French Alps",
            18.1,
            1245.0,
            6.9,
            ClimbCategory::HorsCategorie,
        ),
        Climb::new(
            "haleakala",
            "Haleakala",
            "Maui, Hawaii, USA",
            57.0,
            3080.0,
            5.4,
            ClimbCategory::HorsCategorie,
        ),
        Climb::new(
            "ventoux",
            "Mont Ventoux",
            "Provence, France (via Bédoin)",
            21.5,
            1609.0,
            7.6,
            ClimbCategory::HorsCategorie,
        ),
        Climb::new(
            "tourmalet",
            "Col du Tourmalet",
            "Hautes-Pyrénées, France",
            17.1,
            1124.0,
            7.4,
            ClimbCategory::HorsCategorie,
        ),
    ]
}
