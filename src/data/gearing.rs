use serde::{Deserialize, Serialize};

/// Front chainring set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainringOption {
    pub id: String,
    pub label: String,
    pub teeth: Vec<u32>,
}

/// Rear cassette
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CassetteOption {
    pub id: String,
    pub label: String,
    pub cogs: Vec<u32>,
}

fn chainring(id: &str, label: &str, teeth: &[u32]) -> ChainringOption {
    ChainringOption {
        id: id.to_string(),
        label: label.to_string(),
        teeth: teeth.to_vec(),
    }
}

fn cassette(id: &str, label: &str, cogs: &[u32]) -> CassetteOption {
    CassetteOption {
        id: id.to_string(),
        label: label.to_string(),
        cogs: cogs.to_vec(),
    }
}

/// Popular road and gravel chainrings
pub fn chainrings() -> Vec<ChainringOption> {
    vec![
        chainring("53-39", "53/39 (Standard)", &[53, 39]),
        chainring("52-36", "52/36 (Semi-Compact)", &[52, 36]),
        chainring("50-34", "50/34 (Compact)", &[50, 34]),
        chainring("48-35", "48/35", &[48, 35]),
        chainring("48-32", "48/32 (Sub-Compact)", &[48, 32]),
        chainring("46-33", "46/33", &[46, 33]),
        chainring("46-30", "46/30 (Gravel)", &[46, 30]),
        chainring("42-32", "42/32 (Gravel)", &[42, 32]),
        chainring("40-40", "40 (1x)", &[40]),
    ]
}

/// Popular 11- and 12-speed cassettes
pub fn cassettes() -> Vec<CassetteOption> {
    vec![
        cassette(
            "11-25",
            "11-25 (Racing)",
            &[11, 12, 13, 14, 15, 16, 17, 19, 21, 23, 25],
        ),
        cassette(
            "11-28",
            "11-28 (All-Round)",
            &[11, 12, 13, 14, 15, 17, 19, 21, 23, 25, 28],
        ),
        cassette(
            "11-30",
            "11-30 (Climbing)",
            &[11, 12, 13, 14, 15, 16, 17, 19, 21, 24, 27, 30],
        ),
        cassette(
            "11-32",
            "11-32 (Wide Range)",
            &[11, 12, 13, 14, 16, 18, 20, 22, 25, 28, 32],
        ),
        cassette(
            "11-34",
            "11-34 (Wide Climbing)",
            &[11, 12, 13, 14, 15, 17, 19, 21, 24, 27, 30, 34],
        ),
        cassette(
            "11-36",
            "11-36 (Extended)",
            &[11, 12, 13, 14, 15, 17, 19, 21, 24, 28, 32, 36],
        ),
        cassette(
            "10-33",
            "10-33 (SRAM Wide)",
            &[10, 11, 12, 13, 14, 15, 17, 19, 21, 24, 28, 33],
        ),
        cassette(
            "11-42",
            "11-42 (Gravel)",
            &[11, 13, 15, 17, 19, 21, 24, 28, 32, 37, 42],
        ),
        cassette(
            "11-51",
            "11-51 (Gravel Wide)",
            &[11, 13, 15, 17, 19, 21, 24, 28, 33, 39, 45, 51],
        ),
    ]
}
