//! Read-only reference tables: preset climbs, chainrings and cassettes
//!
//! Lookups by unknown id never fail. Gearing falls back to the compact
//! 50/34 chainset and the 11-34 cassette; an unknown climb simply selects
//! nothing.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::defaults;
use crate::error::{ClimbRsError, Result};
use crate::models::Climb;

pub mod climbs;
pub mod gearing;

pub use gearing::{CassetteOption, ChainringOption};

/// Immutable reference tables keyed by string id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData {
    #[serde(default)]
    pub climbs: Vec<Climb>,
    #[serde(default)]
    pub chainrings: Vec<ChainringOption>,
    #[serde(default)]
    pub cassettes: Vec<CassetteOption>,
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ReferenceData {
    /// Tables shipped with the crate
    pub fn builtin() -> Self {
        Self {
            climbs: climbs::preset_climbs(),
            chainrings: gearing::chainrings(),
            cassettes: gearing::cassettes(),
        }
    }

    /// Built-in tables extended with entries from a JSON file
    ///
    /// Entries whose id matches a built-in one replace it.
    pub fn with_overlay_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        let overlay: ReferenceData = serde_json::from_str(&content).map_err(|e| {
            ClimbRsError::Validation(format!(
                "Invalid reference data in {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        for climb in overlay.climbs {
            self.climbs.retain(|c| c.id != climb.id);
            self.climbs.push(climb);
        }
        for ring in overlay.chainrings {
            self.chainrings.retain(|c| c.id != ring.id);
            self.chainrings.push(ring);
        }
        for cassette in overlay.cassettes {
            self.cassettes.retain(|c| c.id != cassette.id);
            self.cassettes.push(cassette);
        }

        tracing::debug!(
            climbs = self.climbs.len(),
            chainrings = self.chainrings.len(),
            cassettes = self.cassettes.len(),
            "Reference data overlay applied"
        );

        Ok(self)
    }

    pub fn climb(&self, id: &str) -> Option<&Climb> {
        self.climbs.iter().find(|c| c.id == id)
    }

    pub fn chainring(&self, id: &str) -> Option<&ChainringOption> {
        self.chainrings.iter().find(|c| c.id == id)
    }

    pub fn cassette(&self, id: &str) -> Option<&CassetteOption> {
        self.cassettes.iter().find(|c| c.id == id)
    }

    /// Chainring teeth for an id, or the compact default
    pub fn chainring_teeth(&self, id: &str) -> &[u32] {
        self.chainring(id)
            .map(|c| c.teeth.as_slice())
            .unwrap_or(defaults::CHAINRING_TEETH)
    }

    /// Cassette cogs for an id, or the 11-34 default
    pub fn cassette_cogs(&self, id: &str) -> &[u32] {
        self.cassette(id)
            .map(|c| c.cogs.as_slice())
            .unwrap_or(defaults::CASSETTE_COGS)
    }
}
