//! Elevation profiles from GPX tracks
//!
//! Track points are chained into a cumulative haversine distance, then
//! resampled at a fixed spacing so that every climb is integrated at the same
//! resolution regardless of the recording device.

use gpx::{read, Gpx};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::error::ImportError;
use crate::import::ProfileImporter;
use crate::models::{Climb, ClimbCategory, ElevationPoint, ElevationProfile};

/// Default spacing between resampled profile points (km)
pub const DEFAULT_SPACING_KM: f64 = 0.5;

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two coordinates (m)
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_M * c
}

/// Distance along the track (km) and elevation (m) of one recorded point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackSample {
    pub distance_km: f64,
    pub elevation_m: f64,
}

/// GPX importer producing profiled climbs
#[derive(Debug, Clone)]
pub struct GpxProfileImporter {
    spacing_km: f64,
}

impl Default for GpxProfileImporter {
    fn default() -> Self {
        Self {
            spacing_km: DEFAULT_SPACING_KM,
        }
    }
}

impl GpxProfileImporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resample at a different spacing; non-positive values keep the default
    pub fn with_spacing(mut self, spacing_km: f64) -> Self {
        if spacing_km.is_finite() && spacing_km > 0.0 {
            self.spacing_km = spacing_km;
        }
        self
    }

    pub fn spacing_km(&self) -> f64 {
        self.spacing_km
    }

    /// Parse GPX from any reader into a climb
    pub fn import_reader<R: Read>(&self, reader: R, fallback_name: &str) -> Result<Climb, ImportError> {
        let gpx: Gpx = read(reader)?;
        let samples = extract_samples(&gpx)?;
        let profile = resample(&samples, self.spacing_km)?;

        let name = gpx
            .tracks
            .iter()
            .find_map(|t| t.name.clone())
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| fallback_name.to_string());

        Ok(climb_from_profile(&name, profile))
    }
}

impl ProfileImporter for GpxProfileImporter {
    fn can_import(&self, file_path: &Path) -> bool {
        file_path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("gpx"))
            .unwrap_or(false)
    }

    fn import_file(&self, file_path: &Path) -> Result<Climb, ImportError> {
        let file = std::fs::File::open(file_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ImportError::FileNotFound {
                    path: file_path.to_path_buf(),
                }
            } else {
                ImportError::Io(e)
            }
        })?;

        let stem = file_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Imported climb");

        let climb = self.import_reader(std::io::BufReader::new(file), stem)?;
        info!(
            path = %file_path.display(),
            points = climb.terrain.profile().map(|p| p.len()).unwrap_or(0),
            distance_km = climb.distance_km,
            "Imported GPX climb"
        );
        Ok(climb)
    }

    fn format_name(&self) -> &'static str {
        "GPX"
    }
}

/// Flatten every track and segment into cumulative distance samples
///
/// Points without elevation still advance the distance. Points that do not
/// move the rider forward are dropped so distances strictly increase.
pub fn extract_samples(gpx: &Gpx) -> Result<Vec<TrackSample>, ImportError> {
    if gpx.tracks.is_empty() {
        return Err(ImportError::NoTracks);
    }

    let mut samples: Vec<TrackSample> = Vec::new();
    let mut previous: Option<(f64, f64)> = None;
    let mut distance_m = 0.0;
    let mut seen_points = 0usize;

    for track in &gpx.tracks {
        for segment in &track.segments {
            for waypoint in &segment.points {
                seen_points += 1;
                let point = waypoint.point();
                let (lat, lon) = (point.y(), point.x());

                if let Some((prev_lat, prev_lon)) = previous {
                    distance_m += haversine_distance(prev_lat, prev_lon, lat, lon);
                }
                previous = Some((lat, lon));

                let Some(elevation_m) = waypoint.elevation else {
                    continue;
                };
                let distance_km = distance_m / 1000.0;
                let advances = samples
                    .last()
                    .map_or(true, |last| distance_km > last.distance_km);
                if advances {
                    samples.push(TrackSample {
                        distance_km,
                        elevation_m,
                    });
                }
            }
        }
    }

    if seen_points == 0 {
        return Err(ImportError::TooShort {
            reason: "track has no points".to_string(),
        });
    }
    if samples.is_empty() {
        return Err(ImportError::MissingElevation);
    }

    // Distance is measured from the first point that carries elevation
    let origin = samples[0].distance_km;
    for sample in &mut samples {
        sample.distance_km -= origin;
    }

    debug!(
        points = seen_points,
        samples = samples.len(),
        "Extracted GPX samples"
    );
    Ok(samples)
}

fn interpolate(samples: &[TrackSample], distance_km: f64) -> f64 {
    let index = samples.partition_point(|s| s.distance_km < distance_km);
    if index == 0 {
        return samples[0].elevation_m;
    }
    if index >= samples.len() {
        return samples[samples.len() - 1].elevation_m;
    }
    let (a, b) = (samples[index - 1], samples[index]);
    let t = (distance_km - a.distance_km) / (b.distance_km - a.distance_km);
    a.elevation_m + t * (b.elevation_m - a.elevation_m)
}

fn gradient_between(a: (f64, f64), b: (f64, f64)) -> f64 {
    (b.1 - a.1) / ((b.0 - a.0) * 1000.0) * 100.0
}

/// Resample track samples at `spacing_km` and attach per-point gradients
///
/// The last station always lands on the end of the track. Each point carries
/// the gradient of the stretch that follows it; the final point repeats the
/// gradient of the stretch before it.
pub fn resample(samples: &[TrackSample], spacing_km: f64) -> Result<ElevationProfile, ImportError> {
    let total_km = samples.last().map(|s| s.distance_km).unwrap_or(0.0);
    if samples.len() < 2 || total_km <= 0.0 {
        return Err(ImportError::TooShort {
            reason: format!("{} usable points covering {:.3} km", samples.len(), total_km),
        });
    }

    let mut stations = vec![0.0];
    let mut step = 1usize;
    loop {
        let distance = step as f64 * spacing_km;
        // Avoid a sliver segment just before the finish
        if distance >= total_km - spacing_km * 1e-3 {
            break;
        }
        stations.push(distance);
        step += 1;
    }
    stations.push(total_km);

    let coords: Vec<(f64, f64)> = stations
        .iter()
        .map(|&d| (d, interpolate(samples, d)))
        .collect();

    let last = coords.len() - 1;
    let points = coords
        .iter()
        .enumerate()
        .map(|(i, &(distance_km, elevation_m))| {
            let gradient = if i < last {
                gradient_between(coords[i], coords[i + 1])
            } else {
                gradient_between(coords[i - 1], coords[i])
            };
            ElevationPoint::new(distance_km, elevation_m, gradient)
        })
        .collect();

    Ok(ElevationProfile::new(points)?)
}

fn slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        "imported".to_string()
    } else {
        slug
    }
}

/// Headline numbers come from the profile: full length, net gain and the
/// average gradient between them
pub fn climb_from_profile(name: &str, profile: ElevationProfile) -> Climb {
    let distance_km = profile.total_distance_km();
    let elevation_m = profile.net_elevation_m();
    let gradient_pct = elevation_m / (distance_km * 1000.0) * 100.0;
    let location = format!("GPX track ({} points)", profile.len());

    Climb::new(
        slug(name),
        name,
        location,
        distance_km,
        elevation_m,
        gradient_pct,
        ClimbCategory::Custom,
    )
    .with_profile(profile)
}
