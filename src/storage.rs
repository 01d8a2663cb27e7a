//! Persisted calculator state
//!
//! State is stored as a JSON snapshot under a single key of a string
//! key-value store. Loading never fails: missing or unreadable snapshots
//! yield defaults. Saving is best-effort and only logs failures.
//!
//! Snapshot versions:
//! - v1: `unit` is `"kg"` or `"lb"` and weights are stored in that unit
//! - v2: `unitSystem` is `"metric"` or `"imperial"` and weights are kilograms

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::calculator::CalculatorState;
use crate::error::StorageError;
use crate::units::lb_to_kg;

/// Key the calculator snapshot is stored under
pub const STORAGE_KEY: &str = "cycling-calculator-state";

/// Version written by this build
pub const SNAPSHOT_VERSION: u32 = 2;

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Minimal string key-value store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
}

/// Volatile store, mostly for tests and one-shot runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store keeping one `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    /// Delete the value for `key`; absent keys are fine
    pub fn remove(&mut self, key: &str) -> StorageResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(unavailable(&self.path_for(key), e)),
        }
    }
}

fn unavailable(path: &Path, error: std::io::Error) -> StorageError {
    StorageError::Unavailable {
        reason: format!("{}: {}", path.display(), error),
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(unavailable(&path, e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        fs::create_dir_all(&self.root).map_err(|e| unavailable(&self.root, e))?;
        let path = self.path_for(key);
        fs::write(&path, value).map_err(|e| unavailable(&path, e))
    }
}

#[derive(Serialize)]
struct Snapshot<'a> {
    version: u32,
    #[serde(flatten)]
    state: &'a CalculatorState,
}

fn snapshot_version(snapshot: &Map<String, Value>) -> StorageResult<u32> {
    match snapshot.get("version") {
        Some(value) => value
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| StorageError::Malformed {
                reason: format!("invalid version {}", value),
            }),
        // Unversioned snapshots predate the field; v1 is recognised by its unit key
        None if snapshot.contains_key("unit") && !snapshot.contains_key("unitSystem") => Ok(1),
        None => Ok(SNAPSHOT_VERSION),
    }
}

fn convert_weight_lb(snapshot: &mut Map<String, Value>, key: &str) {
    if let Some(lb) = snapshot.get(key).and_then(Value::as_f64) {
        snapshot.insert(key.to_string(), Value::from(lb_to_kg(lb)));
    }
}

/// v1 → v2: weight unit becomes a display-only unit system, weights become kg
fn migrate_v1(snapshot: &mut Map<String, Value>) {
    let unit = snapshot
        .remove("unit")
        .and_then(|u| u.as_str().map(str::to_owned));
    let imperial = unit.as_deref() == Some("lb");

    if imperial {
        convert_weight_lb(snapshot, "riderWeight");
        convert_weight_lb(snapshot, "bikeWeight");
    }
    snapshot.insert(
        "unitSystem".to_string(),
        Value::from(if imperial { "imperial" } else { "metric" }),
    );
}

/// Bring a raw snapshot up to the current version
pub fn migrate(mut snapshot: Map<String, Value>) -> StorageResult<Map<String, Value>> {
    let mut version = snapshot_version(&snapshot)?;
    if version > SNAPSHOT_VERSION {
        return Err(StorageError::UnsupportedVersion { version });
    }

    while version < SNAPSHOT_VERSION {
        match version {
            0 | 1 => migrate_v1(&mut snapshot),
            _ => {}
        }
        version += 1;
        debug!(version, "Migrated calculator snapshot");
    }

    snapshot.insert("version".to_string(), Value::from(SNAPSHOT_VERSION));
    Ok(snapshot)
}

/// Decode a snapshot, migrating it and filling missing fields from `base`
pub fn decode_state(raw: &str, base: &CalculatorState) -> StorageResult<CalculatorState> {
    let snapshot = match serde_json::from_str::<Value>(raw)? {
        Value::Object(map) => map,
        other => {
            return Err(StorageError::Malformed {
                reason: format!("expected an object, found {}", json_kind(&other)),
            })
        }
    };

    let mut merged = match serde_json::to_value(base)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    for (key, value) in migrate(snapshot)? {
        merged.insert(key, value);
    }
    merged.remove("version");

    Ok(serde_json::from_value(Value::Object(merged))?)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub fn encode_state(state: &CalculatorState) -> StorageResult<String> {
    Ok(serde_json::to_string(&Snapshot {
        version: SNAPSHOT_VERSION,
        state,
    })?)
}

/// Saved state if present and readable
pub fn try_load_state(
    store: &dyn KeyValueStore,
    base: &CalculatorState,
) -> StorageResult<Option<CalculatorState>> {
    match store.get(STORAGE_KEY)? {
        Some(raw) => decode_state(&raw, base).map(Some),
        None => Ok(None),
    }
}

/// Saved state merged over `base`, or `base` itself when there is nothing
/// usable to load
pub fn load_state_or(store: &dyn KeyValueStore, base: CalculatorState) -> CalculatorState {
    match try_load_state(store, &base) {
        Ok(Some(state)) => {
            debug!(key = STORAGE_KEY, "Loaded calculator state");
            state
        }
        Ok(None) => base,
        Err(e) => {
            warn!(error = %e, "Discarding unreadable calculator state");
            base
        }
    }
}

/// Saved state merged over the built-in defaults
pub fn load_state(store: &dyn KeyValueStore) -> CalculatorState {
    load_state_or(store, CalculatorState::default())
}

/// Persist the state; failures are logged, never returned
pub fn save_state(store: &mut dyn KeyValueStore, state: &CalculatorState) {
    let result = encode_state(state).and_then(|raw| store.set(STORAGE_KEY, &raw));
    match result {
        Ok(()) => debug!(key = STORAGE_KEY, "Saved calculator state"),
        Err(e) => warn!(error = %e, "Could not save calculator state"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::{reduce, Action};
    use crate::custom_climb::ClimbField;
    use crate::units::UnitSystem;
    use tempfile::tempdir;

    /// Store whose writes always fail
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Unavailable {
                reason: "quota exceeded".to_string(),
            })
        }
    }

    fn store_with(raw: &str) -> MemoryStore {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, raw).unwrap();
        store
    }

    #[test]
    fn test_empty_store_loads_defaults() {
        assert_eq!(load_state(&MemoryStore::new()), CalculatorState::default());
    }

    #[test]
    fn test_round_trip_through_memory() {
        let state = CalculatorState::default().apply_all([
            Action::SetPower { watts: 275.0 },
            Action::SetUnitSystem {
                unit_system: UnitSystem::Imperial,
            },
            Action::SetClimb {
                climb_id: "custom".to_string(),
            },
            Action::SetCustomClimbField {
                field: ClimbField::Distance,
                value: Some(12.0),
            },
        ]);

        let mut store = MemoryStore::new();
        save_state(&mut store, &state);
        assert_eq!(load_state(&store), state);

        let raw = store.get(STORAGE_KEY).unwrap().unwrap();
        assert!(raw.contains("\"version\":2"));
        assert!(raw.contains("\"unitSystem\":\"imperial\""));
    }

    #[test]
    fn test_v1_pound_snapshot_migrates() {
        let store = store_with(
            r#"{"unit":"lb","riderWeight":154.0,"bikeWeight":17.6,"power":250,
                "selectedClimbId":"ventoux","showTooFastGears":true}"#,
        );
        let state = load_state(&store);

        assert_eq!(state.unit_system, UnitSystem::Imperial);
        assert!((state.rider_weight_kg - 154.0 * 0.453592).abs() < 1e-9);
        assert!((state.bike_weight_kg - 17.6 * 0.453592).abs() < 1e-9);
        assert_eq!(state.power_watts, 250.0);
        assert_eq!(state.selected_climb_id, "ventoux");
        // Fields the old snapshot never had come from the defaults
        assert_eq!(state.temperature_c, 15.0);
        assert_eq!(state.selected_cassette_id, "11-34");
    }

    #[test]
    fn test_v1_kilogram_snapshot_migrates() {
        let store = store_with(r#"{"unit":"kg","riderWeight":64.0}"#);
        let state = load_state(&store);
        assert_eq!(state.unit_system, UnitSystem::Metric);
        assert_eq!(state.rider_weight_kg, 64.0);
    }

    #[test]
    fn test_unversioned_v2_snapshot_is_accepted() {
        let store = store_with(r#"{"unitSystem":"imperial","riderWeight":80.0}"#);
        let state = load_state(&store);
        assert_eq!(state.unit_system, UnitSystem::Imperial);
        assert_eq!(state.rider_weight_kg, 80.0);
    }

    #[test]
    fn test_corrupt_snapshots_load_defaults() {
        for raw in ["{not json", "[1,2,3]", "\"text\"", r#"{"power":"lots"}"#] {
            assert_eq!(load_state(&store_with(raw)), CalculatorState::default(), "{}", raw);
        }
    }

    #[test]
    fn test_future_version_is_rejected() {
        let store = store_with(r#"{"version":9,"power":300}"#);
        assert!(matches!(
            try_load_state(&store, &CalculatorState::default()),
            Err(StorageError::UnsupportedVersion { version: 9 })
        ));
        assert_eq!(load_state(&store), CalculatorState::default());
    }

    #[test]
    fn test_missing_fields_merge_from_given_base() {
        let base = reduce(CalculatorState::default(), Action::SetPower { watts: 320.0 });
        let store = store_with(r#"{"version":2,"altitude":900}"#);
        let state = load_state_or(&store, base);
        assert_eq!(state.power_watts, 320.0);
        assert_eq!(state.altitude_m, 900.0);
    }

    #[test]
    fn test_save_failure_is_swallowed() {
        let mut store = ReadOnlyStore;
        save_state(&mut store, &CalculatorState::default());
        assert_eq!(load_state(&store), CalculatorState::default());
    }

    #[test]
    fn test_file_store() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("state"));

        assert_eq!(store.get(STORAGE_KEY).unwrap(), None);

        let state = reduce(
            CalculatorState::default(),
            Action::SetTemperature {
                temperature_c: 28.0,
            },
        );
        save_state(&mut store, &state);
        assert!(store.path_for(STORAGE_KEY).exists());
        assert_eq!(load_state(&store), state);

        store.remove(STORAGE_KEY).unwrap();
        store.remove(STORAGE_KEY).unwrap();
        assert_eq!(load_state(&store), CalculatorState::default());
    }

    #[test]
    fn test_unwritable_file_store_does_not_panic() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file, not a directory").unwrap();

        let mut store = FileStore::new(blocker.join("state"));
        save_state(&mut store, &CalculatorState::default());
        assert!(store.get(STORAGE_KEY).is_err());
    }
}
