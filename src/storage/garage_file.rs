use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{Fleet, MaintenanceRecord, Variant, Vehicle};

/// File name of the fleet snapshot under the garage root.
const SNAPSHOT_FILE: &str = "garage.json";

/// Why a snapshot operation failed.
///
/// Storage failures are never fatal to the in-memory fleet; callers report
/// them and carry on with the state they have.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The snapshot could not be read or written.
    #[error("failed to access the garage snapshot")]
    Io(#[from] io::Error),

    /// The fleet could not be serialized.
    #[error("failed to encode the garage snapshot")]
    Encode(#[from] serde_json::Error),
}

/// A filesystem backed store for the fleet.
///
/// Wraps a root directory and owns the snapshot codec: [`Garage::save`]
/// serializes every vehicle (with its full maintenance history) to a flat
/// attribute bag, and [`Garage::load`] rebuilds typed vehicles by
/// dispatching on the stored variant tag.
#[derive(Debug, Clone)]
pub struct Garage {
    /// The directory the snapshot (and sidecars) live in.
    root: PathBuf,
}

/// Flat attribute bag for one stored vehicle.
///
/// Variant-specific fields are optional and only written for the variants
/// that carry them, so the stored form stays a plain array of uniform
/// objects.
#[derive(Debug, Serialize, Deserialize)]
struct VehicleData {
    id: String,
    kind: String,
    model: String,
    color: String,
    is_on: bool,
    speed: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    turbo_on: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    load_capacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    current_load: Option<f64>,
    history: Vec<MaintenanceRecord>,
}

impl From<&Vehicle> for VehicleData {
    fn from(vehicle: &Vehicle) -> Self {
        let (turbo_on, load_capacity, current_load) = match *vehicle.variant() {
            Variant::Base => (None, None, None),
            Variant::Sports { turbo_on } => (Some(turbo_on), None, None),
            Variant::Truck {
                load_capacity,
                current_load,
            } => (None, Some(load_capacity), Some(current_load)),
        };
        Self {
            id: vehicle.id().to_string(),
            kind: vehicle.variant().tag().to_string(),
            model: vehicle.model().to_string(),
            color: vehicle.color().to_string(),
            is_on: vehicle.is_on(),
            speed: vehicle.speed(),
            turbo_on,
            load_capacity,
            current_load,
            history: vehicle.history().to_vec(),
        }
    }
}

impl VehicleData {
    /// Rebuilds a typed vehicle, dispatching on the stored variant tag.
    ///
    /// Returns `None` (with a warning) for an unrecognised tag or a truck
    /// bag missing its capacity; the caller skips the entry.
    fn into_vehicle(self) -> Option<Vehicle> {
        let variant = match self.kind.as_str() {
            "base" => Variant::Base,
            "sports" => Variant::Sports {
                turbo_on: self.turbo_on.unwrap_or(false),
            },
            "truck" => {
                let Some(load_capacity) = self.load_capacity else {
                    warn!(id = %self.id, "stored truck has no load capacity; skipping");
                    return None;
                };
                Variant::Truck {
                    load_capacity,
                    current_load: self.current_load.unwrap_or(0.0),
                }
            }
            other => {
                warn!(id = %self.id, kind = other, "unknown vehicle kind; skipping");
                return None;
            }
        };
        Some(Vehicle::from_parts(
            self.id,
            self.model,
            self.color,
            self.is_on,
            self.speed,
            variant,
            self.history,
        ))
    }
}

impl Garage {
    /// Creates a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory the snapshot lives in.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn snapshot_path(&self) -> PathBuf {
        self.root.join(SNAPSHOT_FILE)
    }

    /// Writes the whole fleet as one snapshot, overwriting any prior one.
    ///
    /// The selection is deliberately not written; it is session state.
    ///
    /// # Errors
    ///
    /// Returns an error when the root cannot be created or the snapshot
    /// cannot be written. The in-memory fleet remains valid either way.
    pub fn save(&self, fleet: &Fleet) -> Result<(), StorageError> {
        let data: Vec<VehicleData> = fleet.vehicles().iter().map(VehicleData::from).collect();
        let blob = serde_json::to_string_pretty(&data)?;
        fs::create_dir_all(&self.root)?;
        fs::write(self.snapshot_path(), blob)?;
        debug!(vehicles = fleet.len(), "garage snapshot saved");
        Ok(())
    }

    /// Reads the snapshot back into a fleet.
    ///
    /// An absent snapshot yields an empty fleet. A snapshot that does not
    /// parse as the expected structure is reported, discarded, and also
    /// yields an empty fleet. Entries with unrecognised variant tags are
    /// skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error only for I/O failures (unreadable file, failed
    /// discard of a corrupt one).
    pub fn load(&self) -> Result<Fleet, StorageError> {
        let path = self.snapshot_path();
        if !path.exists() {
            debug!("no garage snapshot found; starting empty");
            return Ok(Fleet::new());
        }
        let raw = fs::read_to_string(&path)?;
        let data: Vec<VehicleData> = match serde_json::from_str(&raw) {
            Ok(data) => data,
            Err(error) => {
                warn!(%error, "garage snapshot is corrupt; discarding it");
                fs::remove_file(&path)?;
                return Ok(Fleet::new());
            }
        };

        let mut fleet = Fleet::new();
        for entry in data {
            let Some(vehicle) = entry.into_vehicle() else {
                continue;
            };
            if let Err(error) = fleet.add(vehicle) {
                warn!(%error, "skipping stored vehicle");
            }
        }
        debug!(vehicles = fleet.len(), "garage snapshot loaded");
        Ok(fleet)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tempfile::TempDir;

    use super::Garage;
    use crate::domain::{Fleet, MaintenanceRecord, Status, Variant, Vehicle};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    fn sample_fleet() -> Fleet {
        let mut fleet = Fleet::new();

        let mut car = Vehicle::new_base("Fusca", "Azul");
        car.add_maintenance(
            MaintenanceRecord::new("2024-05-01", "Oil change", Some(150.0), "5W30", Status::Done),
            today(),
        )
        .unwrap();
        car.add_maintenance(
            MaintenanceRecord::new("2024-06-01", "Inspection", None, "", Status::Scheduled),
            today(),
        )
        .unwrap();
        fleet.add(car).unwrap();

        let mut sports = Vehicle::new_sports("Ferrari", "Vermelha");
        sports.turn_on().unwrap();
        sports.engage_turbo().unwrap();
        sports.accelerate(100.0).unwrap();
        sports.add_maintenance(
            MaintenanceRecord::new("2024-04-15", "Brakes", Some(800.0), "", Status::Done),
            today(),
        )
        .unwrap();
        fleet.add(sports).unwrap();

        let mut truck = Vehicle::new_truck("Scania", "Branco", 1000.0).unwrap();
        truck.load(350.0).unwrap();
        truck
            .add_maintenance(
                MaintenanceRecord::new("2024-05-20", "Axle check", None, "", Status::Scheduled),
                today(),
            )
            .unwrap();
        fleet.add(truck).unwrap();

        fleet
    }

    #[test]
    fn round_trip_preserves_everything() {
        let tmp = TempDir::new().unwrap();
        let garage = Garage::new(tmp.path());

        let fleet = sample_fleet();
        garage.save(&fleet).unwrap();
        let reloaded = garage.load().unwrap();

        assert_eq!(reloaded, fleet);
    }

    #[test]
    fn absent_snapshot_yields_an_empty_fleet() {
        let tmp = TempDir::new().unwrap();
        let garage = Garage::new(tmp.path());
        assert!(garage.load().unwrap().is_empty());
    }

    #[test]
    fn corrupt_snapshot_is_discarded() {
        let tmp = TempDir::new().unwrap();
        let garage = Garage::new(tmp.path());
        let path = tmp.path().join("garage.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(garage.load().unwrap().is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn unknown_variant_tags_are_skipped() {
        let tmp = TempDir::new().unwrap();
        let garage = Garage::new(tmp.path());
        let blob = r#"[
            {
                "id": "mystery-1",
                "kind": "hovercraft",
                "model": "Prototype",
                "color": "Silver",
                "is_on": false,
                "speed": 0.0,
                "history": []
            },
            {
                "id": "truck-1",
                "kind": "truck",
                "model": "Scania",
                "color": "Branco",
                "is_on": false,
                "speed": 0.0,
                "load_capacity": 1000.0,
                "current_load": 250.0,
                "history": []
            }
        ]"#;
        std::fs::write(tmp.path().join("garage.json"), blob).unwrap();

        let fleet = garage.load().unwrap();
        assert_eq!(fleet.len(), 1);
        let truck = fleet.get("truck-1").unwrap();
        assert_eq!(
            *truck.variant(),
            Variant::Truck {
                load_capacity: 1000.0,
                current_load: 250.0
            }
        );
    }

    #[test]
    fn save_overwrites_the_previous_snapshot() {
        let tmp = TempDir::new().unwrap();
        let garage = Garage::new(tmp.path());

        garage.save(&sample_fleet()).unwrap();
        let mut smaller = Fleet::new();
        smaller.add(Vehicle::new_base("Gol", "Preto")).unwrap();
        garage.save(&smaller).unwrap();

        assert_eq!(garage.load().unwrap(), smaller);
    }
}
