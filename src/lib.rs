//! Garage management for a small fleet of vehicles.
//!
//! Vehicles (cars, sports cars, trucks) carry a maintenance history and are
//! persisted as one JSON snapshot in a directory.

pub mod domain;
pub use domain::{
    Config, Fleet, FleetError, HistorySplit, InvalidRecord, MaintenanceRecord, Status, Variant,
    Vehicle, VehicleError,
};

/// Filesystem persistence for the garage.
pub mod storage;
pub use storage::{Garage, Session, StorageError};

/// External lookups: vehicle extras and trip weather.
pub mod lookup;
pub use lookup::{VehicleDetails, WeatherClient, WeatherReport};
