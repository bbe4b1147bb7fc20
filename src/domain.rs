//! The garage domain model: maintenance records, vehicles, and the fleet.

mod config;
mod fleet;
mod maintenance;
mod vehicle;

pub use config::{Config, ConfigError};
pub use fleet::{Fleet, FleetError};
pub use maintenance::{InvalidRecord, MaintenanceRecord, Status};
pub use vehicle::{HistorySplit, Variant, Vehicle, VehicleError};
