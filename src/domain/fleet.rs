use chrono::{Days, NaiveDate};
use tracing::warn;

use super::{maintenance::Status, vehicle::Vehicle};

/// Why a fleet operation was refused.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FleetError {
    /// `add` with an id already present in the fleet.
    #[error("a vehicle with id '{0}' is already in the fleet")]
    DuplicateId(String),

    /// `select` with an id not present in the fleet.
    #[error("no vehicle with id '{0}' in the fleet")]
    NotFound(String),
}

/// The ordered collection of vehicles under management, plus the current
/// selection.
///
/// Vehicles keep their insertion order; ids are unique. The selection is a
/// non-owning lookup by id and, when set, always refers to a vehicle
/// currently present. It is UI state and never part of the persisted
/// snapshot.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Fleet {
    vehicles: Vec<Vehicle>,
    selected: Option<String>,
}

impl Fleet {
    /// Creates an empty fleet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vehicles: Vec::new(),
            selected: None,
        }
    }

    /// Appends a vehicle, keeping insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`FleetError::DuplicateId`] when a vehicle with the same id is
    /// already present; the fleet is left untouched.
    pub fn add(&mut self, vehicle: Vehicle) -> Result<&Vehicle, FleetError> {
        if self.get(vehicle.id()).is_some() {
            return Err(FleetError::DuplicateId(vehicle.id().to_string()));
        }
        self.vehicles.push(vehicle);
        Ok(self.vehicles.last().expect("just pushed"))
    }

    /// Selects the vehicle with the given id.
    ///
    /// # Errors
    ///
    /// When the id is not present the selection is cleared and
    /// [`FleetError::NotFound`] is returned. Not finding a vehicle is
    /// non-fatal; callers report it and carry on.
    pub fn select(&mut self, id: &str) -> Result<&Vehicle, FleetError> {
        let Some(index) = self.vehicles.iter().position(|v| v.id() == id) else {
            self.selected = None;
            warn!(id, "selection cleared: vehicle not found");
            return Err(FleetError::NotFound(id.to_string()));
        };
        self.selected = Some(id.to_string());
        Ok(&self.vehicles[index])
    }

    /// Clears the selection.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// The id of the selected vehicle, if any.
    #[must_use]
    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// The selected vehicle, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&Vehicle> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    /// Mutable access to the selected vehicle, if any.
    pub fn selected_mut(&mut self) -> Option<&mut Vehicle> {
        let id = self.selected.clone()?;
        self.get_mut(&id)
    }

    /// Looks a vehicle up by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id() == id)
    }

    /// Mutable lookup by id.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Vehicle> {
        self.vehicles.iter_mut().find(|v| v.id() == id)
    }

    /// The vehicles, in insertion order.
    #[must_use]
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// The number of vehicles in the fleet.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    /// Whether the fleet is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Scans every vehicle's scheduled records and returns reminder strings
    /// for those due on `reference` or the day after.
    #[must_use]
    pub fn upcoming_alerts(&self, reference: NaiveDate) -> Vec<String> {
        let tomorrow = reference.checked_add_days(Days::new(1));
        let mut alerts = Vec::new();
        for vehicle in &self.vehicles {
            for record in vehicle.history() {
                if record.status() != Status::Scheduled {
                    continue;
                }
                let Some(date) = record.parsed_date() else {
                    continue;
                };
                if date == reference {
                    alerts.push(format!("TODAY: {} for {}", record.kind(), vehicle.model()));
                } else if Some(date) == tomorrow {
                    alerts.push(format!(
                        "TOMORROW: {} for {}",
                        record.kind(),
                        vehicle.model()
                    ));
                }
            }
        }
        alerts
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{Fleet, FleetError, Status, Vehicle};
    use crate::domain::MaintenanceRecord;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    #[test]
    fn add_keeps_insertion_order() {
        let mut fleet = Fleet::new();
        fleet.add(Vehicle::new_base("Fusca", "Azul")).unwrap();
        fleet.add(Vehicle::new_sports("Ferrari", "Vermelha")).unwrap();

        let models: Vec<_> = fleet.vehicles().iter().map(Vehicle::model).collect();
        assert_eq!(models, ["Fusca", "Ferrari"]);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut fleet = Fleet::new();
        let car = Vehicle::new_base("Fusca", "Azul");
        let twin = car.clone();
        let id = car.id().to_string();

        fleet.add(car).unwrap();
        assert_eq!(fleet.add(twin), Err(FleetError::DuplicateId(id)));
        assert_eq!(fleet.len(), 1);
    }

    #[test]
    fn select_tracks_a_present_vehicle() {
        let mut fleet = Fleet::new();
        let id = fleet
            .add(Vehicle::new_base("Fusca", "Azul"))
            .unwrap()
            .id()
            .to_string();

        fleet.select(&id).unwrap();
        assert_eq!(fleet.selected().unwrap().model(), "Fusca");
    }

    #[test]
    fn selecting_an_unknown_id_clears_the_selection() {
        let mut fleet = Fleet::new();
        let id = fleet
            .add(Vehicle::new_base("Fusca", "Azul"))
            .unwrap()
            .id()
            .to_string();
        fleet.select(&id).unwrap();

        assert_eq!(
            fleet.select("missing"),
            Err(FleetError::NotFound("missing".to_string()))
        );
        assert!(fleet.selected().is_none());
    }

    #[test]
    fn alerts_cover_today_and_tomorrow_only() {
        let mut fleet = Fleet::new();
        let mut car = Vehicle::new_base("Fusca", "Azul");
        for (date, kind) in [
            ("2024-05-10", "Oil change"),
            ("2024-05-11", "Inspection"),
            ("2024-05-12", "Tyres"),
        ] {
            car.add_maintenance(
                MaintenanceRecord::new(date, kind, None, "", Status::Scheduled),
                today(),
            )
            .unwrap();
        }
        // completed records never alert, whatever the date
        car.add_maintenance(
            MaintenanceRecord::new("2024-05-10", "Wash", Some(30.0), "", Status::Done),
            today(),
        )
        .unwrap();
        fleet.add(car).unwrap();

        assert_eq!(
            fleet.upcoming_alerts(today()),
            [
                "TODAY: Oil change for Fusca",
                "TOMORROW: Inspection for Fusca"
            ]
        );
    }
}
