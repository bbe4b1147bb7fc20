use std::{cmp::Ordering, fmt};

use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

use super::maintenance::{InvalidRecord, MaintenanceRecord, Status};

/// Top speed of a base car, km/h.
const BASE_MAX_SPEED: f64 = 180.0;
/// Top speed of a sports car with the turbo disengaged, km/h.
const SPORTS_MAX_SPEED: f64 = 250.0;
/// Top speed of a sports car while the turbo is engaged, km/h.
const SPORTS_TURBO_MAX_SPEED: f64 = 320.0;
/// Top speed of a truck, km/h.
const TRUCK_MAX_SPEED: f64 = 120.0;

/// Acceleration multiplier while the turbo is engaged.
const TURBO_BOOST: f64 = 1.5;
/// A fully loaded truck still accelerates at 30% effectiveness.
const MIN_LOAD_FACTOR: f64 = 0.3;

/// Variant-specific state of a [`Vehicle`].
///
/// The variant decides the speed ceiling and how throttle input translates
/// into speed; trucks additionally carry cargo state.
#[derive(Debug, Clone, PartialEq)]
pub enum Variant {
    /// An ordinary car with no extra equipment.
    Base,
    /// A sports car with an engageable turbo.
    Sports {
        /// Whether the turbo is currently engaged.
        turbo_on: bool,
    },
    /// A truck with a fixed cargo capacity.
    Truck {
        /// Maximum cargo, kg. Fixed at creation, always positive.
        load_capacity: f64,
        /// Cargo currently on board, kg. Always within `[0, load_capacity]`.
        current_load: f64,
    },
}

impl Variant {
    /// The tag written to (and dispatched on from) the stored snapshot.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Sports { .. } => "sports",
            Self::Truck { .. } => "truck",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Base => write!(f, "Car"),
            Self::Sports { .. } => write!(f, "Sports car"),
            Self::Truck { .. } => write!(f, "Truck"),
        }
    }
}

/// Why a vehicle operation was refused.
///
/// These are domain precondition failures: the operation is aborted and no
/// state changes.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum VehicleError {
    /// `turn_on` on a vehicle that is already running.
    #[error("the vehicle is already on")]
    AlreadyOn,

    /// `turn_off` on a vehicle that is already off.
    #[error("the vehicle is already off")]
    AlreadyOff,

    /// `turn_off` while the vehicle is moving.
    #[error("stop the vehicle before turning it off")]
    StillMoving,

    /// A drive operation that needs the engine running.
    #[error("the vehicle must be on for that")]
    EngineOff,

    /// A turbo operation on a vehicle without a turbo.
    #[error("this vehicle has no turbo")]
    NoTurbo,

    /// `engage_turbo` while the turbo is already engaged.
    #[error("the turbo is already engaged")]
    TurboAlreadyOn,

    /// `disengage_turbo` while the turbo is not engaged.
    #[error("the turbo is not engaged")]
    TurboNotEngaged,

    /// A cargo operation on a vehicle without a cargo bed.
    #[error("this vehicle cannot carry cargo")]
    NoCargoBed,

    /// Loading or unloading while the engine is running.
    #[error("turn the vehicle off before loading or unloading")]
    LoadedWhileRunning,

    /// A cargo amount that is zero, negative, or not a number.
    #[error("the cargo amount must be a positive number")]
    InvalidCargoAmount,

    /// Loading past the truck's capacity.
    #[error("loading {amount} kg would exceed the {capacity} kg capacity")]
    OverCapacity {
        /// The amount that was asked for.
        amount: f64,
        /// The truck's fixed capacity.
        capacity: f64,
    },

    /// Unloading more cargo than is on board.
    #[error("cannot unload {amount} kg, only {current} kg on board")]
    InsufficientCargo {
        /// The amount that was asked for.
        amount: f64,
        /// The cargo currently on board.
        current: f64,
    },

    /// A truck created with a zero, negative, or non-numeric capacity.
    #[error("the load capacity must be a positive number")]
    InvalidCapacity,
}

/// A vehicle under management, of one of three variants.
///
/// All state transitions go through the methods here, each of which
/// re-validates its preconditions; `speed` never leaves
/// `[0, max_speed]` and a truck's `current_load` never leaves
/// `[0, load_capacity]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    /// Opaque unique identifier, generated at creation.
    id: String,
    model: String,
    color: String,
    is_on: bool,
    speed: f64,
    history: Vec<MaintenanceRecord>,
    variant: Variant,
}

/// A vehicle's maintenance history partitioned by lifecycle state.
///
/// Produced by [`Vehicle::split_history`]; a pure projection, recomputed on
/// each call.
#[derive(Debug, Default)]
pub struct HistorySplit<'a> {
    /// Records with status `Done`, any date.
    pub completed: Vec<&'a MaintenanceRecord>,
    /// `Scheduled` records dated today or later.
    pub upcoming: Vec<&'a MaintenanceRecord>,
    /// `Scheduled` records dated strictly before today, or whose date does
    /// not parse.
    pub overdue: Vec<&'a MaintenanceRecord>,
}

impl Vehicle {
    fn new(model: String, color: String, variant: Variant) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            model,
            color,
            is_on: false,
            speed: 0.0,
            history: Vec::new(),
            variant,
        }
    }

    /// Creates a base car.
    #[must_use]
    pub fn new_base(model: impl Into<String>, color: impl Into<String>) -> Self {
        Self::new(model.into(), color.into(), Variant::Base)
    }

    /// Creates a sports car with the turbo disengaged.
    #[must_use]
    pub fn new_sports(model: impl Into<String>, color: impl Into<String>) -> Self {
        Self::new(
            model.into(),
            color.into(),
            Variant::Sports { turbo_on: false },
        )
    }

    /// Creates an empty truck.
    ///
    /// # Errors
    ///
    /// Returns [`VehicleError::InvalidCapacity`] unless `load_capacity` is a
    /// positive number.
    pub fn new_truck(
        model: impl Into<String>,
        color: impl Into<String>,
        load_capacity: f64,
    ) -> Result<Self, VehicleError> {
        if !load_capacity.is_finite() || load_capacity <= 0.0 {
            return Err(VehicleError::InvalidCapacity);
        }
        Ok(Self::new(
            model.into(),
            color.into(),
            Variant::Truck {
                load_capacity,
                current_load: 0.0,
            },
        ))
    }

    /// Rebuilds a vehicle from stored attributes.
    ///
    /// The deserialization half of persistence: attributes and history are
    /// taken verbatim so that a snapshot round-trips exactly.
    #[must_use]
    pub(crate) fn from_parts(
        id: String,
        model: String,
        color: String,
        is_on: bool,
        speed: f64,
        variant: Variant,
        history: Vec<MaintenanceRecord>,
    ) -> Self {
        Self {
            id,
            model,
            color,
            is_on,
            speed,
            history,
            variant,
        }
    }

    /// The current speed ceiling, km/h.
    ///
    /// Dynamic for sports cars: higher while the turbo is engaged.
    #[must_use]
    pub const fn max_speed(&self) -> f64 {
        match self.variant {
            Variant::Base => BASE_MAX_SPEED,
            Variant::Sports { turbo_on } => {
                if turbo_on {
                    SPORTS_TURBO_MAX_SPEED
                } else {
                    SPORTS_MAX_SPEED
                }
            }
            Variant::Truck { .. } => TRUCK_MAX_SPEED,
        }
    }

    /// Starts the engine.
    ///
    /// # Errors
    ///
    /// Fails if the vehicle is already on.
    pub fn turn_on(&mut self) -> Result<(), VehicleError> {
        if self.is_on {
            return Err(VehicleError::AlreadyOn);
        }
        self.is_on = true;
        debug!(id = %self.id, "vehicle turned on");
        Ok(())
    }

    /// Stops the engine.
    ///
    /// # Errors
    ///
    /// Fails if the vehicle is already off, or still moving.
    pub fn turn_off(&mut self) -> Result<(), VehicleError> {
        if !self.is_on {
            return Err(VehicleError::AlreadyOff);
        }
        if self.speed > 0.0 {
            return Err(VehicleError::StillMoving);
        }
        self.is_on = false;
        debug!(id = %self.id, "vehicle turned off");
        Ok(())
    }

    /// Applies throttle, returning the new speed.
    ///
    /// The effective increment is variant-specific: ×1.5 for a sports car
    /// with the turbo engaged, and scaled down with cargo weight for a truck
    /// (floored at 30% effectiveness). The result is clamped to
    /// `[0, max_speed]`.
    ///
    /// # Errors
    ///
    /// Fails if the vehicle is not on.
    pub fn accelerate(&mut self, delta: f64) -> Result<f64, VehicleError> {
        if !self.is_on {
            return Err(VehicleError::EngineOff);
        }
        let factor = match self.variant {
            Variant::Base => 1.0,
            Variant::Sports { turbo_on } => {
                if turbo_on {
                    TURBO_BOOST
                } else {
                    1.0
                }
            }
            Variant::Truck {
                load_capacity,
                current_load,
            } => (1.0 - current_load / (2.0 * load_capacity)).max(MIN_LOAD_FACTOR),
        };
        self.speed = (self.speed + delta * factor).clamp(0.0, self.max_speed());
        debug!(id = %self.id, speed = self.speed, "accelerated");
        Ok(self.speed)
    }

    /// Applies the brakes, returning the new speed.
    ///
    /// Speed floors at 0. Works with the engine off so a rolling vehicle can
    /// always be brought to rest. Callers persist only when the returned
    /// speed is exactly 0 (a settled state).
    pub fn brake(&mut self, delta: f64) -> f64 {
        self.speed = (self.speed - delta).max(0.0);
        debug!(id = %self.id, speed = self.speed, "braked");
        self.speed
    }

    /// The horn. No state change.
    #[must_use]
    pub fn honk(&self) -> &'static str {
        debug!(id = %self.id, "honked");
        "Beep beep!"
    }

    /// Engages the turbo, raising the speed ceiling.
    ///
    /// # Errors
    ///
    /// Fails on vehicles without a turbo, with the engine off, or with the
    /// turbo already engaged.
    pub fn engage_turbo(&mut self) -> Result<(), VehicleError> {
        let Variant::Sports { turbo_on } = &mut self.variant else {
            return Err(VehicleError::NoTurbo);
        };
        if !self.is_on {
            return Err(VehicleError::EngineOff);
        }
        if *turbo_on {
            return Err(VehicleError::TurboAlreadyOn);
        }
        *turbo_on = true;
        debug!(id = %self.id, "turbo engaged");
        Ok(())
    }

    /// Disengages the turbo, restoring the lower speed ceiling.
    ///
    /// A speed already above the restored ceiling is left untouched; braking
    /// is the only way back down. This mirrors the long-standing behaviour of
    /// the garage and is deliberate.
    ///
    /// # Errors
    ///
    /// Fails on vehicles without a turbo or with the turbo not engaged.
    pub fn disengage_turbo(&mut self) -> Result<(), VehicleError> {
        let Variant::Sports { turbo_on } = &mut self.variant else {
            return Err(VehicleError::NoTurbo);
        };
        if !*turbo_on {
            return Err(VehicleError::TurboNotEngaged);
        }
        *turbo_on = false;
        if self.speed > self.max_speed() {
            info!(
                id = %self.id,
                speed = self.speed,
                ceiling = self.max_speed(),
                "speed left above the restored ceiling after turbo disengage"
            );
        }
        Ok(())
    }

    /// Loads cargo onto a truck, returning the new load.
    ///
    /// # Errors
    ///
    /// Fails on vehicles without a cargo bed, while the engine is running,
    /// for non-positive amounts, and when the result would exceed capacity.
    pub fn load(&mut self, amount: f64) -> Result<f64, VehicleError> {
        let (capacity, current) = self.cargo_preconditions(amount)?;
        if current + amount > capacity {
            return Err(VehicleError::OverCapacity {
                amount,
                capacity,
            });
        }
        self.set_current_load(current + amount)
    }

    /// Unloads cargo from a truck, returning the new load.
    ///
    /// # Errors
    ///
    /// Fails on vehicles without a cargo bed, while the engine is running,
    /// for non-positive amounts, and when more is unloaded than is on board.
    pub fn unload(&mut self, amount: f64) -> Result<f64, VehicleError> {
        let (_, current) = self.cargo_preconditions(amount)?;
        if current - amount < 0.0 {
            return Err(VehicleError::InsufficientCargo {
                amount,
                current,
            });
        }
        self.set_current_load(current - amount)
    }

    /// Shared checks for `load`/`unload`: must be a truck, engine off, and a
    /// positive amount. Returns `(capacity, current_load)`.
    fn cargo_preconditions(&self, amount: f64) -> Result<(f64, f64), VehicleError> {
        let Variant::Truck {
            load_capacity,
            current_load,
        } = self.variant
        else {
            return Err(VehicleError::NoCargoBed);
        };
        if self.is_on {
            return Err(VehicleError::LoadedWhileRunning);
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(VehicleError::InvalidCargoAmount);
        }
        Ok((load_capacity, current_load))
    }

    fn set_current_load(&mut self, new_load: f64) -> Result<f64, VehicleError> {
        let Variant::Truck { current_load, .. } = &mut self.variant else {
            return Err(VehicleError::NoCargoBed);
        };
        *current_load = new_load;
        debug!(id = %self.id, load = new_load, "cargo changed");
        Ok(new_load)
    }

    /// Validates and appends a maintenance record, keeping the history
    /// sorted by ascending parsed date.
    ///
    /// Records with unparseable dates sort last and keep their insertion
    /// order among themselves (the sort is stable).
    ///
    /// # Errors
    ///
    /// Returns the validation failure; the history is left untouched.
    pub fn add_maintenance(
        &mut self,
        record: MaintenanceRecord,
        today: NaiveDate,
    ) -> Result<(), InvalidRecord> {
        record.validate(today)?;
        self.history.push(record);
        self.history
            .sort_by(|a, b| match (a.parsed_date(), b.parsed_date()) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(&b),
            });
        Ok(())
    }

    /// Partitions the history into completed, upcoming, and overdue groups,
    /// relative to `today`.
    #[must_use]
    pub fn split_history(&self, today: NaiveDate) -> HistorySplit<'_> {
        let mut split = HistorySplit::default();
        for record in &self.history {
            match record.status() {
                Status::Done => split.completed.push(record),
                Status::Scheduled => match record.parsed_date() {
                    Some(date) if date >= today => split.upcoming.push(record),
                    _ => split.overdue.push(record),
                },
            }
        }
        split
    }

    /// Renders a multi-line status block, with variant-specific lines
    /// appended.
    #[must_use]
    pub fn describe(&self) -> String {
        let status = if self.is_on { "On" } else { "Off" };
        let mut block = format!(
            "ID: {}\nModel: {}\nColor: {}\nStatus: {}\nSpeed: {:.0} km/h\nMax speed: {:.0} km/h",
            self.id,
            self.model,
            self.color,
            status,
            self.speed,
            self.max_speed()
        );
        match self.variant {
            Variant::Base => {}
            Variant::Sports { turbo_on } => {
                let turbo = if turbo_on { "engaged" } else { "disengaged" };
                block.push_str(&format!("\nTurbo: {turbo}"));
            }
            Variant::Truck {
                load_capacity,
                current_load,
            } => {
                block.push_str(&format!(
                    "\nCapacity: {load_capacity:.0} kg\nCurrent load: {current_load:.0} kg"
                ));
            }
        }
        block
    }

    /// Renders the one-line summary used in list views,
    /// e.g. `Truck: Scania (Blue)`.
    #[must_use]
    pub fn list_label(&self) -> String {
        format!("{}: {} ({})", self.variant, self.model, self.color)
    }

    /// The vehicle's unique identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The paint colour.
    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Whether the engine is running.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        self.is_on
    }

    /// The current speed, km/h.
    #[must_use]
    pub const fn speed(&self) -> f64 {
        self.speed
    }

    /// The variant-specific state.
    #[must_use]
    pub const fn variant(&self) -> &Variant {
        &self.variant
    }

    /// The maintenance history, sorted by ascending parsed date.
    #[must_use]
    pub fn history(&self) -> &[MaintenanceRecord] {
        &self.history
    }
}
