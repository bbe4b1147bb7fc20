//! Drive actions: engine, throttle, brakes, horn, and turbo.
//!
//! Persistence follows the settled-state policy: starting, stopping, and
//! turbo changes save the garage; throttle does not, and braking saves only
//! when the vehicle comes to rest.

use std::path::PathBuf;

use clap::Parser;
use tracing::instrument;

#[derive(Debug, Parser)]
#[command(about = "Start the engine")]
pub struct Start {
    /// Act on this vehicle instead of the selection
    #[arg(long)]
    id: Option<String>,
}

impl Start {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let (garage, mut fleet) = super::open(&root)?;
        let vehicle = super::target(&mut fleet, self.id.as_deref())?;

        vehicle.turn_on()?;
        println!("{} is on", vehicle.model());
        garage.save(&fleet)?;
        Ok(())
    }
}

#[derive(Debug, Parser)]
#[command(about = "Stop the engine")]
pub struct Stop {
    /// Act on this vehicle instead of the selection
    #[arg(long)]
    id: Option<String>,
}

impl Stop {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let (garage, mut fleet) = super::open(&root)?;
        let vehicle = super::target(&mut fleet, self.id.as_deref())?;

        vehicle.turn_off()?;
        println!("{} is off", vehicle.model());
        garage.save(&fleet)?;
        Ok(())
    }
}

#[derive(Debug, Parser)]
#[command(about = "Apply throttle")]
pub struct Accelerate {
    /// Speed increment in km/h
    #[arg(long, default_value_t = 10.0)]
    by: f64,

    /// Act on this vehicle instead of the selection
    #[arg(long)]
    id: Option<String>,
}

impl Accelerate {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let (_, mut fleet) = super::open(&root)?;
        let vehicle = super::target(&mut fleet, self.id.as_deref())?;

        let speed = vehicle.accelerate(self.by)?;
        println!("Speed: {speed:.0} km/h (max {:.0})", vehicle.max_speed());
        Ok(())
    }
}

#[derive(Debug, Parser)]
#[command(about = "Apply the brakes")]
pub struct Brake {
    /// Speed decrement in km/h
    #[arg(long, default_value_t = 10.0)]
    by: f64,

    /// Act on this vehicle instead of the selection
    #[arg(long)]
    id: Option<String>,
}

impl Brake {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let (garage, mut fleet) = super::open(&root)?;
        let vehicle = super::target(&mut fleet, self.id.as_deref())?;

        // already at rest; nothing to change or persist
        if vehicle.speed() == 0.0 {
            println!("Speed: 0 km/h");
            return Ok(());
        }

        let speed = vehicle.brake(self.by);
        println!("Speed: {speed:.0} km/h");
        if speed == 0.0 {
            // settled; worth persisting
            garage.save(&fleet)?;
        }
        Ok(())
    }
}

#[derive(Debug, Parser)]
#[command(about = "Sound the horn")]
pub struct Honk {
    /// Act on this vehicle instead of the selection
    #[arg(long)]
    id: Option<String>,
}

impl Honk {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let (_, fleet) = super::open(&root)?;
        let vehicle = super::target_ref(&fleet, self.id.as_deref())?;
        println!("{}", vehicle.honk());
        Ok(())
    }
}

#[derive(Debug, Parser)]
#[command(about = "Engage or disengage the turbo (sports cars only)")]
pub struct Turbo {
    #[command(subcommand)]
    switch: TurboSwitch,

    /// Act on this vehicle instead of the selection
    #[arg(long, global = true)]
    id: Option<String>,
}

#[derive(Debug, clap::Subcommand)]
enum TurboSwitch {
    /// Engage the turbo
    On,
    /// Disengage the turbo
    Off,
}

impl Turbo {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let (garage, mut fleet) = super::open(&root)?;
        let vehicle = super::target(&mut fleet, self.id.as_deref())?;

        match self.switch {
            TurboSwitch::On => {
                vehicle.engage_turbo()?;
                println!("Turbo engaged (max {:.0} km/h)", vehicle.max_speed());
            }
            TurboSwitch::Off => {
                vehicle.disengage_turbo()?;
                println!("Turbo disengaged (max {:.0} km/h)", vehicle.max_speed());
            }
        }
        garage.save(&fleet)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use garage::{Fleet, Garage, Vehicle};

    use super::Brake;

    #[test]
    fn braking_at_rest_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let garage = Garage::new(tmp.path());
        let mut fleet = Fleet::new();
        let id = fleet
            .add(Vehicle::new_base("Fusca", "Azul"))
            .unwrap()
            .id()
            .to_string();
        garage.save(&fleet).unwrap();

        // a redundant save would fail on the read-only snapshot
        let snapshot = tmp.path().join("garage.json");
        let mut perms = std::fs::metadata(&snapshot).unwrap().permissions();
        perms.set_readonly(true);
        std::fs::set_permissions(&snapshot, perms).unwrap();
        let before = std::fs::metadata(&snapshot).unwrap().modified().unwrap();

        let cmd = Brake {
            by: 10.0,
            id: Some(id),
        };
        cmd.run(tmp.path().to_path_buf()).unwrap();

        let after = std::fs::metadata(&snapshot).unwrap().modified().unwrap();
        assert_eq!(after, before);
    }
}
