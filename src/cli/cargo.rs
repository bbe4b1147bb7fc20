//! Cargo actions for trucks.

use std::path::PathBuf;

use clap::Parser;
use tracing::instrument;

#[derive(Debug, Parser)]
#[command(about = "Load cargo onto a truck")]
pub struct Load {
    /// Amount to load, kg
    amount: f64,

    /// Act on this vehicle instead of the selection
    #[arg(long)]
    id: Option<String>,
}

impl Load {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let (garage, mut fleet) = super::open(&root)?;
        let vehicle = super::target(&mut fleet, self.id.as_deref())?;

        let load = vehicle.load(self.amount)?;
        println!("Current load: {load:.0} kg");
        garage.save(&fleet)?;
        Ok(())
    }
}

#[derive(Debug, Parser)]
#[command(about = "Unload cargo from a truck")]
pub struct Unload {
    /// Amount to unload, kg
    amount: f64,

    /// Act on this vehicle instead of the selection
    #[arg(long)]
    id: Option<String>,
}

impl Unload {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let (garage, mut fleet) = super::open(&root)?;
        let vehicle = super::target(&mut fleet, self.id.as_deref())?;

        let load = vehicle.unload(self.amount)?;
        println!("Current load: {load:.0} kg");
        garage.save(&fleet)?;
        Ok(())
    }
}
