use std::path::PathBuf;

use clap::Parser;
use garage::{Config, lookup};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Look a vehicle up in the local detail file")]
pub struct Details {
    /// Act on this vehicle instead of the selection
    #[arg(long)]
    id: Option<String>,
}

impl Details {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let (_, fleet) = super::open(&root)?;
        let vehicle = super::target_ref(&fleet, self.id.as_deref())?;

        let config = Config::load(&root)?;
        let path = root.join(&config.details.path);

        let Some(details) = lookup::lookup_details(&path, vehicle.id())? else {
            println!(
                "No extra details on file for {} (id {}).",
                vehicle.model(),
                vehicle.id().dim()
            );
            return Ok(());
        };

        println!("Extra details for {}:", vehicle.model());
        print_field("FIPE value", details.fipe_value.as_deref());
        print_field("Pending recall", details.pending_recall.as_deref());
        print_field("Last service", details.last_service.as_deref());
        print_field("Maintenance tip", details.maintenance_tip.as_deref());
        Ok(())
    }
}

fn print_field(label: &str, value: Option<&str>) {
    println!("  {label}: {}", value.unwrap_or("N/A"));
}
