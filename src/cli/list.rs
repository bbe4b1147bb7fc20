use std::path::PathBuf;

use clap::Parser;
use tracing::instrument;

use super::terminal::{Colorize, is_narrow};

#[derive(Debug, Parser, Default)]
#[command(about = "List the vehicles in the garage")]
pub struct List {
    /// Show full ids instead of hiding them on narrow terminals
    #[arg(long)]
    ids: bool,
}

impl List {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let (_, fleet) = super::open(&root)?;

        if fleet.is_empty() {
            println!("No vehicles in the garage yet. Add one with 'garage add'.");
            return Ok(());
        }

        let show_ids = self.ids || !is_narrow();
        for vehicle in fleet.vehicles() {
            let marker = if fleet.selected_id() == Some(vehicle.id()) {
                "*"
            } else {
                " "
            };
            if show_ids {
                println!(
                    "{marker} {}  {}",
                    vehicle.list_label(),
                    vehicle.id().dim()
                );
            } else {
                println!("{marker} {}", vehicle.list_label());
            }
        }
        Ok(())
    }
}
