use std::path::PathBuf;

use chrono::Local;
use clap::Parser;
use garage::{MaintenanceRecord, Status};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Record or schedule maintenance")]
pub struct Maintenance {
    #[command(subcommand)]
    command: MaintenanceCommand,
}

#[derive(Debug, clap::Subcommand)]
enum MaintenanceCommand {
    /// Add a maintenance record to a vehicle's history
    Add(AddRecord),

    /// List a vehicle's maintenance history
    List(ListHistory),
}

#[derive(Debug, Parser)]
pub struct AddRecord {
    /// Service date, YYYY-MM-DD
    #[arg(long)]
    date: String,

    /// What is being done, e.g. "Oil change"
    #[arg(long)]
    kind: String,

    /// Cost in currency units (required with --done)
    #[arg(long)]
    cost: Option<f64>,

    /// Free-form notes
    #[arg(long, default_value = "")]
    notes: String,

    /// Record the service as already carried out
    #[arg(long, conflicts_with = "scheduled")]
    done: bool,

    /// Schedule the service for later
    #[arg(long)]
    scheduled: bool,

    /// Act on this vehicle instead of the selection
    #[arg(long)]
    id: Option<String>,
}

#[derive(Debug, Parser)]
pub struct ListHistory {
    /// Act on this vehicle instead of the selection
    #[arg(long)]
    id: Option<String>,
}

impl Maintenance {
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self.command {
            MaintenanceCommand::Add(cmd) => cmd.run(root),
            MaintenanceCommand::List(cmd) => cmd.run(root),
        }
    }
}

impl AddRecord {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.done || self.scheduled,
            "pass --done to record a completed service or --scheduled to book one"
        );
        // recording a completed service requires the cost up front, before
        // the record is even built
        if self.done {
            anyhow::ensure!(
                self.cost.is_some(),
                "a completed service requires --cost"
            );
        }

        let (garage, mut fleet) = super::open(&root)?;
        let vehicle = super::target(&mut fleet, self.id.as_deref())?;

        let status = if self.done {
            Status::Done
        } else {
            Status::Scheduled
        };
        let record = MaintenanceRecord::new(self.date, self.kind, self.cost, self.notes, status);
        let summary = record.format();

        let today = Local::now().date_naive();
        vehicle.add_maintenance(record, today)?;
        println!("Added: {summary}");
        garage.save(&fleet)?;

        // scheduling something due soon deserves an immediate reminder
        if status == Status::Scheduled {
            for alert in fleet.upcoming_alerts(today) {
                println!("{}", alert.warning());
            }
        }
        Ok(())
    }
}

impl ListHistory {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let (_, fleet) = super::open(&root)?;
        let vehicle = super::target_ref(&fleet, self.id.as_deref())?;

        if vehicle.history().is_empty() {
            println!("No maintenance on record for {}.", vehicle.model());
            return Ok(());
        }
        for record in vehicle.history() {
            println!("{}", record.format());
        }
        Ok(())
    }
}
