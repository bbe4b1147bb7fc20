use std::path::PathBuf;

use chrono::Local;
use clap::Parser;
use garage::MaintenanceRecord;
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Show a vehicle's status and maintenance history")]
pub struct Show {
    /// Act on this vehicle instead of the selection
    #[arg(long)]
    id: Option<String>,
}

impl Show {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let (_, fleet) = super::open(&root)?;
        let vehicle = super::target_ref(&fleet, self.id.as_deref())?;

        for line in vehicle.describe().lines() {
            if let Some(status) = line.strip_prefix("Status: ") {
                let status = match status {
                    "On" => status.success(),
                    _ => status.failure(),
                };
                println!("Status: {status}");
            } else {
                println!("{line}");
            }
        }

        let today = Local::now().date_naive();
        let split = vehicle.split_history(today);

        println!("\n{}", "Service history".dim());
        print_group(&split.completed, "none recorded");

        println!("\n{}", "Upcoming".dim());
        print_group(&split.upcoming, "nothing scheduled");

        if !split.overdue.is_empty() {
            println!("\n{}", "Overdue (scheduled, never done?)".warning());
            print_group(&split.overdue, "");
        }

        Ok(())
    }
}

fn print_group(records: &[&MaintenanceRecord], empty_note: &str) {
    if records.is_empty() {
        println!("  {empty_note}");
        return;
    }
    for record in records {
        println!("  {}", record.format());
    }
}
