use std::path::PathBuf;

use chrono::Local;
use clap::Parser;
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Show scheduled maintenance due today or tomorrow")]
pub struct Alerts {}

impl Alerts {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let (_, fleet) = super::open(&root)?;

        let alerts = fleet.upcoming_alerts(Local::now().date_naive());
        if alerts.is_empty() {
            println!("No scheduled maintenance due today or tomorrow.");
            return Ok(());
        }
        for alert in alerts {
            println!("{}", alert.warning());
        }
        Ok(())
    }
}
