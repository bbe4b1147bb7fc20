use std::path::PathBuf;

use clap::Parser;
use tracing::instrument;

#[derive(Debug, Parser)]
#[command(about = "Select the vehicle subsequent commands act on")]
pub struct Select {
    /// Id of the vehicle to select
    id: String,
}

impl Select {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let (_, mut fleet) = super::open(&root)?;

        match fleet.select(&self.id) {
            Ok(vehicle) => println!("Selected {}", vehicle.list_label()),
            // not finding the vehicle clears the selection but is not fatal
            Err(error) => eprintln!("{error}; selection cleared"),
        }
        super::persist_selection(&root, &fleet)
    }
}
