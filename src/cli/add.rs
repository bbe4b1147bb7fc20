use std::path::PathBuf;

use clap::Parser;
use garage::Vehicle;
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Add a vehicle to the garage")]
pub struct Add {
    #[command(subcommand)]
    kind: Kind,
}

#[derive(Debug, clap::Subcommand)]
enum Kind {
    /// An ordinary car
    Car {
        /// Model name
        model: String,
        /// Paint colour
        color: String,
    },
    /// A sports car with a turbo
    Sports {
        /// Model name
        model: String,
        /// Paint colour
        color: String,
    },
    /// A truck with a fixed cargo capacity
    Truck {
        /// Model name
        model: String,
        /// Paint colour
        color: String,
        /// Cargo capacity in kg
        #[arg(long)]
        capacity: f64,
    },
}

impl Add {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let (garage, mut fleet) = super::open(&root)?;

        let vehicle = match self.kind {
            Kind::Car { model, color } => {
                validate_form(&model, &color)?;
                Vehicle::new_base(model.trim(), color.trim())
            }
            Kind::Sports { model, color } => {
                validate_form(&model, &color)?;
                Vehicle::new_sports(model.trim(), color.trim())
            }
            Kind::Truck {
                model,
                color,
                capacity,
            } => {
                validate_form(&model, &color)?;
                Vehicle::new_truck(model.trim(), color.trim(), capacity)?
            }
        };

        let added = fleet.add(vehicle)?;
        println!("{} created", added.list_label());
        println!("  id: {}", added.id().dim());
        garage.save(&fleet)?;
        Ok(())
    }
}

/// Creation-form validation: model and colour are both required.
fn validate_form(model: &str, color: &str) -> anyhow::Result<()> {
    anyhow::ensure!(!model.trim().is_empty(), "the model must not be empty");
    anyhow::ensure!(!color.trim().is_empty(), "the colour must not be empty");
    Ok(())
}
