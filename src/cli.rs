use std::path::{Path, PathBuf};

mod add;
mod alerts;
mod cargo;
mod details;
mod drive;
mod list;
mod maintenance;
mod select;
mod show;
mod terminal;
mod weather;

use add::Add;
use alerts::Alerts;
use anyhow::Context;
use cargo::{Load, Unload};
use clap::ArgAction;
use details::Details;
use drive::{Accelerate, Brake, Honk, Start, Stop, Turbo};
use garage::{Fleet, Garage, Session, Vehicle};
use list::List;
use maintenance::Maintenance;
use select::Select;
use show::Show;
use weather::Weather;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the garage directory
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::List(List::default()))
            .run(self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// List the vehicles in the garage (default)
    List(List),

    /// Add a vehicle to the garage
    Add(Add),

    /// Select the vehicle subsequent commands act on
    Select(Select),

    /// Show a vehicle's status and maintenance history
    Show(Show),

    /// Start the engine
    Start(Start),

    /// Stop the engine
    Stop(Stop),

    /// Apply throttle
    Accelerate(Accelerate),

    /// Apply the brakes
    Brake(Brake),

    /// Sound the horn
    Honk(Honk),

    /// Engage or disengage the turbo (sports cars only)
    Turbo(Turbo),

    /// Load cargo onto a truck
    Load(Load),

    /// Unload cargo from a truck
    Unload(Unload),

    /// Record or schedule maintenance
    Maintenance(Maintenance),

    /// Show scheduled maintenance due today or tomorrow
    Alerts(Alerts),

    /// Look a vehicle up in the local detail file
    Details(Details),

    /// Look up the weather for a trip destination
    Weather(Weather),
}

impl Command {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self {
            Self::List(cmd) => cmd.run(root),
            Self::Add(cmd) => cmd.run(root),
            Self::Select(cmd) => cmd.run(root),
            Self::Show(cmd) => cmd.run(root),
            Self::Start(cmd) => cmd.run(root),
            Self::Stop(cmd) => cmd.run(root),
            Self::Accelerate(cmd) => cmd.run(root),
            Self::Brake(cmd) => cmd.run(root),
            Self::Honk(cmd) => cmd.run(root),
            Self::Turbo(cmd) => cmd.run(root),
            Self::Load(cmd) => cmd.run(root),
            Self::Unload(cmd) => cmd.run(root),
            Self::Maintenance(cmd) => cmd.run(root),
            Self::Alerts(cmd) => cmd.run(root),
            Self::Details(cmd) => cmd.run(root),
            Self::Weather(cmd) => cmd.run(root),
        }
    }
}

/// Opens the garage under `root` and restores the session selection when the
/// selected vehicle is still present. A stale selection is dropped and the
/// sidecar rewritten, so select() warns about it once, not on every command.
fn open(root: &Path) -> anyhow::Result<(Garage, Fleet)> {
    let garage = Garage::new(root);
    let mut fleet = garage.load().context("could not load the garage")?;
    let session = Session::load(root);
    if let Some(id) = session.selected {
        if fleet.select(&id).is_err() {
            persist_selection(root, &fleet)?;
        }
    }
    Ok((garage, fleet))
}

/// Writes the current selection back to the session sidecar.
fn persist_selection(root: &Path, fleet: &Fleet) -> anyhow::Result<()> {
    let session = Session {
        selected: fleet.selected_id().map(ToString::to_string),
    };
    session
        .save(root)
        .context("could not save the session sidecar")
}

/// Resolves the vehicle a command acts on: an explicit `--id`, or the
/// current selection.
fn target<'a>(fleet: &'a mut Fleet, id: Option<&str>) -> anyhow::Result<&'a mut Vehicle> {
    match id {
        Some(id) => fleet
            .get_mut(id)
            .with_context(|| format!("no vehicle with id '{id}' in the garage")),
        None => fleet
            .selected_mut()
            .context("no vehicle selected; run 'garage select <ID>' first"),
    }
}

/// Like [`target`], but read-only.
fn target_ref<'a>(fleet: &'a Fleet, id: Option<&str>) -> anyhow::Result<&'a Vehicle> {
    match id {
        Some(id) => fleet
            .get(id)
            .with_context(|| format!("no vehicle with id '{id}' in the garage")),
        None => fleet
            .selected()
            .context("no vehicle selected; run 'garage select <ID>' first"),
    }
}

#[cfg(test)]
mod tests {
    use garage::{Fleet, Garage, Session, Vehicle};

    use super::open;

    #[test]
    fn stale_selection_is_cleared_from_the_sidecar() {
        let tmp = tempfile::tempdir().unwrap();
        let garage = Garage::new(tmp.path());
        let mut fleet = Fleet::new();
        fleet.add(Vehicle::new_base("Fusca", "Azul")).unwrap();
        garage.save(&fleet).unwrap();
        Session {
            selected: Some("long-gone".to_string()),
        }
        .save(tmp.path())
        .unwrap();

        let (_, fleet) = open(tmp.path()).unwrap();

        assert_eq!(fleet.selected_id(), None);
        assert_eq!(Session::load(tmp.path()), Session::default());
    }

    #[test]
    fn live_selection_survives_reopening() {
        let tmp = tempfile::tempdir().unwrap();
        let garage = Garage::new(tmp.path());
        let mut fleet = Fleet::new();
        let id = fleet
            .add(Vehicle::new_base("Fusca", "Azul"))
            .unwrap()
            .id()
            .to_string();
        garage.save(&fleet).unwrap();
        Session {
            selected: Some(id.clone()),
        }
        .save(tmp.path())
        .unwrap();

        let (_, fleet) = open(tmp.path()).unwrap();

        assert_eq!(fleet.selected_id(), Some(id.as_str()));
    }
}
