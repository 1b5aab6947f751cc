//! labdesk - lab operations server and admin CLI.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use mockable::DefaultClock;
use tracing::info;

use labdesk::config::LabConfig;
use labdesk::lab::{LabOperations, SharedClock};
use labdesk::storage::ConfiguredStore;
use labdesk::wizard::{self, FormKind, LocalWizardStore};
use labdesk::{handlers, server, telemetry};

#[derive(Parser)]
#[command(name = "labdesk", version, about = "Lab operations store and intake wizard API")]
struct Cli {
    /// TOML config file; `LABDESK_*` environment variables override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the command and wizard endpoints over HTTP.
    Serve,
    /// Print dashboard statistics as JSON.
    Stats,
    /// Print the lab queue as JSON.
    Queue,
    /// Print one saved wizard step as JSON.
    Step {
        form: FormKind,
        session_id: String,
        step_id: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = LabConfig::load(cli.config.as_deref()).context("loading configuration")?;
    telemetry::init_tracing(&config.logging).context("installing tracing subscriber")?;

    let store = ConfiguredStore::open(&config.storage).context("opening storage")?;
    let clock: SharedClock = Arc::new(DefaultClock);

    match cli.command {
        Command::Serve => {
            let ops = LabOperations::open(store.clone(), Arc::clone(&clock));
            let service = Arc::new(handlers::lab_service(ops));
            let wizard_store = Arc::new(LocalWizardStore::new(store, clock));
            let app = server::app(service, wizard_store);

            info!(backend = ?config.storage.backend, "starting labdesk");
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("building tokio runtime")?
                .block_on(server::serve(app, &config.server.bind_addr))
                .with_context(|| format!("serving on {}", config.server.bind_addr))?;
        }
        Command::Stats => {
            let ops = LabOperations::open(store, clock);
            print_json(&ops.get_stats()?)?;
        }
        Command::Queue => {
            let ops = LabOperations::open(store, clock);
            print_json(&ops.queue()?)?;
        }
        Command::Step {
            form,
            session_id,
            step_id,
        } => {
            let api = wizard::connect(&config.wizard, LocalWizardStore::new(store, clock));
            match api.get_step(form, &session_id, &step_id)? {
                Some(step) => print_json(&step)?,
                None => anyhow::bail!("{form} step {step_id} not saved for session {session_id}"),
            }
        }
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
