use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use slotwise_store::JsonTaskStore;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod schedule;
mod state;
mod tasks_cmd;

use tasks_cmd::TasksCommand;

#[derive(Parser, Debug)]
#[command(
    name = "slotwise",
    version,
    about = "Turn a task backlog into next week's calendar"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Prioritize the backlog and write next week's schedule as ICS
    Schedule {
        /// First day of the week (default: the Monday after today)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Calendar output path (default: config [schedule].output_path)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Manage the task backlog
    Tasks {
        #[command(subcommand)]
        command: TasksCommand,
    },

    /// Inspect or create ~/.slotwise/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,

    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,slotwise_core=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Schedule { start, out } => {
            let cfg = config::load_config()?;
            let store = JsonTaskStore::new(cfg.store.tasks_path.clone());
            schedule::run(&store, cfg.schedule_config()?, start, out)?;
        }

        Command::Tasks { command } => {
            let cfg = config::load_config()?;
            let store = JsonTaskStore::new(cfg.store.tasks_path.clone());
            tasks_cmd::run(command, &store)?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config()?,
        },
    }

    Ok(())
}
