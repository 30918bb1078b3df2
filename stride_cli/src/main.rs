use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use crate::{
    config::Config, generate::GenerateSubcommands, list::ListArgs, route::RouteArgs,
    show::ShowArgs,
};

mod config;
mod generate;
mod list;
mod parsers;
mod reset;
mod route;
mod session;
mod show;
mod terminal;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long)]
    debug: bool,

    /// Folder holding the stored workouts (overrides STRIDE_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Base URL of the OSRM server (overrides STRIDE_OSRM_URL)
    #[arg(long, global = true)]
    osrm_url: Option<String>,

    /// OSRM routing profile (overrides STRIDE_OSRM_PROFILE)
    #[arg(long, global = true)]
    profile: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Route from a start to a destination and save it as a workout
    Route {
        #[command(flatten)]
        args: RouteArgs,
    },
    /// Redraw the stored workouts and list them, newest first
    #[command(visible_alias = "ls")]
    List {
        #[command(flatten)]
        args: ListArgs,
    },
    /// Center the map on a stored workout
    Show {
        #[command(flatten)]
        args: ShowArgs,
    },
    /// Delete every stored workout
    Reset,
    #[command(visible_alias = "g")]
    Generate {
        #[command(subcommand)]
        commands: GenerateSubcommands,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename("./.env.local").ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let mut config = Config::from_env()?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(osrm_url) = cli.osrm_url {
        config.osrm_url = osrm_url;
    }
    if let Some(profile) = cli.profile {
        config.osrm_profile = profile;
    }

    match cli.command {
        Some(Commands::Route { args }) => route::run(args, &config).await?,
        Some(Commands::List { args }) => list::run(args, &config).await?,
        Some(Commands::Show { args }) => show::run(args, &config).await?,
        Some(Commands::Reset) => reset::run(&config)?,
        Some(Commands::Generate { commands }) => generate::run(commands)?,
        None => {
            // Handle no command provided
        }
    }

    Ok(())
}
